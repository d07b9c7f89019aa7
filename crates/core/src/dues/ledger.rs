//! Per-resident dues ledger.
//!
//! The ledger is re-derived from the backend's current records on every
//! read. Nothing here mutates a record, so recomputing after a partial
//! failure shows already-created records as pending, never lost or doubled.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;

use super::classifier::StatusClassifier;
use super::error::DuesError;
use super::generator::PeriodGenerator;
use super::period::PeriodKey;
use super::types::{BillingMode, BillingParameters, BillingPeriod, PaymentRecord, Resident};

/// Builds dues ledgers.
pub struct DuesLedger;

impl DuesLedger {
    /// Builds the ledger for one resident, ascending by period.
    ///
    /// `Arrears` covers every elapsed month since move-in plus every month
    /// that already has a record. `Advance` covers the months from now to
    /// December that have no record yet, tagged as advance payments.
    ///
    /// # Errors
    ///
    /// - `DuesError::InvalidParameters` if `params` fail validation
    /// - `DuesError::ResidentMismatch` if a record belongs to someone else
    /// - `DuesError::InvalidPeriod` if a record has an impossible month
    /// - `DuesError::DuplicateRecord` if two records share a month
    pub fn build(
        resident: &Resident,
        records: &[PaymentRecord],
        today: NaiveDate,
        params: &BillingParameters,
        mode: BillingMode,
    ) -> Result<Vec<BillingPeriod>, DuesError> {
        params.validate()?;
        let by_period = Self::index_records(resident, records)?;

        let ledger = match mode {
            BillingMode::Arrears => {
                let mut keys: BTreeSet<PeriodKey> = PeriodGenerator::generate(
                    resident.move_in_date,
                    today,
                    BillingMode::Arrears,
                    &BTreeSet::new(),
                )
                .into_iter()
                .collect();
                keys.extend(by_period.keys().copied());

                keys.into_iter()
                    .map(|key| {
                        StatusClassifier::classify(
                            key,
                            by_period.get(&key).copied(),
                            today,
                            params,
                            false,
                        )
                    })
                    .collect()
            }
            BillingMode::Advance => {
                let covered: BTreeSet<PeriodKey> = by_period.keys().copied().collect();
                let move_in = resident.move_in_date;
                PeriodGenerator::generate(move_in, today, BillingMode::Advance, &covered)
                    .into_iter()
                    .map(|key| StatusClassifier::classify(key, None, today, params, true))
                    .collect()
            }
        };

        Ok(ledger)
    }

    /// Lines with something still owed, oldest first.
    #[must_use]
    pub fn unpaid(periods: &[BillingPeriod]) -> Vec<&BillingPeriod> {
        let mut unpaid: Vec<&BillingPeriod> = periods.iter().filter(|p| !p.is_settled()).collect();
        unpaid.sort_by_key(|p| p.period);
        unpaid
    }

    fn index_records<'a>(
        resident: &Resident,
        records: &'a [PaymentRecord],
    ) -> Result<BTreeMap<PeriodKey, &'a PaymentRecord>, DuesError> {
        let mut by_period = BTreeMap::new();
        for record in records {
            if record.resident_id != resident.id {
                return Err(DuesError::ResidentMismatch {
                    record: record.id,
                    expected: resident.id,
                    found: record.resident_id,
                });
            }
            let key = record.period()?;
            if by_period.insert(key, record).is_some() {
                return Err(DuesError::DuplicateRecord(key));
            }
        }
        Ok(by_period)
    }
}
