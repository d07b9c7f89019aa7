//! Residents with overdue dues.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use fracc_shared::types::{Currency, ResidentId};

use super::error::ReportError;
use crate::dues::{BillingPeriod, PeriodKey, PeriodStatus};

/// One delinquent resident.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DelinquencyRow {
    /// Resident id.
    pub resident_id: ResidentId,
    /// Number of overdue months.
    pub overdue_count: usize,
    /// Unpaid principal over overdue months.
    pub principal_owed: Decimal,
    /// Surcharge over overdue months.
    pub surcharge: Decimal,
    /// `principal_owed + surcharge`.
    pub total_owed: Decimal,
    /// Oldest overdue month.
    pub oldest_overdue: PeriodKey,
    /// Largest overdue day count.
    pub max_days_overdue: i64,
}

/// Delinquency across residents, largest debt first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DelinquencyReport {
    /// Report type identifier.
    pub report_type: String,
    /// Day the ledgers were evaluated on.
    pub as_of: NaiveDate,
    /// Currency of every amount.
    pub currency: Currency,
    /// One row per resident with at least one overdue month.
    pub rows: Vec<DelinquencyRow>,
    /// Σ principal owed.
    pub total_principal: Decimal,
    /// Σ surcharge.
    pub total_surcharge: Decimal,
    /// Σ total owed.
    pub total_owed: Decimal,
}

impl DelinquencyReport {
    /// Builds the report from one ledger per resident.
    ///
    /// Rows are sorted by total owed descending, then by resident id.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::DuplicateResident` if a resident is passed twice.
    pub fn from_ledgers<'a, I>(
        ledgers: I,
        as_of: NaiveDate,
        currency: Currency,
    ) -> Result<Self, ReportError>
    where
        I: IntoIterator<Item = (ResidentId, &'a [BillingPeriod])>,
    {
        let mut seen = BTreeSet::new();
        let mut rows = Vec::new();
        for (resident_id, periods) in ledgers {
            if !seen.insert(resident_id) {
                return Err(ReportError::DuplicateResident(resident_id));
            }
            if let Some(row) = Self::row(resident_id, periods) {
                rows.push(row);
            }
        }

        rows.sort_by(|a, b| {
            b.total_owed
                .cmp(&a.total_owed)
                .then_with(|| a.resident_id.cmp(&b.resident_id))
        });

        let total_principal = rows.iter().map(|r| r.principal_owed).sum();
        let total_surcharge = rows.iter().map(|r| r.surcharge).sum();
        let total_owed = rows.iter().map(|r| r.total_owed).sum();

        Ok(Self {
            report_type: "delinquency".to_string(),
            as_of,
            currency,
            rows,
            total_principal,
            total_surcharge,
            total_owed,
        })
    }

    fn row(resident_id: ResidentId, periods: &[BillingPeriod]) -> Option<DelinquencyRow> {
        let overdue: Vec<&BillingPeriod> = periods
            .iter()
            .filter(|p| p.status == PeriodStatus::Overdue)
            .collect();
        let oldest_overdue = overdue.iter().map(|p| p.period).min()?;

        let principal_owed: Decimal = overdue.iter().map(|p| p.remaining_principal()).sum();
        let surcharge: Decimal = overdue.iter().map(|p| p.surcharge).sum();
        let max_days_overdue = overdue.iter().map(|p| p.days_overdue).max().unwrap_or(0);

        Some(DelinquencyRow {
            resident_id,
            overdue_count: overdue.len(),
            principal_owed,
            surcharge,
            total_owed: principal_owed + surcharge,
            oldest_overdue,
            max_days_overdue,
        })
    }
}
