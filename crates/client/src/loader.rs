//! Fetching a resident's data and deriving the ledger from it.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info};

use fracc_core::dues::{
    BillingMode, BillingParameters, BillingPeriod, DuesLedger, PaymentRecord, Resident,
};
use fracc_core::reports::AccountStatement;
use fracc_shared::config::BillingDefaults;
use fracc_shared::types::ResidentId;

use crate::backend::BillingBackend;
use crate::error::ClientError;

/// Everything loaded and derived for one resident.
#[derive(Debug, Clone)]
pub struct LoadedLedger {
    /// The resident.
    pub resident: Resident,
    /// Records as stored by the backend.
    pub records: Vec<PaymentRecord>,
    /// Parameters the ledger was classified with.
    pub params: BillingParameters,
    /// Derived ledger, oldest first.
    pub periods: Vec<BillingPeriod>,
}

impl LoadedLedger {
    /// Account statement over the derived ledger.
    #[must_use]
    pub fn statement(&self, as_of: NaiveDate, defaults: &BillingDefaults) -> AccountStatement {
        AccountStatement::new(self.resident.id, self.periods.clone(), as_of, defaults.currency)
    }
}

/// Loads ledgers from the backend.
///
/// Nothing is cached: every load re-derives the ledger from the backend's
/// current records, which is what reconciles an interrupted payment.
pub struct LedgerLoader<B: ?Sized> {
    backend: Arc<B>,
    defaults: BillingDefaults,
}

impl<B: BillingBackend + ?Sized> LedgerLoader<B> {
    /// Creates a loader with local billing defaults.
    pub const fn new(backend: Arc<B>, defaults: BillingDefaults) -> Self {
        Self { backend, defaults }
    }

    /// Local billing defaults.
    pub const fn defaults(&self) -> &BillingDefaults {
        &self.defaults
    }

    /// Fetches resident, records and configuration concurrently, then
    /// derives the ledger.
    ///
    /// # Errors
    ///
    /// Returns the first backend error, or `ClientError::Dues` if the records
    /// cannot be turned into a ledger.
    pub async fn load(
        &self,
        resident_id: ResidentId,
        today: NaiveDate,
        mode: BillingMode,
    ) -> Result<LoadedLedger, ClientError> {
        let (resident, records, config) = tokio::try_join!(
            self.backend.get_resident(resident_id),
            self.backend.list_payment_records(resident_id),
            self.backend.get_billing_config(),
        )?;
        debug!(
            resident_id = %resident_id,
            records = records.len(),
            "Fetched resident data"
        );

        let params = BillingParameters::for_resident(
            &resident,
            &config,
            self.defaults.grace_period_days,
            self.defaults.surcharge_rate_percent,
        );
        let periods = DuesLedger::build(&resident, &records, today, &params, mode)?;
        info!(
            resident_id = %resident_id,
            mode = ?mode,
            periods = periods.len(),
            "Ledger derived"
        );

        Ok(LoadedLedger {
            resident,
            records,
            params,
            periods,
        })
    }
}
