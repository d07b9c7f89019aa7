//! Maintenance dues ledger.
//!
//! This module derives a resident's dues ledger from the backend's payment
//! records:
//! - Period generation for arrears and advance payment
//! - Status, overdue days and surcharge per period
//! - Summary totals for the dashboard cards
//! - Planning and tracking a payment across several months
//! - Error types for ledger and settlement operations

pub mod aggregate;
pub mod classifier;
pub mod error;
pub mod generator;
pub mod ledger;
pub mod period;
pub mod settlement;
pub mod state;
pub mod types;

#[cfg(test)]
mod ledger_props;
#[cfg(test)]
mod settlement_props;

pub use aggregate::{LedgerSummary, StatusCounts};
pub use classifier::{SURCHARGE_BLOCK_DAYS, StatusClassifier};
pub use error::{DuesError, SettlementError};
pub use generator::PeriodGenerator;
pub use ledger::DuesLedger;
pub use period::PeriodKey;
pub use settlement::{PeriodAllocation, SettlementPlan, SettlementPlanner, Tender};
pub use state::{SettlementEvent, SettlementStage, SettlementState, Slot};
pub use types::{
    BillingConfig, BillingMode, BillingParameters, BillingPeriod, FeeChange, FeeSchedule,
    HousingUnit, NewPaymentRecord, PaymentRecord, PeriodStatus, Resident,
};
