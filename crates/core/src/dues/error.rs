//! Dues ledger error types.
//!
//! `DuesError` covers malformed input to the ledger computation. These are
//! never recovered from: a silently misclassified period is worse than a
//! failed render. `SettlementError` covers the pay-selected-months operation.

use rust_decimal::Decimal;
use thiserror::Error;

use fracc_shared::AppError;
use fracc_shared::types::{PaymentRecordId, ResidentId};

use super::period::PeriodKey;

/// Errors raised while building a dues ledger.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DuesError {
    /// Month outside 1..=12 or a year chrono cannot represent.
    #[error("Invalid billing period: {year}-{month}")]
    InvalidPeriod {
        /// Year as received.
        year: i32,
        /// Month as received.
        month: u32,
    },

    /// Two payment records claim the same period.
    #[error("Duplicate payment records for period {0}")]
    DuplicateRecord(PeriodKey),

    /// A payment record belongs to a different resident.
    #[error("Payment record {record} belongs to resident {found}, expected {expected}")]
    ResidentMismatch {
        /// The offending record.
        record: PaymentRecordId,
        /// Resident the ledger is being built for.
        expected: ResidentId,
        /// Resident on the record.
        found: ResidentId,
    },

    /// Billing parameters are unusable.
    #[error("Invalid billing parameters: {0}")]
    InvalidParameters(String),
}

/// Errors raised while planning or executing a multi-period payment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettlementError {
    /// Nothing was selected.
    #[error("No periods selected for payment")]
    NoPeriodsSelected,

    /// Tendered amount is zero or negative.
    #[error("Payment amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),

    /// Payment method is blank.
    #[error("Payment method is required")]
    MissingPaymentMethod,

    /// The same period was selected twice.
    #[error("Period {0} selected more than once")]
    DuplicateSelection(PeriodKey),

    /// A selected period is already paid.
    #[error("Period {0} is already paid")]
    AlreadySettled(PeriodKey),

    /// A state machine event does not apply to the current state.
    #[error("Invalid settlement transition: {event} while {from}")]
    InvalidTransition {
        /// Current state name.
        from: &'static str,
        /// Rejected event name.
        event: &'static str,
    },

    /// A created record does not match any period awaiting creation.
    #[error("Created record {record} for period {period} was not expected")]
    UnexpectedRecord {
        /// Period reported by the event.
        period: PeriodKey,
        /// Record id reported by the event.
        record: PaymentRecordId,
    },
}

impl SettlementError {
    /// Returns true for errors caused by the operator's selection or input.
    #[must_use]
    pub const fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::NoPeriodsSelected
                | Self::NonPositiveAmount(_)
                | Self::MissingPaymentMethod
                | Self::DuplicateSelection(_)
                | Self::AlreadySettled(_)
        )
    }
}

impl From<DuesError> for AppError {
    fn from(err: DuesError) -> Self {
        Self::Computation(err.to_string())
    }
}

impl From<SettlementError> for AppError {
    fn from(err: SettlementError) -> Self {
        if err.is_input_error() {
            Self::Validation(err.to_string())
        } else {
            Self::Internal(err.to_string())
        }
    }
}
