//! Report error types.

use chrono::NaiveDate;
use thiserror::Error;

use fracc_shared::AppError;
use fracc_shared::types::ResidentId;

/// Errors that can occur during report generation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReportError {
    /// Invalid date range.
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange {
        /// Start date.
        start: NaiveDate,
        /// End date.
        end: NaiveDate,
    },

    /// The same resident was passed twice.
    #[error("Resident {0} appears more than once")]
    DuplicateResident(ResidentId),
}

impl From<ReportError> for AppError {
    fn from(err: ReportError) -> Self {
        Self::Validation(err.to_string())
    }
}
