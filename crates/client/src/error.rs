//! Client error types.

use thiserror::Error;

use fracc_core::dues::{DuesError, SettlementError};
use fracc_shared::AppError;
use fracc_shared::types::PaymentRecordId;

/// Errors raised while talking to the backend or driving a workflow.
#[derive(Debug, Error)]
pub enum ClientError {
    /// No active session, or the backend answered 401.
    #[error("Not authenticated")]
    Unauthorized,

    /// The request never got an HTTP answer (connect, timeout, decode).
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("Backend returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, as text.
        body: String,
    },

    /// The ledger could not be derived from the backend's data.
    #[error(transparent)]
    Dues(#[from] DuesError),

    /// The payment was rejected or the workflow went off track.
    #[error(transparent)]
    Settlement(#[from] SettlementError),

    /// A step failed after some records were already created.
    ///
    /// The created records stay; the next ledger load shows them as pending.
    #[error("Payment interrupted after creating {} record(s): {source}", created.len())]
    PartialSettlement {
        /// Records that now exist without the payment applied.
        created: Vec<PaymentRecordId>,
        /// The failure that interrupted the workflow.
        source: Box<ClientError>,
    },
}

impl ClientError {
    /// Returns true for errors the operator can fix by changing the input.
    #[must_use]
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::Settlement(err) if err.is_input_error())
    }
}

impl From<ClientError> for AppError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Unauthorized => Self::Unauthorized(err.to_string()),
            ClientError::Status { status: 404, .. } => Self::NotFound(err.to_string()),
            ClientError::Status { status: 409, .. } => Self::Conflict(err.to_string()),
            ClientError::Http(_)
            | ClientError::Status { .. }
            | ClientError::PartialSettlement { .. } => Self::ExternalService(err.to_string()),
            ClientError::Dues(inner) => inner.into(),
            ClientError::Settlement(inner) => inner.into(),
        }
    }
}
