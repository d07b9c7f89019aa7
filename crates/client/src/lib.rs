//! REST collaborator for the Fracc dues ledger.
//!
//! Fetches residents, payment records and billing configuration from the
//! backend, derives ledgers with `fracc-core`, and drives multi-period
//! payments through the settlement state machine.

pub mod backend;
pub mod error;
pub mod loader;
pub mod rest;
pub mod workflow;

#[cfg(test)]
mod testing;

pub use backend::{BillingBackend, MultiPaymentReceipt, MultiPaymentRequest};
pub use error::ClientError;
pub use loader::{LedgerLoader, LoadedLedger};
pub use rest::RestBackend;
pub use workflow::{PaymentWorkflow, SettlementOutcome};
