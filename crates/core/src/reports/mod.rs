//! Reports derived from dues ledgers and payment records.
//!
//! This module provides pure business logic for generating reports:
//! - Account statement for one resident
//! - Delinquency report across residents
//! - Daily close of collected payments, grouped by method

pub mod daily_close;
pub mod delinquency;
pub mod error;
pub mod statement;


pub use daily_close::{DailyClose, MethodTotal};
pub use delinquency::{DelinquencyReport, DelinquencyRow};
pub use error::ReportError;
pub use statement::AccountStatement;
