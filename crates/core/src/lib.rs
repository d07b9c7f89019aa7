//! Core business logic for fraccionamiento dues.
//!
//! This crate contains pure business logic with ZERO web or IO dependencies.
//! Every ledger line is derived from payment records on demand; nothing here
//! holds state between calls.
//!
//! # Modules
//!
//! - `dues` - Period generation, status classification, totals and
//!   multi-period payment planning
//! - `reports` - Account statements, delinquency and daily close

pub mod dues;
pub mod reports;
