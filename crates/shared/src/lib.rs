//! Shared types, errors, and configuration for Fracc.
//!
//! This crate provides common types used across all other crates:
//! - Money types with decimal precision
//! - Typed IDs for residents, housing units and payment records
//! - Application-wide error types
//! - Explicit session context for REST calls
//! - Configuration management

pub mod config;
pub mod error;
pub mod session;
pub mod types;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use session::{SessionContext, SessionState};
