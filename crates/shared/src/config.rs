//! Application configuration management.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::types::Currency;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// REST backend configuration.
    pub api: ApiConfig,
    /// Local billing defaults, overridden by the backend's configuration.
    #[serde(default)]
    pub billing: BillingDefaults,
}

/// REST backend configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the backend, e.g. `http://localhost:4000`.
    pub base_url: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Bearer token used to start a session without an interactive login.
    #[serde(default)]
    pub token: Option<String>,
    /// Whether the configured token belongs to a resident account.
    #[serde(default)]
    pub is_resident: bool,
}

fn default_timeout_secs() -> u64 {
    30
}

/// Billing parameters used when the backend does not provide them.
#[derive(Debug, Clone, Deserialize)]
pub struct BillingDefaults {
    /// Days after the due date before overdue days start accruing.
    #[serde(default)]
    pub grace_period_days: u32,
    /// Surcharge charged per started 30-day block, in percent of the due amount.
    #[serde(default = "default_surcharge_rate_percent")]
    pub surcharge_rate_percent: Decimal,
    /// Currency all amounts are expressed in.
    #[serde(default = "default_currency")]
    pub currency: Currency,
}

fn default_surcharge_rate_percent() -> Decimal {
    Decimal::TEN
}

fn default_currency() -> Currency {
    Currency::Mxn
}

impl Default for BillingDefaults {
    fn default() -> Self {
        Self {
            grace_period_days: 0,
            surcharge_rate_percent: default_surcharge_rate_percent(),
            currency: default_currency(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// Sources, later ones winning: `config/default`, `config/{RUN_MODE}`,
    /// then `FRACC__SECTION__KEY` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("FRACC").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
