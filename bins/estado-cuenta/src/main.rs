//! Fracc account statement
//!
//! Prints a resident's dues ledger and totals as JSON.
//!
//! Usage: `estado-cuenta <resident-id> [--advance] [--as-of YYYY-MM-DD]`

use std::sync::Arc;

use anyhow::{Context, bail};
use chrono::NaiveDate;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fracc_client::{LedgerLoader, RestBackend};
use fracc_core::dues::BillingMode;
use fracc_shared::types::ResidentId;
use fracc_shared::{AppConfig, SessionContext};

const USAGE: &str = "usage: estado-cuenta <resident-id> [--advance] [--as-of YYYY-MM-DD]";

struct Args {
    resident_id: ResidentId,
    mode: BillingMode,
    as_of: NaiveDate,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut resident_id = None;
    let mut mode = BillingMode::Arrears;
    let mut as_of = chrono::Local::now().date_naive();

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--advance" => mode = BillingMode::Advance,
            "--as-of" => {
                let value = args.next().context("--as-of needs a date")?;
                as_of = value
                    .parse()
                    .with_context(|| format!("invalid date: {value}"))?;
            }
            other if resident_id.is_none() => {
                resident_id = Some(
                    other
                        .parse::<ResidentId>()
                        .with_context(|| format!("invalid resident id: {other}"))?,
                );
            }
            other => bail!("unexpected argument: {other}"),
        }
    }

    Ok(Args {
        resident_id: resident_id.context(USAGE)?,
        mode,
        as_of,
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fracc=info,fracc_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = parse_args()?;

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;

    // Start the session from the configured token
    let session = Arc::new(SessionContext::new());
    if let Some(token) = &config.api.token {
        session.begin(token.clone(), config.api.is_resident).await;
    }

    let backend = Arc::new(RestBackend::new(&config.api, session)?);
    info!(base_url = %config.api.base_url, "Backend configured");

    let loader = LedgerLoader::new(backend, config.billing.clone());
    let loaded = loader.load(args.resident_id, args.as_of, args.mode).await?;
    let statement = loaded.statement(args.as_of, loader.defaults());

    println!("{}", serde_json::to_string_pretty(&statement)?);
    Ok(())
}
