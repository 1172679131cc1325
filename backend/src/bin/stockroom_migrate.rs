//! Apply pending database migrations for the inventory ledger.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use color_eyre::eyre::{Result, WrapErr, eyre};
use ortho_config::OrthoConfig;
use tokio::runtime::Builder;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use stockroom::config::StockroomSettings;
use stockroom::outbound::persistence::run_pending_migrations;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if let Err(err) = fmt().with_env_filter(filter).json().try_init() {
        warn!(error = %err, "tracing init failed");
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing();

    let settings =
        StockroomSettings::load().map_err(|err| eyre!("failed to load settings: {err}"))?;
    let database_url = settings
        .database_url
        .clone()
        .ok_or_else(|| eyre!("STOCKROOM_DATABASE_URL or --database-url is required"))?;

    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("failed to build migration runtime")?;
    let applied = runtime
        .block_on(run_pending_migrations(&database_url))
        .wrap_err("failed to apply migrations")?;

    if applied.is_empty() {
        info!("database schema already up to date");
    }
    Ok(())
}
