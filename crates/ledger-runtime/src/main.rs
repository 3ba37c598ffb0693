//! # Boma Ledger Runtime
//!
//! The main entry point for the housing ledger.
//!
//! ## Startup Sequence
//!
//! 1. Initialize telemetry (logs + metrics)
//! 2. Load configuration (from `HP_CONFIG` file and env)
//! 3. Validate (strictly when `HP_NETWORK=production`)
//! 4. Apply genesis projects
//! 5. Start the sequencer
//! 6. Run until Ctrl+C, then log the final metrics

use anyhow::{Context, Result};
use housing_telemetry::{init_telemetry, TelemetryConfig};
use ledger_runtime::{LedgerRuntime, RuntimeConfig};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let telemetry = TelemetryConfig::from_env();
    let production = telemetry.network == "production";
    let telemetry_guard = init_telemetry(telemetry).context("Failed to initialize telemetry")?;

    let config = RuntimeConfig::load().context("Failed to load configuration")?;
    if production {
        config
            .validate_for_production()
            .context("Configuration is not production ready")?;
    }

    info!("===========================================");
    info!("  Boma Ledger Runtime v{}", env!("CARGO_PKG_VERSION"));
    info!("===========================================");

    let runtime = LedgerRuntime::start(config).context("Failed to start ledger runtime")?;
    let genesis = runtime.genesis_summary();
    info!(
        projects = genesis.projects,
        units = genesis.units,
        "Ledger is running. Press Ctrl+C to stop."
    );

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl+C")?;

    runtime.shutdown().await;
    match telemetry_guard.metrics().gather_text() {
        Ok(text) => info!(metrics = %text, "Final ledger metrics"),
        Err(e) => warn!(error = %e, "Could not render ledger metrics"),
    }
    Ok(())
}
