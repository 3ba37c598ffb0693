//! # Runtime Errors

use housing_ledger::errors::LedgerError;
use housing_telemetry::TelemetryError;
use thiserror::Error;

use crate::container::ConfigError;
use crate::genesis::GenesisError;

/// Errors surfaced by the runtime and its sequencer handle.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// The ledger rejected the operation.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// The sequencer is gone; the command was not applied.
    #[error("ledger sequencer is not running")]
    QueueClosed,

    /// Configuration is invalid.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Genesis could not be applied.
    #[error("genesis error: {0}")]
    Genesis(#[from] GenesisError),

    /// Metrics could not be registered.
    #[error("telemetry error: {0}")]
    Telemetry(#[from] TelemetryError),
}

impl RuntimeError {
    /// The ledger error, if this is one.
    #[must_use]
    pub fn as_ledger(&self) -> Option<&LedgerError> {
        match self {
            Self::Ledger(e) => Some(e),
            _ => None,
        }
    }
}
