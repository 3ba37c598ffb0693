//! # Ledger Runtime Library
//!
//! Hosts the housing ledger behind a single sequencer task. The main
//! entry point is the `main.rs` binary; this library exposes the runtime
//! for embedding and testing.
//!
//! ## Structure
//!
//! - `container/` - Runtime configuration (file + environment)
//! - `access/` - Caller role resolution from the admin list
//! - `genesis/` - Projects and units seeded at boot
//! - `adapters/` - Event sinks (broadcast, metrics)
//! - `sequencer/` - Command queue, sequencer task and client handle
//!
//! ## Startup Sequence
//!
//! 1. Validate configuration
//! 2. Register metrics
//! 3. Build the ledger service with the runtime event sinks
//! 4. Apply genesis projects as the first admin
//! 5. Spawn the sequencer task

#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod access;
pub mod adapters;
pub mod container;
pub mod errors;
pub mod genesis;
pub mod sequencer;

use std::sync::Arc;

use housing_ledger::events::EventEnvelope;
use housing_ledger::ports::HousingProgramApi;
use housing_ledger::service::LedgerService;
use housing_telemetry::metrics::set_escrow_held;
use parking_lot::Mutex;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::info;

pub use access::RoleResolver;
pub use adapters::{BroadcastEventSink, MetricsEventSink};
pub use container::{ConfigError, RuntimeConfig};
pub use errors::RuntimeError;
pub use genesis::{GenesisConfig, GenesisSummary};
pub use sequencer::{LedgerSequencer, SequencerHandle};

/// Event sink stack used by the runtime.
pub type RuntimeSink = MetricsEventSink<BroadcastEventSink>;

/// A running ledger.
pub struct LedgerRuntime {
    service: Arc<LedgerService<RuntimeSink>>,
    events: BroadcastEventSink,
    handle: SequencerHandle,
    shutdown_tx: watch::Sender<bool>,
    task: Mutex<Option<JoinHandle<()>>>,
    genesis: GenesisSummary,
}

impl LedgerRuntime {
    /// Builds the ledger, applies genesis and spawns the sequencer.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(config: RuntimeConfig) -> Result<Self, RuntimeError> {
        config.validate()?;
        housing_telemetry::register_metrics()?;

        let resolver = RoleResolver::new(config.admin_addresses()?);
        let events = BroadcastEventSink::new(config.event_capacity);
        let service = Arc::new(LedgerService::new(
            config.ledger.clone(),
            MetricsEventSink::new(events.clone()),
        ));

        let genesis = genesis::apply_genesis(
            service.as_ref(),
            resolver.genesis_admin(),
            &config.genesis,
        )?;
        set_escrow_held(service.snapshot().total_escrow);

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let (sequencer, handle) = LedgerSequencer::new(
            Arc::clone(&service),
            resolver,
            config.queue_capacity,
            shutdown_rx,
        );
        let task = tokio::spawn(sequencer.run());

        info!(
            projects = genesis.projects,
            units = genesis.units,
            queue_capacity = config.queue_capacity,
            "Ledger runtime started"
        );

        Ok(Self {
            service,
            events,
            handle,
            shutdown_tx,
            task: Mutex::new(Some(task)),
            genesis,
        })
    }

    /// A handle for submitting commands.
    #[must_use]
    pub fn handle(&self) -> SequencerHandle {
        self.handle.clone()
    }

    /// Subscribes to ledger events published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.events.subscribe()
    }

    /// The underlying service, for direct reads and invariant checks.
    #[must_use]
    pub fn service(&self) -> &Arc<LedgerService<RuntimeSink>> {
        &self.service
    }

    /// Current `hp_*` metrics in Prometheus text format.
    pub fn metrics_text(&self) -> Result<String, RuntimeError> {
        Ok(housing_telemetry::gather_text()?)
    }

    /// What genesis registered.
    #[must_use]
    pub fn genesis_summary(&self) -> GenesisSummary {
        self.genesis
    }

    /// Stops the sequencer and waits for it to finish.
    pub async fn shutdown(&self) {
        // Ignored: the sequencer may already be gone.
        let _ = self.shutdown_tx.send(true);
        let task = self.task.lock().take();
        if let Some(task) = task {
            if let Err(e) = task.await {
                tracing::error!(error = %e, "Ledger sequencer task failed");
            }
        }
        info!(
            subscribers = self.events.subscriber_count(),
            "Ledger runtime shut down"
        );
    }
}
