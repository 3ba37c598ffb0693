//! Prometheus metrics for the housing ledger.
//!
//! All metrics follow the naming convention: `hp_<what>_<unit>`
//!
//! ## Metric Types
//!
//! - **Counter**: Monotonically increasing value (e.g. hp_units_allocated_total)
//! - **Gauge**: Value that can go up or down (e.g. hp_escrow_held)

use lazy_static::lazy_static;
use prometheus::{Encoder, Gauge, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // REGISTRY METRICS
    // =========================================================================

    /// Members registered
    pub static ref MEMBERS_REGISTERED: IntCounter = IntCounter::new(
        "hp_members_registered_total",
        "Total number of members registered"
    ).expect("metric creation failed");

    /// Projects registered
    pub static ref PROJECTS_REGISTERED: IntCounter = IntCounter::new(
        "hp_projects_registered_total",
        "Total number of housing projects registered"
    ).expect("metric creation failed");

    /// Units registered
    pub static ref UNITS_REGISTERED: IntCounter = IntCounter::new(
        "hp_units_registered_total",
        "Total number of housing units registered"
    ).expect("metric creation failed");

    // =========================================================================
    // ESCROW METRICS
    // =========================================================================

    /// Deposits accepted
    pub static ref DEPOSITS_ACCEPTED: IntCounter = IntCounter::new(
        "hp_deposits_accepted_total",
        "Total number of escrow deposits accepted"
    ).expect("metric creation failed");

    /// Sum of all escrow balances
    pub static ref ESCROW_HELD: Gauge = Gauge::new(
        "hp_escrow_held",
        "Total amount currently held in escrow"
    ).expect("metric creation failed");

    // =========================================================================
    // ALLOCATION METRICS
    // =========================================================================

    /// Units allocated
    pub static ref UNITS_ALLOCATED: IntCounter = IntCounter::new(
        "hp_units_allocated_total",
        "Total number of housing units allocated"
    ).expect("metric creation failed");

    // =========================================================================
    // ERROR METRICS
    // =========================================================================

    /// Rejected operations by operation and error kind
    pub static ref OPERATIONS_REJECTED: IntCounterVec = IntCounterVec::new(
        Opts::new("hp_operations_rejected_total", "Rejected ledger operations"),
        &["operation", "kind"]
    ).expect("metric creation failed");
}

/// Handle proving the metrics are registered.
#[derive(Debug, Clone, Copy)]
pub struct MetricsHandle {
    _private: (),
}

impl MetricsHandle {
    /// Renders the registry in Prometheus text format.
    pub fn gather_text(&self) -> Result<String, TelemetryError> {
        gather_text()
    }
}

/// Register all metrics with the global registry.
///
/// Calling it again is harmless.
pub fn register_metrics() -> Result<MetricsHandle, TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        // Registries
        Box::new(MEMBERS_REGISTERED.clone()),
        Box::new(PROJECTS_REGISTERED.clone()),
        Box::new(UNITS_REGISTERED.clone()),
        // Escrow
        Box::new(DEPOSITS_ACCEPTED.clone()),
        Box::new(ESCROW_HELD.clone()),
        // Allocation
        Box::new(UNITS_ALLOCATED.clone()),
        // Errors
        Box::new(OPERATIONS_REJECTED.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }

    Ok(MetricsHandle { _private: () })
}

/// Encode all metrics as Prometheus text format.
pub fn gather_text() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

/// Records a rejected operation.
pub fn record_rejection(operation: &str, kind: &str) {
    crate::metric_inc!(OPERATIONS_REJECTED, &[operation, kind]);
}

/// Sets the escrow gauge.
#[allow(clippy::cast_precision_loss)]
pub fn set_escrow_held(total: u128) {
    ESCROW_HELD.set(total as f64);
}
