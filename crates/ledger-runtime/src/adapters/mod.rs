//! # Runtime Adapters
//!
//! Outbound port implementations wired in by the runtime.
//!
//! - `broadcast`: fans events out to async subscribers
//! - `metrics`: updates Prometheus counters, then forwards

pub mod broadcast;
pub mod metrics;

pub use broadcast::BroadcastEventSink;
pub use metrics::MetricsEventSink;
