//! # Driven Ports (SPI - Outbound)
//!
//! What the ledger hands events to. Adapters decide where they go: an
//! in-memory log for tests, a broadcast channel in the runtime.

use crate::events::EventEnvelope;

/// Receiver of ledger events.
///
/// Called while the ledger is still exclusively held, so envelopes arrive
/// in sequence order. Implementations must not block for long.
pub trait EventSink: Send + Sync {
    /// Accepts one event.
    fn publish(&self, envelope: &EventEnvelope);
}

impl<T: EventSink + ?Sized> EventSink for std::sync::Arc<T> {
    fn publish(&self, envelope: &EventEnvelope) {
        (**self).publish(envelope);
    }
}
