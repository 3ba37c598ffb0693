//! # Broadcast Event Adapter
//!
//! Publishes ledger events on a `tokio` broadcast channel. Slow subscribers
//! lag and lose the oldest events; the ledger never waits on them.

use housing_ledger::events::EventEnvelope;
use housing_ledger::ports::EventSink;
use tokio::sync::broadcast;
use tracing::trace;

/// Event sink backed by a broadcast channel.
#[derive(Debug, Clone)]
pub struct BroadcastEventSink {
    sender: broadcast::Sender<EventEnvelope>,
}

impl BroadcastEventSink {
    /// Creates a sink buffering up to `capacity` events per subscriber.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// New subscription; sees events published after this call.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.sender.subscribe()
    }

    /// Current number of subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl EventSink for BroadcastEventSink {
    fn publish(&self, envelope: &EventEnvelope) {
        // No subscribers is not an error.
        if self.sender.send(envelope.clone()).is_err() {
            trace!(sequence = envelope.sequence, "Event published with no subscribers");
        }
    }
}
