//! # Event Log Adapter
//!
//! In-memory [`EventSink`] that records every envelope. Used by tests and
//! by callers that want to replay what happened.

use crate::events::EventEnvelope;
use crate::ports::EventSink;
use parking_lot::RwLock;

/// Records published events in order.
#[derive(Debug, Default)]
pub struct InMemoryEventLog {
    events: RwLock<Vec<EventEnvelope>>,
}

impl InMemoryEventLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every recorded envelope.
    #[must_use]
    pub fn events(&self) -> Vec<EventEnvelope> {
        self.events.read().clone()
    }

    /// Number of recorded envelopes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    /// Returns true if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }
}

impl EventSink for InMemoryEventLog {
    fn publish(&self, envelope: &EventEnvelope) {
        self.events.write().push(envelope.clone());
    }
}

/// Sink that drops everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullEventSink;

impl EventSink for NullEventSink {
    fn publish(&self, _envelope: &EventEnvelope) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Address, RefId};
    use crate::events::LedgerEvent;

    #[test]
    fn test_records_in_order() {
        let log = InMemoryEventLog::new();
        for sequence in 1..=3 {
            log.publish(&EventEnvelope {
                sequence,
                event: LedgerEvent::MemberRegistered {
                    member: Address::new([sequence as u8; 20]),
                    married: false,
                },
            });
        }
        log.publish(&EventEnvelope {
            sequence: 4,
            event: LedgerEvent::ProjectRegistered {
                project_ref: RefId::EMPTY,
                restricted: false,
            },
        });

        let seqs: Vec<u64> = log.events().iter().map(|e| e.sequence).collect();
        assert_eq!(seqs, vec![1, 2, 3, 4]);
        assert_eq!(log.len(), 4);
        assert_eq!(log.events()[3].event.name(), "project_registered");
    }
}
