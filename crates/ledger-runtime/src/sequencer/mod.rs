//! # Ledger Sequencer
//!
//! A single task owns command execution. Callers hold a cloneable
//! [`SequencerHandle`] and submit commands over a bounded queue; each
//! command carries a one-shot reply channel.
//!
//! ```text
//! handle ──mpsc (bounded)──→ LedgerSequencer ──→ LedgerService ──→ EventSink
//!    ↑                              │
//!    └──────────oneshot reply───────┘
//! ```
//!
//! Commands are applied in arrival order, one at a time. A full queue
//! makes `send` wait, which is the runtime's backpressure.

pub mod actor;
pub mod command;
pub mod handle;

pub use actor::LedgerSequencer;
pub use command::{CommandEnvelope, LedgerCommand};
pub use handle::SequencerHandle;
