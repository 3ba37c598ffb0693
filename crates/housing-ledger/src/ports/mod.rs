//! # Ports (Hexagonal Architecture)
//!
//! - `inbound`: the API the transport layer drives
//! - `outbound`: the event sink the ledger drives

pub mod inbound;
pub mod outbound;

pub use inbound::HousingProgramApi;
pub use outbound::EventSink;
