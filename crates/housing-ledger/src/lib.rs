//! # Housing Ledger - Affordable-Housing Program Bookkeeping
//!
//! Single-ledger state for an affordable-housing program: who is a member,
//! which projects and units exist, how much each member holds in escrow,
//! and which member has been allocated which unit.
//!
//! ## Components
//!
//! | Component | Location | Purpose |
//! |-----------|----------|---------|
//! | Identity Registry | `identity/` | Member identity records keyed by address |
//! | Project/Unit Registry | `projects/` | Projects and their allocable units |
//! | Escrow Ledger | `escrow/` | Per-member deposit balances and receipts |
//! | Allocation Engine | `allocation/` | Binds one member to one unit |
//! | Ledger | `ledger.rs` | Explicit state container owning all of the above |
//! | Service | `service.rs` | Lock-guarded, event-emitting front of the ledger |
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Enforcement Location |
//! |----|-----------|---------------------|
//! | INVARIANT-1 | Registered members carry a non-empty national identity | `domain/invariants.rs` - `check_identity_invariant()` |
//! | INVARIANT-2 | Allocated units have an owner, unallocated ones do not | `domain/invariants.rs` - `check_owner_flag_invariant()` |
//! | INVARIANT-3 | Allocations pair one member with one unit | `domain/invariants.rs` - `check_pairing_invariant()` |
//! | INVARIANT-4 | Escrow total equals the sum of balances and of receipts | `domain/invariants.rs` - `check_escrow_invariant()` |
//! | INVARIANT-5 | Every owner held the required deposit | `domain/invariants.rs` - `check_sufficiency_invariant()` |
//!
//! ## Authorization
//!
//! | Operation | Caller |
//! |-----------|--------|
//! | `register_member` | Any non-zero address (registers itself) |
//! | `register_project` | Admin |
//! | `register_housing_unit` | Admin |
//! | `deposit_funds` | Registered member |
//! | `allocate_housing_unit` | Admin |
//!
//! ## Usage Example
//!
//! ```ignore
//! use housing_ledger::prelude::*;
//!
//! let service = create_test_service();
//! let admin = Caller::admin(admin_address);
//!
//! service.register_project(admin, RefId::from_label("kibera-phase-1")?, false)?;
//! let envelope = service.allocate_housing_unit(admin, member, unit_ref)?;
//! assert_eq!(envelope.event.name(), "housing_unit_allocated");
//! ```

// Crate-level lints
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

// =============================================================================
// MODULES
// =============================================================================

pub mod adapters;
pub mod allocation;
pub mod config;
pub mod domain;
pub mod errors;
pub mod escrow;
pub mod events;
pub mod identity;
pub mod ledger;
pub mod ports;
pub mod projects;
pub mod service;

// =============================================================================
// PRELUDE
// =============================================================================

/// Convenient re-exports for common usage.
pub mod prelude {
    // Domain
    pub use crate::domain::{
        check_all_invariants, Address, Amount, Caller, InvariantCheckResult, InvariantViolation,
        RefId, Role, UnitType,
    };

    // Components
    pub use crate::allocation::{Allocation, AllocationEngine, AllocationPlan};
    pub use crate::escrow::{DepositReceipt, EscrowLedger};
    pub use crate::identity::{IdentityRegistry, Member, MemberRecord};
    pub use crate::projects::{HousingUnit, Project, ProjectRegistry, UnitSpec};

    // Ledger
    pub use crate::config::{LedgerConfig, OverpaymentPolicy};
    pub use crate::ledger::{HousingLedger, LedgerSnapshot, Operation};

    // Ports
    pub use crate::ports::{EventSink, HousingProgramApi};

    // Events
    pub use crate::events::{EventEnvelope, LedgerEvent};

    // Errors
    pub use crate::errors::{AllocationConflict, ErrorKind, IdentityField, LedgerError};

    // Adapters
    pub use crate::adapters::{InMemoryEventLog, NullEventSink};

    // Service
    pub use crate::service::{create_test_service, LedgerService, ServiceStats};
}

// =============================================================================
// CRATE INFO
// =============================================================================

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Service name used in logs and metrics.
pub const SERVICE_NAME: &str = "housing-ledger";
