//! # Allocation Engine
//!
//! The state machine that binds a member to a unit.
//!
//! ```text
//! [Unallocated] ──allocate_housing_unit──→ [Allocated]   (terminal)
//! ```
//!
//! Allocation is split in two steps. [`AllocationEngine::plan`] runs every
//! check against a shared borrow of the state and returns an
//! [`AllocationPlan`]; `apply` consumes the plan and writes the three
//! fields (`unit.housing_allocated`, `unit.owner`,
//! `member.housing_allocated`). The ledger holds exclusive access across
//! both steps, so no other mutation can slip between check and write.

pub mod engine;

pub use engine::{Allocation, AllocationEngine, AllocationPlan, ALLOCATE_OPERATION};
