//! # Domain Primitives
//!
//! Value objects, caller identity and the cross-component invariants.

pub mod caller;
pub mod invariants;
pub mod value_objects;

pub use caller::{Caller, Role};
pub use invariants::{check_all_invariants, InvariantCheckResult, InvariantViolation};
pub use value_objects::{Address, Amount, RefId, UnitType};
