//! # Project/Unit Registry
//!
//! Housing projects and the units registered under them. Unit references
//! are unique across all projects.
//!
//! ## Rules
//!
//! - A unit belongs to an already-registered project.
//! - `total_unit_cost > 0`, `required_deposit > 0` and
//!   `required_deposit <= total_unit_cost`.
//! - `initialised` and `housing_allocated` only go false → true.
//! - `owner` stays `None` until allocation and never changes after.

pub mod registry;

pub use registry::{HousingUnit, Project, ProjectRegistry, UnitSpec};
