//! # Identity Registry
//!
//! Validates and stores member identity records, keyed by the address that
//! registered them.
//!
//! ## Rules
//!
//! - The national identity reference must be non-empty.
//! - An address registers at most once; the original record is kept.
//! - `owner` is the registering address and never changes.
//! - `housing_allocated` is only ever set by the allocation engine.

pub mod registry;

pub use registry::{IdentityRegistry, Member, MemberRecord};
