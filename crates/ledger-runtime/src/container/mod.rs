//! # Runtime Container
//!
//! Configuration of the ledger runtime.

pub mod config;

pub use config::{ConfigError, RuntimeConfig};
