//! # Genesis Module
//!
//! Projects and units seeded when the runtime boots.
//!
//! Genesis data is applied by the first configured admin through the
//! ordinary admin operations, so seeded state obeys every rule that
//! later registrations do.
//!
//! ## Initialization Sequence
//!
//! 1. Validate the genesis configuration (labels, duplicates)
//! 2. Register each project
//! 3. Register each project's units in listed order

pub mod seeder;

pub use seeder::{apply_genesis, GenesisConfig, GenesisError, GenesisProject, GenesisSummary, GenesisUnit};
