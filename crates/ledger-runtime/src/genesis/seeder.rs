//! # Genesis Seeder
//!
//! Validates and applies the genesis project list.

use std::collections::HashSet;

use housing_ledger::domain::{Amount, Caller, RefId, UnitType};
use housing_ledger::errors::LedgerError;
use housing_ledger::ports::HousingProgramApi;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

/// Genesis errors.
#[derive(Debug, Error)]
pub enum GenesisError {
    /// Invalid genesis configuration.
    #[error("Invalid genesis configuration: {0}")]
    InvalidConfig(String),

    /// Genesis has projects but nobody may register them.
    #[error("Genesis projects require at least one admin")]
    NoAdmin,

    /// The ledger rejected a genesis entry.
    #[error("Genesis entry {entry} rejected: {source}")]
    Rejected {
        /// Project or unit label.
        entry: String,
        /// Ledger error.
        #[source]
        source: LedgerError,
    },
}

/// A unit seeded at boot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisUnit {
    /// Unit label, at most 32 bytes.
    pub unit_ref: String,
    /// Category.
    pub unit_type: UnitType,
    /// Full purchase price.
    pub total_unit_cost: Amount,
    /// Required escrow before allocation.
    pub required_deposit: Amount,
}

/// A project seeded at boot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisProject {
    /// Project label, at most 32 bytes.
    pub project_ref: String,
    /// Buyer-category restriction flag.
    #[serde(default)]
    pub restricted: bool,
    /// Units under this project.
    #[serde(default)]
    pub units: Vec<GenesisUnit>,
}

/// Genesis configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenesisConfig {
    /// Projects to register.
    pub projects: Vec<GenesisProject>,
}

impl GenesisConfig {
    /// Returns true if there is nothing to seed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    /// Validate the configuration.
    ///
    /// Catches what can be caught before touching the ledger: bad labels
    /// and references repeated within the file.
    pub fn validate(&self) -> Result<(), GenesisError> {
        let mut projects = HashSet::new();
        let mut units = HashSet::new();

        for project in &self.projects {
            parse_label(&project.project_ref)?;
            if !projects.insert(project.project_ref.as_str()) {
                return Err(GenesisError::InvalidConfig(format!(
                    "project {} listed twice",
                    project.project_ref
                )));
            }
            for unit in &project.units {
                parse_label(&unit.unit_ref)?;
                if !units.insert(unit.unit_ref.as_str()) {
                    return Err(GenesisError::InvalidConfig(format!(
                        "unit {} listed twice",
                        unit.unit_ref
                    )));
                }
            }
        }
        Ok(())
    }
}

/// What genesis registered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenesisSummary {
    /// Projects registered.
    pub projects: usize,
    /// Units registered.
    pub units: usize,
}

fn parse_label(label: &str) -> Result<RefId, GenesisError> {
    let reference =
        RefId::from_label(label).map_err(|e| GenesisError::InvalidConfig(e.to_string()))?;
    if reference.is_empty() {
        return Err(GenesisError::InvalidConfig("empty reference label".to_string()));
    }
    Ok(reference)
}

/// Registers every genesis project and unit as `admin`.
///
/// Stops at the first rejected entry; entries before it stay registered.
pub fn apply_genesis<A>(
    api: &A,
    admin: Option<Caller>,
    config: &GenesisConfig,
) -> Result<GenesisSummary, GenesisError>
where
    A: HousingProgramApi + ?Sized,
{
    config.validate()?;
    if config.is_empty() {
        return Ok(GenesisSummary::default());
    }
    let admin = admin.ok_or(GenesisError::NoAdmin)?;

    let mut summary = GenesisSummary::default();
    for project in &config.projects {
        let project_ref = parse_label(&project.project_ref)?;
        api.register_project(admin, project_ref, project.restricted)
            .map_err(|source| GenesisError::Rejected {
                entry: project.project_ref.clone(),
                source,
            })?;
        summary.projects += 1;

        for unit in &project.units {
            api.register_housing_unit(
                admin,
                project_ref,
                parse_label(&unit.unit_ref)?,
                unit.unit_type,
                unit.total_unit_cost,
                unit.required_deposit,
            )
            .map_err(|source| GenesisError::Rejected {
                entry: unit.unit_ref.clone(),
                source,
            })?;
            summary.units += 1;
        }
    }

    info!(
        projects = summary.projects,
        units = summary.units,
        "Genesis projects registered"
    );
    Ok(summary)
}
