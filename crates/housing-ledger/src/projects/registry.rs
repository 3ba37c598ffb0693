use crate::domain::{Address, Amount, RefId, UnitType};
use crate::errors::LedgerError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A housing project.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Project reference.
    pub project_ref: RefId,
    /// Buyer-category restriction flag (e.g. first-time buyers only).
    pub restricted: bool,
    /// Set once at registration.
    pub initialised: bool,
    /// Units registered under this project, in registration order.
    pub unit_refs: Vec<RefId>,
}

/// An individually allocable dwelling.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HousingUnit {
    /// Globally unique unit reference.
    pub unit_ref: RefId,
    /// Owning project.
    pub project_ref: RefId,
    /// Category.
    pub unit_type: UnitType,
    /// Full purchase price.
    pub total_unit_cost: Amount,
    /// Escrow a member must hold before allocation.
    pub required_deposit: Amount,
    /// Set once at registration.
    pub initialised: bool,
    /// Set once at allocation.
    pub housing_allocated: bool,
    /// Allocated member; `None` until allocation.
    pub owner: Option<Address>,
}

impl HousingUnit {
    /// Returns true if the unit can still be allocated.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.initialised && !self.housing_allocated
    }
}

/// Parameters of a unit registration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitSpec {
    /// Owning project.
    pub project_ref: RefId,
    /// New unit reference.
    pub unit_ref: RefId,
    /// Category.
    pub unit_type: UnitType,
    /// Full purchase price.
    pub total_unit_cost: Amount,
    /// Required escrow.
    pub required_deposit: Amount,
}

/// Project and unit registry.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRegistry {
    projects: BTreeMap<RefId, Project>,
    units: BTreeMap<RefId, HousingUnit>,
}

impl ProjectRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a project.
    pub(crate) fn register_project(
        &mut self,
        project_ref: RefId,
        restricted: bool,
    ) -> Result<&Project, LedgerError> {
        if project_ref.is_empty() {
            return Err(LedgerError::InvalidInput {
                reason: "project reference is empty".to_string(),
            });
        }
        if self.projects.contains_key(&project_ref) {
            return Err(LedgerError::DuplicateProject { project_ref });
        }

        let project = Project {
            project_ref,
            restricted,
            initialised: true,
            unit_refs: Vec::new(),
        };
        Ok(self.projects.entry(project_ref).or_insert(project))
    }

    /// Validates a unit registration without writing anything.
    pub fn check_unit(&self, spec: &UnitSpec) -> Result<(), LedgerError> {
        if spec.unit_ref.is_empty() {
            return Err(LedgerError::InvalidInput {
                reason: "unit reference is empty".to_string(),
            });
        }
        if !self.projects.contains_key(&spec.project_ref) {
            return Err(LedgerError::UnknownProject {
                project_ref: spec.project_ref,
            });
        }
        if self.units.contains_key(&spec.unit_ref) {
            return Err(LedgerError::DuplicateUnit {
                unit_ref: spec.unit_ref,
            });
        }
        if spec.total_unit_cost == 0
            || spec.required_deposit == 0
            || spec.required_deposit > spec.total_unit_cost
        {
            return Err(LedgerError::InvalidCost {
                total_unit_cost: spec.total_unit_cost,
                required_deposit: spec.required_deposit,
            });
        }
        Ok(())
    }

    /// Registers a unit under an existing project.
    pub(crate) fn register_unit(&mut self, spec: UnitSpec) -> Result<&HousingUnit, LedgerError> {
        self.check_unit(&spec)?;

        if let Some(project) = self.projects.get_mut(&spec.project_ref) {
            project.unit_refs.push(spec.unit_ref);
        }
        let unit = HousingUnit {
            unit_ref: spec.unit_ref,
            project_ref: spec.project_ref,
            unit_type: spec.unit_type,
            total_unit_cost: spec.total_unit_cost,
            required_deposit: spec.required_deposit,
            initialised: true,
            housing_allocated: false,
            owner: None,
        };
        Ok(self.units.entry(spec.unit_ref).or_insert(unit))
    }

    /// Marks a unit allocated to `owner`.
    ///
    /// Only the allocation engine calls this, after all checks passed.
    pub(crate) fn assign_owner(&mut self, unit_ref: RefId, owner: Address) {
        if let Some(unit) = self.units.get_mut(&unit_ref) {
            unit.housing_allocated = true;
            unit.owner = Some(owner);
        }
    }

    /// Looks up a project.
    #[must_use]
    pub fn project(&self, project_ref: RefId) -> Option<&Project> {
        self.projects.get(&project_ref)
    }

    /// Looks up a unit.
    #[must_use]
    pub fn unit(&self, unit_ref: RefId) -> Option<&HousingUnit> {
        self.units.get(&unit_ref)
    }

    /// Projects in reference order.
    pub fn projects(&self) -> impl Iterator<Item = &Project> {
        self.projects.values()
    }

    /// Units in reference order.
    pub fn units(&self) -> impl Iterator<Item = &HousingUnit> {
        self.units.values()
    }

    /// Number of registered units.
    #[must_use]
    pub fn unit_count(&self) -> usize {
        self.units.len()
    }
}
