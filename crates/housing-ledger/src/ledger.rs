//! # Housing Ledger
//!
//! The explicit state container. It owns the three registries and exposes
//! every operation as a method: mutations take `&mut self`, so exclusive
//! access covers the whole check-then-write sequence of each call.
//!
//! Each mutation returns the [`LedgerEvent`] describing what changed; an
//! `Err` means nothing changed.

use crate::allocation::{AllocationEngine, ALLOCATE_OPERATION};
use crate::config::LedgerConfig;
use crate::domain::{Address, Amount, Caller, RefId, UnitType};
use crate::errors::LedgerError;
use crate::escrow::{DepositReceipt, EscrowLedger};
use crate::events::LedgerEvent;
use crate::identity::{IdentityRegistry, Member};
use crate::projects::{HousingUnit, Project, ProjectRegistry, UnitSpec};
use serde::{Deserialize, Serialize};

const REGISTER_PROJECT_OPERATION: &str = "register_project";
const REGISTER_UNIT_OPERATION: &str = "register_housing_unit";

/// Complete, comparable view of the ledger state.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    /// Members in address order, balances filled in.
    pub members: Vec<Member>,
    /// Projects in reference order.
    pub projects: Vec<Project>,
    /// Units in reference order.
    pub units: Vec<HousingUnit>,
    /// Every deposit receipt.
    pub deposits: Vec<DepositReceipt>,
    /// Sum of all escrow balances.
    pub total_escrow: Amount,
}

/// Single-ledger state machine for the housing program.
#[derive(Clone, Debug, Default)]
pub struct HousingLedger {
    config: LedgerConfig,
    identity: IdentityRegistry,
    projects: ProjectRegistry,
    escrow: EscrowLedger,
}

impl HousingLedger {
    /// Empty ledger with the given policies.
    #[must_use]
    pub fn new(config: LedgerConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Active policies.
    #[must_use]
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    // =========================================================================
    // IDENTITY
    // =========================================================================

    /// Registers the caller as a member.
    pub fn register_member(
        &mut self,
        caller: &Caller,
        national_id_ref: RefId,
        spouse_id_ref: RefId,
        married: bool,
    ) -> Result<LedgerEvent, LedgerError> {
        caller.require_valid_address()?;
        let record = self.identity.register(
            caller.address,
            national_id_ref,
            spouse_id_ref,
            married,
            self.config.require_spouse_when_married,
        )?;
        Ok(LedgerEvent::MemberRegistered {
            member: record.owner,
            married: record.married,
        })
    }

    /// Member snapshot; zero-valued for unknown addresses.
    #[must_use]
    pub fn get_member_data(&self, address: Address) -> Member {
        self.identity
            .get(address)
            .map(|record| record.snapshot(self.escrow.balance_of(address)))
            .unwrap_or_default()
    }

    /// Returns true if `address` is a registered member.
    #[must_use]
    pub fn is_registered(&self, address: Address) -> bool {
        self.identity.is_registered(address)
    }

    // =========================================================================
    // PROJECTS AND UNITS
    // =========================================================================

    /// Registers a project. Admin only.
    pub fn register_project(
        &mut self,
        caller: &Caller,
        project_ref: RefId,
        restricted: bool,
    ) -> Result<LedgerEvent, LedgerError> {
        caller.require_admin(REGISTER_PROJECT_OPERATION)?;
        let project = self.projects.register_project(project_ref, restricted)?;
        Ok(LedgerEvent::ProjectRegistered {
            project_ref: project.project_ref,
            restricted: project.restricted,
        })
    }

    /// Registers a unit under an existing project. Admin only.
    pub fn register_housing_unit(
        &mut self,
        caller: &Caller,
        project_ref: RefId,
        unit_ref: RefId,
        unit_type: UnitType,
        total_unit_cost: Amount,
        required_deposit: Amount,
    ) -> Result<LedgerEvent, LedgerError> {
        caller.require_admin(REGISTER_UNIT_OPERATION)?;
        let unit = self.projects.register_unit(UnitSpec {
            project_ref,
            unit_ref,
            unit_type,
            total_unit_cost,
            required_deposit,
        })?;
        Ok(LedgerEvent::HousingUnitRegistered {
            project_ref: unit.project_ref,
            unit_ref: unit.unit_ref,
            unit_type: unit.unit_type,
            total_unit_cost: unit.total_unit_cost,
            required_deposit: unit.required_deposit,
        })
    }

    /// Unit snapshot; zero-valued for unknown references.
    #[must_use]
    pub fn get_housing_unit_data(&self, unit_ref: RefId) -> HousingUnit {
        self.projects.unit(unit_ref).cloned().unwrap_or_default()
    }

    /// Project snapshot; zero-valued for unknown references.
    #[must_use]
    pub fn get_project_data(&self, project_ref: RefId) -> Project {
        self.projects.project(project_ref).cloned().unwrap_or_default()
    }

    // =========================================================================
    // ESCROW
    // =========================================================================

    /// Credits the caller's escrow with `amount`, optionally tagged for a unit.
    pub fn deposit_funds(
        &mut self,
        caller: &Caller,
        unit_ref: Option<RefId>,
        amount: Amount,
    ) -> Result<LedgerEvent, LedgerError> {
        if !self.identity.is_registered(caller.address) {
            return Err(LedgerError::NotRegistered {
                address: caller.address,
            });
        }

        let target = match unit_ref {
            Some(unit_ref) => Some(
                self.projects
                    .unit(unit_ref)
                    .ok_or(LedgerError::UnknownUnit { unit_ref })?,
            ),
            None => None,
        };

        let receipt = self
            .escrow
            .deposit(caller.address, target, amount, self.config.overpayment)?;
        Ok(LedgerEvent::FundsDeposited {
            member: receipt.depositor,
            unit_ref: receipt.unit_ref,
            amount: receipt.amount,
            balance: receipt.balance_after,
        })
    }

    /// Escrow balance; zero for unknown members.
    #[must_use]
    pub fn get_member_balance(&self, address: Address) -> Amount {
        self.escrow.balance_of(address)
    }

    /// Accepted deposits of `address`, oldest first.
    #[must_use]
    pub fn get_deposit_history(&self, address: Address) -> Vec<DepositReceipt> {
        self.escrow.history_of(address).to_vec()
    }

    // =========================================================================
    // ALLOCATION
    // =========================================================================

    /// Allocates `unit_ref` to `member`. Admin only.
    pub fn allocate_housing_unit(
        &mut self,
        caller: &Caller,
        member: Address,
        unit_ref: RefId,
    ) -> Result<LedgerEvent, LedgerError> {
        let plan = AllocationEngine::plan(
            caller,
            member,
            unit_ref,
            &self.identity,
            &self.projects,
            &self.escrow,
        )?;
        let allocation = AllocationEngine::apply(plan, &mut self.identity, &mut self.projects);
        Ok(LedgerEvent::HousingUnitAllocated {
            member: allocation.member,
            unit_ref: allocation.unit_ref,
        })
    }

    // =========================================================================
    // INSPECTION
    // =========================================================================

    /// Read access to the identity registry.
    #[must_use]
    pub fn identity(&self) -> &IdentityRegistry {
        &self.identity
    }

    /// Read access to the project registry.
    #[must_use]
    pub fn projects(&self) -> &ProjectRegistry {
        &self.projects
    }

    /// Read access to the escrow ledger.
    #[must_use]
    pub fn escrow(&self) -> &EscrowLedger {
        &self.escrow
    }

    /// Full state view.
    #[must_use]
    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            members: self
                .identity
                .iter()
                .map(|r| r.snapshot(self.escrow.balance_of(r.owner)))
                .collect(),
            projects: self.projects.projects().cloned().collect(),
            units: self.projects.units().cloned().collect(),
            deposits: self.escrow.receipts().cloned().collect(),
            total_escrow: self.escrow.total_held(),
        }
    }
}

/// Name of an operation, for logs and metric labels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// `register_member`
    RegisterMember,
    /// `register_project`
    RegisterProject,
    /// `register_housing_unit`
    RegisterHousingUnit,
    /// `deposit_funds`
    DepositFunds,
    /// `allocate_housing_unit`
    AllocateHousingUnit,
}

impl Operation {
    /// Stable label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RegisterMember => "register_member",
            Self::RegisterProject => REGISTER_PROJECT_OPERATION,
            Self::RegisterHousingUnit => REGISTER_UNIT_OPERATION,
            Self::DepositFunds => "deposit_funds",
            Self::AllocateHousingUnit => ALLOCATE_OPERATION,
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OverpaymentPolicy;
    use crate::errors::ErrorKind;

    const ADMIN: Address = Address::new([0xAD; 20]);
    const MEMBER: Address = Address::new([0x01; 20]);

    fn id(label: &str) -> RefId {
        RefId::from_label(label).unwrap()
    }

    fn seeded() -> HousingLedger {
        let admin = Caller::admin(ADMIN);
        let mut ledger = HousingLedger::default();
        ledger
            .register_member(&Caller::member(MEMBER), id("1234567890"), RefId::EMPTY, false)
            .unwrap();
        ledger.register_project(&admin, id("project1"), false).unwrap();
        ledger
            .register_housing_unit(&admin, id("project1"), id("unit1"), UnitType::TwoBedroom, 100, 10)
            .unwrap();
        ledger
    }

    #[test]
    fn test_member_data_includes_balance() {
        let mut ledger = seeded();
        ledger
            .deposit_funds(&Caller::member(MEMBER), None, 5)
            .unwrap();

        let member = ledger.get_member_data(MEMBER);
        assert!(member.registered);
        assert_eq!(member.deposit_balance, 5);
        assert_eq!(ledger.get_member_balance(MEMBER), 5);
    }

    #[test]
    fn test_unknown_reads_are_zero_valued() {
        let ledger = HousingLedger::default();
        assert_eq!(ledger.get_member_data(MEMBER), Member::default());
        assert_eq!(ledger.get_housing_unit_data(id("unit1")), HousingUnit::default());
        assert_eq!(ledger.get_project_data(id("p")), Project::default());
        assert_eq!(ledger.get_member_balance(MEMBER), 0);
    }

    #[test]
    fn test_deposit_requires_registration() {
        let mut ledger = seeded();
        let stranger = Caller::member(Address::new([0x55; 20]));
        let before = ledger.snapshot();

        let err = ledger.deposit_funds(&stranger, None, 5).unwrap_err();
        assert!(matches!(err, LedgerError::NotRegistered { .. }));
        assert_eq!(ledger.snapshot(), before);
    }

    #[test]
    fn test_tagged_deposit_unknown_unit() {
        let mut ledger = seeded();
        let err = ledger
            .deposit_funds(&Caller::member(MEMBER), Some(id("ghost")), 5)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_tagged_deposit_policy_from_config() {
        let mut ledger = HousingLedger::new(LedgerConfig {
            overpayment: OverpaymentPolicy::Accept,
            ..LedgerConfig::default()
        });
        let admin = Caller::admin(ADMIN);
        ledger
            .register_member(&Caller::member(MEMBER), id("1"), RefId::EMPTY, false)
            .unwrap();
        ledger.register_project(&admin, id("p"), false).unwrap();
        ledger
            .register_housing_unit(&admin, id("p"), id("u"), UnitType::Bedsitter, 100, 10)
            .unwrap();

        let event = ledger
            .deposit_funds(&Caller::member(MEMBER), Some(id("u")), 50)
            .unwrap();
        assert!(matches!(event, LedgerEvent::FundsDeposited { balance: 50, .. }));
    }

    #[test]
    fn test_zero_address_cannot_register() {
        let mut ledger = HousingLedger::default();
        let err = ledger
            .register_member(&Caller::member(Address::ZERO), id("1"), RefId::EMPTY, false)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn test_allocation_event() {
        let mut ledger = seeded();
        ledger.deposit_funds(&Caller::member(MEMBER), None, 10).unwrap();
        let event = ledger
            .allocate_housing_unit(&Caller::admin(ADMIN), MEMBER, id("unit1"))
            .unwrap();
        assert_eq!(
            event,
            LedgerEvent::HousingUnitAllocated {
                member: MEMBER,
                unit_ref: id("unit1")
            }
        );
    }

    #[test]
    fn test_snapshot_is_serializable() {
        let ledger = seeded();
        let json = serde_json::to_string(&ledger.snapshot()).unwrap();
        let back: LedgerSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ledger.snapshot());
    }
}
