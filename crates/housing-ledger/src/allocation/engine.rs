use crate::domain::{Address, Amount, Caller, RefId};
use crate::errors::{AllocationConflict, LedgerError};
use crate::escrow::EscrowLedger;
use crate::identity::IdentityRegistry;
use crate::projects::ProjectRegistry;
use serde::{Deserialize, Serialize};

/// Operation name used in authorization errors.
pub const ALLOCATE_OPERATION: &str = "allocate_housing_unit";

/// A fully checked allocation, ready to apply.
///
/// Fields are private and the only constructor is [`AllocationEngine::plan`],
/// so a plan always means every precondition held against the state it was
/// planned on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationPlan {
    member: Address,
    unit_ref: RefId,
    required_deposit: Amount,
    balance: Amount,
}

impl AllocationPlan {
    /// Member receiving the unit.
    #[must_use]
    pub fn member(&self) -> Address {
        self.member
    }

    /// Unit being allocated.
    #[must_use]
    pub fn unit_ref(&self) -> RefId {
        self.unit_ref
    }
}

/// Outcome of a successful allocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    /// New owner.
    pub member: Address,
    /// Allocated unit.
    pub unit_ref: RefId,
    /// The unit's required deposit.
    pub required_deposit: Amount,
    /// Member's escrow balance when the allocation was checked.
    pub escrow_balance: Amount,
}

/// The only authority over the allocated state.
pub struct AllocationEngine;

impl AllocationEngine {
    /// Runs every allocation check without touching state.
    ///
    /// Check order: role, member registration, unit existence, unit
    /// availability, member availability, escrow sufficiency.
    pub fn plan(
        caller: &Caller,
        member: Address,
        unit_ref: RefId,
        identity: &IdentityRegistry,
        projects: &ProjectRegistry,
        escrow: &EscrowLedger,
    ) -> Result<AllocationPlan, LedgerError> {
        caller.require_admin(ALLOCATE_OPERATION)?;

        let record = identity
            .get(member)
            .filter(|m| m.registered)
            .ok_or(LedgerError::NotRegistered { address: member })?;

        let unit = projects
            .unit(unit_ref)
            .filter(|u| u.initialised)
            .ok_or(LedgerError::UnknownUnit { unit_ref })?;

        if unit.housing_allocated {
            return Err(LedgerError::AlreadyAllocated(AllocationConflict::Unit {
                unit_ref,
                owner: unit.owner.unwrap_or(Address::ZERO),
            }));
        }
        if record.housing_allocated {
            return Err(LedgerError::AlreadyAllocated(AllocationConflict::Member {
                address: member,
            }));
        }

        let balance = escrow.balance_of(member);
        if balance < unit.required_deposit {
            return Err(LedgerError::InsufficientDeposit {
                required: unit.required_deposit,
                available: balance,
            });
        }

        Ok(AllocationPlan {
            member,
            unit_ref,
            required_deposit: unit.required_deposit,
            balance,
        })
    }

    /// Applies a plan. Infallible: all checks happened in [`Self::plan`].
    ///
    /// Must run against the same state the plan was made on, with no
    /// mutation in between.
    pub(crate) fn apply(
        plan: AllocationPlan,
        identity: &mut IdentityRegistry,
        projects: &mut ProjectRegistry,
    ) -> Allocation {
        projects.assign_owner(plan.unit_ref, plan.member);
        identity.mark_housed(plan.member);

        Allocation {
            member: plan.member,
            unit_ref: plan.unit_ref,
            required_deposit: plan.required_deposit,
            escrow_balance: plan.balance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OverpaymentPolicy;
    use crate::domain::UnitType;
    use crate::errors::ErrorKind;
    use crate::projects::UnitSpec;

    struct Fixture {
        identity: IdentityRegistry,
        projects: ProjectRegistry,
        escrow: EscrowLedger,
    }

    const ADMIN: Address = Address::new([0xAD; 20]);
    const MEMBER: Address = Address::new([0x01; 20]);

    fn unit_ref() -> RefId {
        RefId::from_label("unit1").unwrap()
    }

    fn fixture(balance: Amount) -> Fixture {
        let mut identity = IdentityRegistry::new();
        identity
            .register(
                MEMBER,
                RefId::from_label("1234567890").unwrap(),
                RefId::EMPTY,
                false,
                true,
            )
            .unwrap();

        let mut projects = ProjectRegistry::new();
        let project_ref = RefId::from_label("project1").unwrap();
        projects.register_project(project_ref, false).unwrap();
        projects
            .register_unit(UnitSpec {
                project_ref,
                unit_ref: unit_ref(),
                unit_type: UnitType::OneBedroom,
                total_unit_cost: 100,
                required_deposit: 10,
            })
            .unwrap();

        let mut escrow = EscrowLedger::new();
        if balance > 0 {
            escrow
                .deposit(MEMBER, None, balance, OverpaymentPolicy::Reject)
                .unwrap();
        }
        Fixture {
            identity,
            projects,
            escrow,
        }
    }

    fn plan(f: &Fixture, caller: Caller, member: Address) -> Result<AllocationPlan, LedgerError> {
        AllocationEngine::plan(&caller, member, unit_ref(), &f.identity, &f.projects, &f.escrow)
    }

    #[test]
    fn test_plan_and_apply() {
        let mut f = fixture(10);
        let plan = plan(&f, Caller::admin(ADMIN), MEMBER).unwrap();
        let allocation = AllocationEngine::apply(plan, &mut f.identity, &mut f.projects);

        assert_eq!(allocation.member, MEMBER);
        assert_eq!(allocation.escrow_balance, 10);
        let unit = f.projects.unit(unit_ref()).unwrap();
        assert!(unit.housing_allocated);
        assert_eq!(unit.owner, Some(MEMBER));
        assert!(f.identity.get(MEMBER).unwrap().housing_allocated);
        // Escrow is not consumed.
        assert_eq!(f.escrow.balance_of(MEMBER), 10);
    }

    #[test]
    fn test_non_admin_rejected_first() {
        // Even with an unknown member, the role check wins.
        let f = fixture(0);
        let err = plan(&f, Caller::member(MEMBER), Address::new([9; 20])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
    }

    #[test]
    fn test_unregistered_member() {
        let f = fixture(10);
        let err = plan(&f, Caller::admin(ADMIN), Address::new([9; 20])).unwrap_err();
        assert!(matches!(err, LedgerError::NotRegistered { .. }));
    }

    #[test]
    fn test_unknown_unit() {
        let f = fixture(10);
        let err = AllocationEngine::plan(
            &Caller::admin(ADMIN),
            MEMBER,
            RefId::from_label("ghost").unwrap(),
            &f.identity,
            &f.projects,
            &f.escrow,
        )
        .unwrap_err();
        assert!(matches!(err, LedgerError::UnknownUnit { .. }));
    }

    #[test]
    fn test_insufficient_deposit() {
        let f = fixture(5);
        let err = plan(&f, Caller::admin(ADMIN), MEMBER).unwrap_err();
        assert_eq!(
            err,
            LedgerError::InsufficientDeposit {
                required: 10,
                available: 5
            }
        );
    }

    #[test]
    fn test_second_allocation_rejected() {
        let mut f = fixture(10);
        let first = plan(&f, Caller::admin(ADMIN), MEMBER).unwrap();
        AllocationEngine::apply(first, &mut f.identity, &mut f.projects);

        let err = plan(&f, Caller::admin(ADMIN), MEMBER).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyAllocated);
        assert_eq!(f.projects.unit(unit_ref()).unwrap().owner, Some(MEMBER));
    }
}
