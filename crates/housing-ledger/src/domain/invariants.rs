//! # Ledger Invariants
//!
//! Properties that must hold after every completed operation.
//!
//! - INVARIANT-1: Registered members have a non-empty national identity.
//! - INVARIANT-2: A unit is allocated if and only if it has an owner.
//! - INVARIANT-3: Allocation pairing. Every unit owner is a housed member
//!   and every housed member owns exactly one unit.
//! - INVARIANT-4: Escrow conservation. The running total equals the sum of
//!   balances, and each balance equals the sum of its receipts.
//! - INVARIANT-5: Allocation sufficiency. Every owner's balance covers the
//!   unit's required deposit.

use crate::domain::{Address, Amount, RefId};
use crate::ledger::HousingLedger;
use std::collections::BTreeMap;

/// Result of checking all invariants.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvariantCheckResult {
    /// All invariants hold.
    Valid,
    /// One or more invariants violated.
    Invalid(Vec<InvariantViolation>),
}

impl InvariantCheckResult {
    /// Returns true if every invariant holds.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

/// A specific invariant violation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvariantViolation {
    /// INVARIANT-1.
    EmptyNationalId {
        /// Offending member.
        member: Address,
    },
    /// INVARIANT-2.
    OwnerFlagMismatch {
        /// Offending unit.
        unit_ref: RefId,
    },
    /// INVARIANT-3: an owner that is not a housed member.
    OrphanOwner {
        /// Offending unit.
        unit_ref: RefId,
        /// Its owner.
        owner: Address,
    },
    /// INVARIANT-3: a housed member owning zero or several units.
    HousedMemberUnits {
        /// Offending member.
        member: Address,
        /// Units it owns.
        units: usize,
    },
    /// INVARIANT-4.
    EscrowMismatch {
        /// Running total.
        total: Amount,
        /// Sum of balances.
        balances: Amount,
    },
    /// INVARIANT-4: receipts disagree with a balance.
    ReceiptMismatch {
        /// Offending member.
        member: Address,
    },
    /// INVARIANT-5.
    UnderfundedAllocation {
        /// Offending unit.
        unit_ref: RefId,
    },
}

/// INVARIANT-1: registered members carry a national identity.
#[must_use]
pub fn check_identity_invariant(ledger: &HousingLedger) -> Vec<InvariantViolation> {
    ledger
        .identity()
        .iter()
        .filter(|m| m.registered && m.national_id_ref.is_empty())
        .map(|m| InvariantViolation::EmptyNationalId { member: m.owner })
        .collect()
}

/// INVARIANT-2: `housing_allocated` ⇔ `owner.is_some()`.
#[must_use]
pub fn check_owner_flag_invariant(ledger: &HousingLedger) -> Vec<InvariantViolation> {
    ledger
        .projects()
        .units()
        .filter(|u| u.housing_allocated != u.owner.is_some())
        .map(|u| InvariantViolation::OwnerFlagMismatch {
            unit_ref: u.unit_ref,
        })
        .collect()
}

/// INVARIANT-3: owners and housed members pair up one-to-one.
#[must_use]
pub fn check_pairing_invariant(ledger: &HousingLedger) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();
    let mut owned: BTreeMap<Address, usize> = BTreeMap::new();

    for unit in ledger.projects().units() {
        let Some(owner) = unit.owner else { continue };
        *owned.entry(owner).or_insert(0) += 1;
        let housed = ledger
            .identity()
            .get(owner)
            .is_some_and(|m| m.registered && m.housing_allocated);
        if !housed {
            violations.push(InvariantViolation::OrphanOwner {
                unit_ref: unit.unit_ref,
                owner,
            });
        }
    }

    for member in ledger.identity().iter().filter(|m| m.housing_allocated) {
        let units = owned.get(&member.owner).copied().unwrap_or(0);
        if units != 1 {
            violations.push(InvariantViolation::HousedMemberUnits {
                member: member.owner,
                units,
            });
        }
    }
    violations
}

/// INVARIANT-4: escrow totals add up.
#[must_use]
pub fn check_escrow_invariant(ledger: &HousingLedger) -> Vec<InvariantViolation> {
    let escrow = ledger.escrow();
    let mut violations = Vec::new();

    let balances: Amount = escrow.balances().map(|(_, b)| *b).sum();
    if balances != escrow.total_held() {
        violations.push(InvariantViolation::EscrowMismatch {
            total: escrow.total_held(),
            balances,
        });
    }
    for (member, balance) in escrow.balances() {
        let receipts: Amount = escrow.history_of(*member).iter().map(|r| r.amount).sum();
        if receipts != *balance {
            violations.push(InvariantViolation::ReceiptMismatch { member: *member });
        }
    }
    violations
}

/// INVARIANT-5: allocated units stay covered by their owner's escrow.
#[must_use]
pub fn check_sufficiency_invariant(ledger: &HousingLedger) -> Vec<InvariantViolation> {
    ledger
        .projects()
        .units()
        .filter_map(|u| u.owner.map(|owner| (u, owner)))
        .filter(|(u, owner)| ledger.get_member_balance(*owner) < u.required_deposit)
        .map(|(u, _)| InvariantViolation::UnderfundedAllocation {
            unit_ref: u.unit_ref,
        })
        .collect()
}

/// Check all invariants at once.
#[must_use]
pub fn check_all_invariants(ledger: &HousingLedger) -> InvariantCheckResult {
    let mut violations = check_identity_invariant(ledger);
    violations.extend(check_owner_flag_invariant(ledger));
    violations.extend(check_pairing_invariant(ledger));
    violations.extend(check_escrow_invariant(ledger));
    violations.extend(check_sufficiency_invariant(ledger));

    if violations.is_empty() {
        InvariantCheckResult::Valid
    } else {
        InvariantCheckResult::Invalid(violations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Caller, UnitType};

    #[test]
    fn test_empty_ledger_is_valid() {
        assert!(check_all_invariants(&HousingLedger::default()).is_valid());
    }

    #[test]
    fn test_valid_after_allocation() {
        let admin = Caller::admin(Address::new([0xAD; 20]));
        let member = Caller::member(Address::new([1; 20]));
        let unit = RefId::from_label("u").unwrap();
        let project = RefId::from_label("p").unwrap();

        let mut ledger = HousingLedger::default();
        ledger
            .register_member(&member, RefId::from_label("1").unwrap(), RefId::EMPTY, false)
            .unwrap();
        ledger.register_project(&admin, project, false).unwrap();
        ledger
            .register_housing_unit(&admin, project, unit, UnitType::Bedsitter, 50, 5)
            .unwrap();
        ledger.deposit_funds(&member, Some(unit), 5).unwrap();
        ledger
            .allocate_housing_unit(&admin, member.address, unit)
            .unwrap();

        assert_eq!(check_all_invariants(&ledger), InvariantCheckResult::Valid);
    }
}
