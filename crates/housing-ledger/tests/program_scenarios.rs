//! # Housing Program Scenarios
//!
//! End-to-end flows through [`LedgerService`]: registration, deposits and
//! allocation, checked through the read operations and the event log.
//!
//! ## Test Categories
//!
//! 1. **Member Lifecycle** - registration, duplicates, identity validation
//! 2. **Projects and Units** - registration and cost validation
//! 3. **Escrow** - deposits, balances and overpayment handling
//! 4. **Allocation** - the happy path and every rejection
//! 5. **Conservation** - randomized deposit sequences

use housing_ledger::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;

// =============================================================================
// TEST HELPERS
// =============================================================================

const ADMIN: Address = Address::new([0xAD; 20]);
const ALICE: Address = Address::new([0x0A; 20]);
const BOB: Address = Address::new([0x0B; 20]);

fn id(label: &str) -> RefId {
    RefId::from_label(label).unwrap()
}

fn admin() -> Caller {
    Caller::admin(ADMIN)
}

/// Service with one project holding one one-bedroom unit (cost 100, deposit 10).
fn service_with_unit() -> LedgerService<Arc<InMemoryEventLog>> {
    let service = create_test_service();
    service.register_project(admin(), id("project1"), false).unwrap();
    service
        .register_housing_unit(admin(), id("project1"), id("unit1"), UnitType::OneBedroom, 100, 10)
        .unwrap();
    service
}

fn register(service: &impl HousingProgramApi, who: Address, national: &str) {
    service
        .register_member(Caller::member(who), id(national), RefId::EMPTY, false)
        .unwrap();
}

// =============================================================================
// MEMBER LIFECYCLE
// =============================================================================

#[test]
fn test_register_member_and_read_back() {
    let service = create_test_service();
    let envelope = service
        .register_member(Caller::member(ALICE), id("1234567890"), RefId::EMPTY, false)
        .unwrap();

    assert_eq!(envelope.sequence, 1);
    assert_eq!(
        envelope.event,
        LedgerEvent::MemberRegistered {
            member: ALICE,
            married: false
        }
    );

    let member = service.get_member_data(ALICE);
    assert!(member.registered);
    assert_eq!(member.owner, ALICE);
    assert_eq!(member.national_id_ref, id("1234567890"));
    assert_eq!(member.deposit_balance, 0);
    assert!(!member.housing_allocated);
}

#[test]
fn test_empty_national_id_message() {
    let service = create_test_service();
    let err = service
        .register_member(Caller::member(ALICE), RefId::EMPTY, RefId::EMPTY, false)
        .unwrap_err();

    assert_eq!(err.to_string(), "National Identity Number has invalid value.");
    assert!(!service.get_member_data(ALICE).registered);
    assert!(service.sink().is_empty());
}

#[test]
fn test_married_member_needs_spouse() {
    let service = create_test_service();
    let err = service
        .register_member(Caller::member(ALICE), id("1234567890"), RefId::EMPTY, true)
        .unwrap_err();
    assert_eq!(err, LedgerError::InvalidIdentity(IdentityField::SpouseId));

    service
        .register_member(Caller::member(ALICE), id("1234567890"), id("0987654321"), true)
        .unwrap();
    let member = service.get_member_data(ALICE);
    assert!(member.married);
    assert_eq!(member.spouse_id_ref, id("0987654321"));
}

#[test]
fn test_reregistration_keeps_original_record() {
    let service = create_test_service();
    register(&service, ALICE, "first");

    let err = service
        .register_member(Caller::member(ALICE), id("second"), RefId::EMPTY, false)
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Duplicate);
    assert_eq!(service.get_member_data(ALICE).national_id_ref, id("first"));
}

#[test]
fn test_unknown_reads_are_zero_valued() {
    let service = create_test_service();
    assert_eq!(service.get_member_data(BOB), Member::default());
    assert_eq!(service.get_housing_unit_data(id("nope")), HousingUnit::default());
    assert_eq!(service.get_project_data(id("nope")), Project::default());
    assert_eq!(service.get_member_balance(BOB), 0);
    assert!(service.get_deposit_history(BOB).is_empty());
}

// =============================================================================
// PROJECTS AND UNITS
// =============================================================================

#[test]
fn test_register_unit_and_read_back() {
    let service = service_with_unit();

    let unit = service.get_housing_unit_data(id("unit1"));
    assert!(unit.initialised);
    assert!(!unit.housing_allocated);
    assert_eq!(unit.owner, None);
    assert_eq!(unit.unit_type, UnitType::OneBedroom);
    assert_eq!(unit.total_unit_cost, 100);
    assert_eq!(unit.required_deposit, 10);
    assert_eq!(unit.project_ref, id("project1"));

    let project = service.get_project_data(id("project1"));
    assert!(project.initialised);
    assert_eq!(project.unit_refs, vec![id("unit1")]);
}

#[test]
fn test_unit_under_unknown_project() {
    let service = create_test_service();
    let err = service
        .register_housing_unit(admin(), id("ghost"), id("unit1"), UnitType::Bedsitter, 100, 10)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(!service.get_housing_unit_data(id("unit1")).initialised);
}

#[test]
fn test_unit_refs_are_global() {
    let service = service_with_unit();
    service.register_project(admin(), id("project2"), true).unwrap();

    let err = service
        .register_housing_unit(admin(), id("project2"), id("unit1"), UnitType::TwoBedroom, 200, 20)
        .unwrap_err();
    assert_eq!(err, LedgerError::DuplicateUnit { unit_ref: id("unit1") });
    assert_eq!(
        service.get_housing_unit_data(id("unit1")).project_ref,
        id("project1")
    );
}

#[test]
fn test_cost_validation() {
    let service = create_test_service();
    service.register_project(admin(), id("p"), false).unwrap();

    for (cost, deposit) in [(0, 0), (100, 0), (0, 10), (100, 101)] {
        let err = service
            .register_housing_unit(admin(), id("p"), id("u"), UnitType::Bedsitter, cost, deposit)
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidCost { .. }), "{cost}/{deposit}");
    }

    service
        .register_housing_unit(admin(), id("p"), id("u"), UnitType::Bedsitter, 100, 100)
        .unwrap();
}

// =============================================================================
// ESCROW
// =============================================================================

#[test]
fn test_deposit_updates_balance() {
    let service = service_with_unit();
    register(&service, ALICE, "1234567890");

    let envelope = service
        .deposit_funds(Caller::member(ALICE), Some(id("unit1")), 5)
        .unwrap();

    assert_eq!(
        envelope.event,
        LedgerEvent::FundsDeposited {
            member: ALICE,
            unit_ref: Some(id("unit1")),
            amount: 5,
            balance: 5,
        }
    );
    assert_eq!(service.get_member_balance(ALICE), 5);
    assert_eq!(service.get_member_data(ALICE).deposit_balance, 5);
    assert_eq!(service.get_deposit_history(ALICE).len(), 1);
}

#[test]
fn test_unregistered_deposit_rejected() {
    let service = service_with_unit();
    let err = service.deposit_funds(Caller::member(BOB), None, 5).unwrap_err();
    assert_eq!(err, LedgerError::NotRegistered { address: BOB });
    assert_eq!(service.get_member_balance(BOB), 0);
}

#[test]
fn test_deposit_to_unknown_unit() {
    let service = service_with_unit();
    register(&service, ALICE, "1234567890");
    let err = service
        .deposit_funds(Caller::member(ALICE), Some(id("ghost")), 5)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(service.get_member_balance(ALICE), 0);
}

#[test]
fn test_tagged_overpayment_rejected_untagged_accepted() {
    let service = service_with_unit();
    register(&service, ALICE, "1234567890");
    let alice = Caller::member(ALICE);

    service.deposit_funds(alice, Some(id("unit1")), 8).unwrap();
    let err = service.deposit_funds(alice, Some(id("unit1")), 3).unwrap_err();
    assert!(matches!(err, LedgerError::Overpayment { attempted: 11, .. }));
    assert_eq!(service.get_member_balance(ALICE), 8);

    service.deposit_funds(alice, None, 3).unwrap();
    assert_eq!(service.get_member_balance(ALICE), 11);
}

#[test]
fn test_accept_policy_takes_overpayment() {
    let config = LedgerConfig {
        overpayment: OverpaymentPolicy::Accept,
        ..LedgerConfig::default()
    };
    let service = LedgerService::new(config, NullEventSink);
    service.register_project(admin(), id("p"), false).unwrap();
    service
        .register_housing_unit(admin(), id("p"), id("u"), UnitType::Bedsitter, 50, 10)
        .unwrap();
    register(&service, ALICE, "1234567890");

    service.deposit_funds(Caller::member(ALICE), Some(id("u")), 25).unwrap();
    assert_eq!(service.get_member_balance(ALICE), 25);
}

// =============================================================================
// ALLOCATION
// =============================================================================

#[test]
fn test_full_allocation_flow() {
    let service = service_with_unit();
    register(&service, ALICE, "1234567890");
    service
        .deposit_funds(Caller::member(ALICE), Some(id("unit1")), 10)
        .unwrap();

    let envelope = service
        .allocate_housing_unit(admin(), ALICE, id("unit1"))
        .unwrap();
    assert_eq!(
        envelope.event,
        LedgerEvent::HousingUnitAllocated {
            member: ALICE,
            unit_ref: id("unit1")
        }
    );

    let unit = service.get_housing_unit_data(id("unit1"));
    assert!(unit.housing_allocated);
    assert_eq!(unit.owner, Some(ALICE));
    assert!(service.get_member_data(ALICE).housing_allocated);

    // Escrow is not consumed.
    assert_eq!(service.get_member_balance(ALICE), 10);

    let names: Vec<&str> = service
        .sink()
        .events()
        .iter()
        .map(|e| e.event.name())
        .collect();
    assert_eq!(
        names,
        vec![
            "project_registered",
            "housing_unit_registered",
            "member_registered",
            "funds_deposited",
            "housing_unit_allocated",
        ]
    );
    assert!(service.verify_invariants().is_valid());
}

#[test]
fn test_insufficient_deposit_changes_nothing() {
    let service = service_with_unit();
    register(&service, ALICE, "1234567890");
    service
        .deposit_funds(Caller::member(ALICE), Some(id("unit1")), 5)
        .unwrap();

    let before = service.snapshot();
    let events_before = service.sink().len();

    let err = service
        .allocate_housing_unit(admin(), ALICE, id("unit1"))
        .unwrap_err();

    assert_eq!(
        err,
        LedgerError::InsufficientDeposit {
            required: 10,
            available: 5
        }
    );
    assert_eq!(service.snapshot(), before);
    assert_eq!(service.sink().len(), events_before);
}

#[test]
fn test_unit_cannot_be_allocated_twice() {
    let service = service_with_unit();
    register(&service, ALICE, "alice");
    register(&service, BOB, "bob");
    service.deposit_funds(Caller::member(ALICE), None, 10).unwrap();
    service.deposit_funds(Caller::member(BOB), None, 10).unwrap();

    service.allocate_housing_unit(admin(), ALICE, id("unit1")).unwrap();
    let err = service
        .allocate_housing_unit(admin(), BOB, id("unit1"))
        .unwrap_err();

    assert_eq!(
        err,
        LedgerError::AlreadyAllocated(AllocationConflict::Unit {
            unit_ref: id("unit1"),
            owner: ALICE
        })
    );
    assert_eq!(service.get_housing_unit_data(id("unit1")).owner, Some(ALICE));
    assert!(!service.get_member_data(BOB).housing_allocated);
}

#[test]
fn test_member_holds_at_most_one_unit() {
    let service = service_with_unit();
    service
        .register_housing_unit(admin(), id("project1"), id("unit2"), UnitType::Bedsitter, 50, 5)
        .unwrap();
    register(&service, ALICE, "alice");
    service.deposit_funds(Caller::member(ALICE), None, 10).unwrap();

    service.allocate_housing_unit(admin(), ALICE, id("unit1")).unwrap();
    let err = service
        .allocate_housing_unit(admin(), ALICE, id("unit2"))
        .unwrap_err();

    assert_eq!(
        err,
        LedgerError::AlreadyAllocated(AllocationConflict::Member { address: ALICE })
    );
    assert!(service.get_housing_unit_data(id("unit2")).is_available());
}

#[test]
fn test_deposit_to_allocated_unit_rejected() {
    let service = service_with_unit();
    register(&service, ALICE, "alice");
    register(&service, BOB, "bob");
    service.deposit_funds(Caller::member(ALICE), None, 10).unwrap();
    service.allocate_housing_unit(admin(), ALICE, id("unit1")).unwrap();

    let err = service
        .deposit_funds(Caller::member(BOB), Some(id("unit1")), 1)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AlreadyAllocated);
    assert_eq!(service.get_member_balance(BOB), 0);
}

#[test]
fn test_allocation_of_unregistered_member_or_unknown_unit() {
    let service = service_with_unit();
    let err = service
        .allocate_housing_unit(admin(), BOB, id("unit1"))
        .unwrap_err();
    assert_eq!(err, LedgerError::NotRegistered { address: BOB });

    register(&service, BOB, "bob");
    let err = service
        .allocate_housing_unit(admin(), BOB, id("ghost"))
        .unwrap_err();
    assert_eq!(err, LedgerError::UnknownUnit { unit_ref: id("ghost") });
}

// =============================================================================
// CONSERVATION
// =============================================================================

#[test]
fn test_escrow_total_matches_accepted_deposits() {
    let mut rng = StdRng::seed_from_u64(0xB0_3A);
    let service = create_test_service();
    service.register_project(admin(), id("p"), false).unwrap();
    service
        .register_housing_unit(admin(), id("p"), id("u"), UnitType::TwoBedroom, 1_000, 60)
        .unwrap();

    let members: Vec<Address> = (1..=6u8).map(|b| Address::new([b; 20])).collect();
    for (i, member) in members.iter().enumerate() {
        register(&service, *member, &format!("national-{i}"));
    }

    let mut accepted: Amount = 0;
    for _ in 0..200 {
        let member = members[rng.gen_range(0..members.len())];
        let amount: Amount = rng.gen_range(0..25);
        let unit_ref = if rng.gen_bool(0.5) { Some(id("u")) } else { None };

        if service
            .deposit_funds(Caller::member(member), unit_ref, amount)
            .is_ok()
        {
            accepted += amount;
        }
    }

    let snapshot = service.snapshot();
    let balances: Amount = members.iter().map(|m| service.get_member_balance(*m)).sum();
    let receipts: Amount = snapshot.deposits.iter().map(|r| r.amount).sum();

    assert_eq!(snapshot.total_escrow, accepted);
    assert_eq!(balances, accepted);
    assert_eq!(receipts, accepted);
    assert!(service.verify_invariants().is_valid());
}
