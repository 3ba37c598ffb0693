//! # Access Control Tests
//!
//! Attempts to reach admin-only transitions without the admin role, and to
//! act on behalf of other addresses. Every attempt must fail with no state
//! change and no event.

use housing_ledger::prelude::*;

const ADMIN: Address = Address::new([0xAD; 20]);
const MALLORY: Address = Address::new([0x66; 20]);
const ALICE: Address = Address::new([0x0A; 20]);

fn id(label: &str) -> RefId {
    RefId::from_label(label).unwrap()
}

fn assert_unauthorized(err: &LedgerError, operation: &str) {
    match err {
        LedgerError::Unauthorized {
            caller,
            operation: op,
        } => {
            assert_eq!(*caller, MALLORY);
            assert_eq!(*op, operation);
        }
        other => panic!("expected Unauthorized, got {other:?}"),
    }
}

/// ATTACK: a member registers a project
#[test]
fn attack_member_registers_project() {
    let service = create_test_service();
    let err = service
        .register_project(Caller::member(MALLORY), id("p"), false)
        .unwrap_err();

    assert_unauthorized(&err, "register_project");
    assert!(!service.get_project_data(id("p")).initialised);
    assert!(service.sink().is_empty());
}

/// ATTACK: a member registers a unit under a real project
#[test]
fn attack_member_registers_unit() {
    let service = create_test_service();
    service.register_project(Caller::admin(ADMIN), id("p"), false).unwrap();

    let err = service
        .register_housing_unit(Caller::member(MALLORY), id("p"), id("u"), UnitType::Bedsitter, 10, 1)
        .unwrap_err();

    assert_unauthorized(&err, "register_housing_unit");
    assert!(service.get_project_data(id("p")).unit_refs.is_empty());
}

/// ATTACK: a funded member allocates a unit to themselves
#[test]
fn attack_member_self_allocates() {
    let service = create_test_service();
    let admin = Caller::admin(ADMIN);
    service.register_project(admin, id("p"), false).unwrap();
    service
        .register_housing_unit(admin, id("p"), id("u"), UnitType::Bedsitter, 10, 1)
        .unwrap();

    let mallory = Caller::member(MALLORY);
    service.register_member(mallory, id("m"), RefId::EMPTY, false).unwrap();
    service.deposit_funds(mallory, None, 5).unwrap();

    let before = service.snapshot();
    let err = service
        .allocate_housing_unit(mallory, MALLORY, id("u"))
        .unwrap_err();

    assert_unauthorized(&err, "allocate_housing_unit");
    assert_eq!(service.snapshot(), before);
}

/// Role is checked before anything else, even for nonexistent targets.
#[test]
fn attack_role_checked_first() {
    let service = create_test_service();
    let err = service
        .allocate_housing_unit(Caller::member(MALLORY), ALICE, id("ghost"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);
}

/// ATTACK: registering from the zero address
#[test]
fn attack_zero_address_registration() {
    let service = create_test_service();
    let err = service
        .register_member(Caller::member(Address::ZERO), id("x"), RefId::EMPTY, false)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    assert!(!service.get_member_data(Address::ZERO).registered);
}

/// A deposit only ever credits the caller.
#[test]
fn deposit_credits_caller_only() {
    let service = create_test_service();
    service
        .register_member(Caller::member(ALICE), id("a"), RefId::EMPTY, false)
        .unwrap();
    service
        .register_member(Caller::member(MALLORY), id("m"), RefId::EMPTY, false)
        .unwrap();

    service.deposit_funds(Caller::member(MALLORY), None, 7).unwrap();
    assert_eq!(service.get_member_balance(MALLORY), 7);
    assert_eq!(service.get_member_balance(ALICE), 0);
}

/// Admins are not implicitly members.
#[test]
fn admin_without_registration_cannot_deposit() {
    let service = create_test_service();
    let err = service
        .deposit_funds(Caller::admin(ADMIN), None, 1)
        .unwrap_err();
    assert_eq!(err, LedgerError::NotRegistered { address: ADMIN });
}

#[test]
fn rejections_are_counted_by_kind() {
    let service = create_test_service();
    let _ = service.register_project(Caller::member(MALLORY), id("p"), false);
    let _ = service.register_project(Caller::member(MALLORY), id("q"), false);

    let stats = service.stats();
    assert_eq!(stats.applied, 0);
    assert_eq!(stats.rejected, 2);
    assert_eq!(stats.rejected_by_kind.get(&ErrorKind::Unauthorized), Some(&2));
}
