//! # Error Types
//!
//! Every ledger failure is a [`LedgerError`]. Each variant belongs to one
//! coarse [`ErrorKind`] so callers can branch on the category without
//! matching every variant.

use crate::domain::value_objects::{Address, Amount, RefId};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// =============================================================================
// ERROR KIND
// =============================================================================

/// Coarse failure category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Malformed or empty identifier, non-positive cost or amount.
    InvalidInput,
    /// Re-registration of an already-used key.
    Duplicate,
    /// The operation targets a key that does not exist.
    NotFound,
    /// The caller lacks the required role.
    Unauthorized,
    /// Re-entry into the terminal allocated state.
    AlreadyAllocated,
    /// Escrow balance below the required threshold.
    InsufficientFunds,
}

impl ErrorKind {
    /// Stable label, used in logs and metric labels.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidInput => "invalid_input",
            Self::Duplicate => "duplicate",
            Self::NotFound => "not_found",
            Self::Unauthorized => "unauthorized",
            Self::AlreadyAllocated => "already_allocated",
            Self::InsufficientFunds => "insufficient_funds",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// IDENTITY FIELDS
// =============================================================================

/// Which identity reference failed validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IdentityField {
    /// The member's own national identity number.
    NationalId,
    /// The spouse's national identity number.
    SpouseId,
}

impl fmt::Display for IdentityField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NationalId => f.write_str("National Identity Number"),
            Self::SpouseId => f.write_str("Spouse National Identity Number"),
        }
    }
}

/// The side of an allocation that is already taken.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AllocationConflict {
    /// The unit already has an owner.
    Unit {
        /// The unit reference.
        unit_ref: RefId,
        /// Its current owner.
        owner: Address,
    },
    /// The member already holds a unit.
    Member {
        /// The member address.
        address: Address,
    },
}

impl fmt::Display for AllocationConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unit { unit_ref, owner } => {
                write!(f, "housing unit {unit_ref} is already allocated to {owner:?}")
            }
            Self::Member { address } => {
                write!(f, "member {address:?} already holds a housing unit")
            }
        }
    }
}

// =============================================================================
// LEDGER ERRORS
// =============================================================================

/// Errors returned by ledger operations.
///
/// A returned error always means nothing was written.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Empty or malformed identity reference.
    #[error("{0} has invalid value.")]
    InvalidIdentity(IdentityField),

    /// Malformed input that is not an identity or a cost.
    #[error("invalid input: {reason}")]
    InvalidInput {
        /// What was wrong.
        reason: String,
    },

    /// The caller address is already a registered member.
    #[error("member {address:?} is already registered")]
    DuplicateMember {
        /// The registered address.
        address: Address,
    },

    /// The project reference is already taken.
    #[error("project {project_ref} is already registered")]
    DuplicateProject {
        /// The project reference.
        project_ref: RefId,
    },

    /// The unit reference is already taken.
    #[error("housing unit {unit_ref} is already registered")]
    DuplicateUnit {
        /// The unit reference.
        unit_ref: RefId,
    },

    /// The project reference is not registered.
    #[error("project {project_ref} is not registered")]
    UnknownProject {
        /// The project reference.
        project_ref: RefId,
    },

    /// The unit reference is not registered.
    #[error("housing unit {unit_ref} is not registered")]
    UnknownUnit {
        /// The unit reference.
        unit_ref: RefId,
    },

    /// Cost and deposit must be positive with deposit not above cost.
    #[error("invalid cost: total {total_unit_cost}, required deposit {required_deposit}")]
    InvalidCost {
        /// Submitted total unit cost.
        total_unit_cost: Amount,
        /// Submitted required deposit.
        required_deposit: Amount,
    },

    /// The address is not a registered member.
    #[error("member {address:?} is not registered")]
    NotRegistered {
        /// The unregistered address.
        address: Address,
    },

    /// A unit-tagged deposit would exceed the unit's required deposit.
    #[error("overpayment for unit {unit_ref}: required {required}, balance would be {attempted}")]
    Overpayment {
        /// The tagged unit.
        unit_ref: RefId,
        /// Its required deposit.
        required: Amount,
        /// Balance after the rejected deposit.
        attempted: Amount,
    },

    /// Accumulated balance would overflow.
    #[error("escrow balance overflow for {address:?}")]
    BalanceOverflow {
        /// The depositor.
        address: Address,
    },

    /// The caller lacks the admin role.
    #[error("unauthorized: {caller:?} may not call {operation}")]
    Unauthorized {
        /// Who called.
        caller: Address,
        /// Which operation.
        operation: &'static str,
    },

    /// The unit or the member is already in the allocated state.
    #[error("already allocated: {0}")]
    AlreadyAllocated(AllocationConflict),

    /// Escrow balance is below the unit's required deposit.
    #[error("insufficient deposit: required {required}, available {available}")]
    InsufficientDeposit {
        /// The unit's required deposit.
        required: Amount,
        /// The member's balance at call time.
        available: Amount,
    },
}

impl LedgerError {
    /// Coarse category of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidIdentity(_)
            | Self::InvalidInput { .. }
            | Self::InvalidCost { .. }
            | Self::Overpayment { .. }
            | Self::BalanceOverflow { .. } => ErrorKind::InvalidInput,
            Self::DuplicateMember { .. }
            | Self::DuplicateProject { .. }
            | Self::DuplicateUnit { .. } => ErrorKind::Duplicate,
            Self::UnknownProject { .. } | Self::UnknownUnit { .. } | Self::NotRegistered { .. } => {
                ErrorKind::NotFound
            }
            Self::Unauthorized { .. } => ErrorKind::Unauthorized,
            Self::AlreadyAllocated(_) => ErrorKind::AlreadyAllocated,
            Self::InsufficientDeposit { .. } => ErrorKind::InsufficientFunds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_message() {
        let err = LedgerError::InvalidIdentity(IdentityField::NationalId);
        assert_eq!(err.to_string(), "National Identity Number has invalid value.");
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn test_kinds() {
        let unit_ref = RefId::from_label("unit1").unwrap();
        assert_eq!(
            LedgerError::DuplicateUnit { unit_ref }.kind(),
            ErrorKind::Duplicate
        );
        assert_eq!(LedgerError::UnknownUnit { unit_ref }.kind(), ErrorKind::NotFound);
        assert_eq!(
            LedgerError::InsufficientDeposit {
                required: 10,
                available: 5
            }
            .kind(),
            ErrorKind::InsufficientFunds
        );
        assert_eq!(
            LedgerError::AlreadyAllocated(AllocationConflict::Member {
                address: Address::ZERO
            })
            .kind(),
            ErrorKind::AlreadyAllocated
        );
    }

    #[test]
    fn test_conflict_display() {
        let err = LedgerError::AlreadyAllocated(AllocationConflict::Unit {
            unit_ref: RefId::from_label("unit1").unwrap(),
            owner: Address::new([0xAA; 20]),
        });
        assert!(err.to_string().contains("unit1"));
        assert!(err.to_string().contains(&Address::new([0xAA; 20]).to_hex()));
    }

    #[test]
    fn test_messages_carry_full_address() {
        // Same leading and trailing bytes, different middle.
        let mut a = [0x0A; 20];
        let mut b = [0x0A; 20];
        a[10] = 0x01;
        b[10] = 0x02;
        let (a, b) = (Address::new(a), Address::new(b));
        assert_eq!(a.to_string(), b.to_string());

        let msg_a = LedgerError::NotRegistered { address: a }.to_string();
        let msg_b = LedgerError::NotRegistered { address: b }.to_string();
        assert_ne!(msg_a, msg_b);
        assert_eq!(msg_a, format!("member {} is not registered", a.to_hex()));

        let unauthorized = LedgerError::Unauthorized {
            caller: b,
            operation: "register_project",
        };
        assert!(unauthorized.to_string().contains(&b.to_hex()));
        assert!(LedgerError::BalanceOverflow { address: a }
            .to_string()
            .contains(&a.to_hex()));
    }
}
