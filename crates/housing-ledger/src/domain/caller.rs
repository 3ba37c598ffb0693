//! # Caller Identity
//!
//! The transport layer authenticates every request and resolves the
//! caller's role once. The ledger never infers roles on its own; it only
//! reads what arrives in [`Caller`].

use super::value_objects::Address;
use crate::errors::LedgerError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Capability attached to an authenticated caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Program administrator: registers projects and units, allocates.
    Admin,
    /// Ordinary participant: registers itself and deposits.
    Member,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Admin => f.write_str("admin"),
            Self::Member => f.write_str("member"),
        }
    }
}

/// An authenticated caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caller {
    /// Address the request was signed by.
    pub address: Address,
    /// Role resolved by the transport layer.
    pub role: Role,
}

impl Caller {
    /// Caller holding the admin capability.
    #[must_use]
    pub const fn admin(address: Address) -> Self {
        Self {
            address,
            role: Role::Admin,
        }
    }

    /// Caller without administrative rights.
    #[must_use]
    pub const fn member(address: Address) -> Self {
        Self {
            address,
            role: Role::Member,
        }
    }

    /// Returns true for admin callers.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Fails with [`LedgerError::Unauthorized`] unless the caller is admin.
    pub fn require_admin(&self, operation: &'static str) -> Result<(), LedgerError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(LedgerError::Unauthorized {
                caller: self.address,
                operation,
            })
        }
    }

    /// Rejects the zero address, which no signer can own.
    pub fn require_valid_address(&self) -> Result<(), LedgerError> {
        if self.address.is_zero() {
            return Err(LedgerError::InvalidInput {
                reason: "caller address is the zero address".to_string(),
            });
        }
        Ok(())
    }
}
