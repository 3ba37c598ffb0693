use crate::domain::{Address, Amount, RefId};
use crate::errors::{IdentityField, LedgerError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Stored identity record, keyed by owner address.
///
/// The escrow balance lives in the escrow ledger, not here; see [`Member`]
/// for the combined read view.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberRecord {
    /// National identity reference. Never empty for a registered member.
    pub national_id_ref: RefId,
    /// Spouse identity reference, empty when not married.
    pub spouse_id_ref: RefId,
    /// Marital flag as declared at registration.
    pub married: bool,
    /// Address that registered. Set once.
    pub owner: Address,
    /// Registration flag.
    pub registered: bool,
    /// Set by allocation only.
    pub housing_allocated: bool,
}

impl MemberRecord {
    /// Read view combining the record with an escrow balance.
    #[must_use]
    pub fn snapshot(&self, deposit_balance: Amount) -> Member {
        Member {
            national_id_ref: self.national_id_ref,
            spouse_id_ref: self.spouse_id_ref,
            married: self.married,
            owner: self.owner,
            registered: self.registered,
            deposit_balance,
            housing_allocated: self.housing_allocated,
        }
    }
}

/// Member snapshot as returned by `get_member_data`.
///
/// Unknown addresses produce the zero-valued default.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// National identity reference.
    pub national_id_ref: RefId,
    /// Spouse identity reference.
    pub spouse_id_ref: RefId,
    /// Marital flag.
    pub married: bool,
    /// Owning address (zero for unknown members).
    pub owner: Address,
    /// Registration flag.
    pub registered: bool,
    /// Escrow balance at read time.
    pub deposit_balance: Amount,
    /// Whether the member holds a unit.
    pub housing_allocated: bool,
}

/// Identity registry.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityRegistry {
    members: BTreeMap<Address, MemberRecord>,
}

impl IdentityRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates a registration without writing anything.
    pub fn check_registration(
        &self,
        owner: Address,
        national_id_ref: RefId,
        spouse_id_ref: RefId,
        married: bool,
        require_spouse_when_married: bool,
    ) -> Result<(), LedgerError> {
        if self.is_registered(owner) {
            return Err(LedgerError::DuplicateMember { address: owner });
        }
        if national_id_ref.is_empty() {
            return Err(LedgerError::InvalidIdentity(IdentityField::NationalId));
        }
        if married && require_spouse_when_married && spouse_id_ref.is_empty() {
            return Err(LedgerError::InvalidIdentity(IdentityField::SpouseId));
        }
        Ok(())
    }

    /// Registers `owner`. Fails without writing if any check fails.
    pub(crate) fn register(
        &mut self,
        owner: Address,
        national_id_ref: RefId,
        spouse_id_ref: RefId,
        married: bool,
        require_spouse_when_married: bool,
    ) -> Result<&MemberRecord, LedgerError> {
        self.check_registration(
            owner,
            national_id_ref,
            spouse_id_ref,
            married,
            require_spouse_when_married,
        )?;

        let record = MemberRecord {
            national_id_ref,
            spouse_id_ref,
            married,
            owner,
            registered: true,
            housing_allocated: false,
        };
        Ok(self.members.entry(owner).or_insert(record))
    }

    /// Marks a registered member as housed.
    ///
    /// Only the allocation engine calls this, after all checks passed.
    pub(crate) fn mark_housed(&mut self, owner: Address) {
        if let Some(record) = self.members.get_mut(&owner) {
            record.housing_allocated = true;
        }
    }

    /// Looks up a record.
    #[must_use]
    pub fn get(&self, owner: Address) -> Option<&MemberRecord> {
        self.members.get(&owner)
    }

    /// Returns true if `owner` is registered.
    #[must_use]
    pub fn is_registered(&self, owner: Address) -> bool {
        self.members.get(&owner).is_some_and(|m| m.registered)
    }

    /// Number of registered members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns true if nobody registered yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Records in address order.
    pub fn iter(&self) -> impl Iterator<Item = &MemberRecord> {
        self.members.values()
    }
}
