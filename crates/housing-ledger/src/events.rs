//! # Ledger Events
//!
//! One event per successful mutation. Failed operations emit nothing.
//!
//! | Event | Emitted by |
//! |-------|-----------|
//! | `MemberRegistered` | `register_member` |
//! | `ProjectRegistered` | `register_project` |
//! | `HousingUnitRegistered` | `register_housing_unit` |
//! | `FundsDeposited` | `deposit_funds` |
//! | `HousingUnitAllocated` | `allocate_housing_unit` |

use crate::domain::{Address, Amount, RefId, UnitType};
use serde::{Deserialize, Serialize};

/// A state change on the ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LedgerEvent {
    /// A member registered.
    MemberRegistered {
        /// Member address.
        member: Address,
        /// Marital flag.
        married: bool,
    },
    /// A project was registered.
    ProjectRegistered {
        /// Project reference.
        project_ref: RefId,
        /// Restriction flag.
        restricted: bool,
    },
    /// A unit was registered.
    HousingUnitRegistered {
        /// Owning project.
        project_ref: RefId,
        /// Unit reference.
        unit_ref: RefId,
        /// Category.
        unit_type: UnitType,
        /// Total cost.
        total_unit_cost: Amount,
        /// Required deposit.
        required_deposit: Amount,
    },
    /// Escrow was credited.
    FundsDeposited {
        /// Depositor.
        member: Address,
        /// Tagged unit.
        unit_ref: Option<RefId>,
        /// Amount credited.
        amount: Amount,
        /// Balance after the deposit.
        balance: Amount,
    },
    /// A unit was allocated.
    HousingUnitAllocated {
        /// New owner.
        member: Address,
        /// Allocated unit.
        unit_ref: RefId,
    },
}

impl LedgerEvent {
    /// Short stable name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::MemberRegistered { .. } => "member_registered",
            Self::ProjectRegistered { .. } => "project_registered",
            Self::HousingUnitRegistered { .. } => "housing_unit_registered",
            Self::FundsDeposited { .. } => "funds_deposited",
            Self::HousingUnitAllocated { .. } => "housing_unit_allocated",
        }
    }
}

/// An event with its position in the ledger's mutation order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventEnvelope {
    /// Starts at 1, increments by exactly 1 per successful mutation.
    pub sequence: u64,
    /// The event.
    pub event: LedgerEvent,
}
