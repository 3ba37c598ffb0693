//! # Driving Ports (API - Inbound)
//!
//! The operations the transport layer invokes. The caller's identity and
//! role arrive already resolved in [`Caller`].

use crate::domain::{Address, Amount, Caller, RefId, UnitType};
use crate::errors::LedgerError;
use crate::escrow::DepositReceipt;
use crate::events::EventEnvelope;
use crate::identity::Member;
use crate::ledger::LedgerSnapshot;
use crate::projects::{HousingUnit, Project};

/// Primary API of the housing program ledger.
///
/// Mutations return the emitted event on success. Reads never fail and
/// return zero-valued records for unknown keys.
pub trait HousingProgramApi: Send + Sync {
    // === Mutations ===

    /// Registers the caller as a member.
    fn register_member(
        &self,
        caller: Caller,
        national_id_ref: RefId,
        spouse_id_ref: RefId,
        married: bool,
    ) -> Result<EventEnvelope, LedgerError>;

    /// Registers a project. Admin only.
    fn register_project(
        &self,
        caller: Caller,
        project_ref: RefId,
        restricted: bool,
    ) -> Result<EventEnvelope, LedgerError>;

    /// Registers a unit. Admin only.
    fn register_housing_unit(
        &self,
        caller: Caller,
        project_ref: RefId,
        unit_ref: RefId,
        unit_type: UnitType,
        total_unit_cost: Amount,
        required_deposit: Amount,
    ) -> Result<EventEnvelope, LedgerError>;

    /// Credits the caller's escrow with the attached amount.
    fn deposit_funds(
        &self,
        caller: Caller,
        unit_ref: Option<RefId>,
        amount: Amount,
    ) -> Result<EventEnvelope, LedgerError>;

    /// Allocates a unit to a member. Admin only.
    fn allocate_housing_unit(
        &self,
        caller: Caller,
        member: Address,
        unit_ref: RefId,
    ) -> Result<EventEnvelope, LedgerError>;

    // === Reads ===

    /// Member snapshot.
    fn get_member_data(&self, address: Address) -> Member;

    /// Unit snapshot.
    fn get_housing_unit_data(&self, unit_ref: RefId) -> HousingUnit;

    /// Project snapshot.
    fn get_project_data(&self, project_ref: RefId) -> Project;

    /// Escrow balance.
    fn get_member_balance(&self, address: Address) -> Amount;

    /// Deposit receipts, oldest first.
    fn get_deposit_history(&self, address: Address) -> Vec<DepositReceipt>;

    /// Full state view.
    fn snapshot(&self) -> LedgerSnapshot;
}
