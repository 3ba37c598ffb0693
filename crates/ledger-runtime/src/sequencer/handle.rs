//! Client side of the sequencer.

use housing_ledger::domain::{Address, Amount, RefId, UnitType};
use housing_ledger::escrow::DepositReceipt;
use housing_ledger::events::EventEnvelope;
use housing_ledger::identity::Member;
use housing_ledger::ledger::LedgerSnapshot;
use housing_ledger::projects::{HousingUnit, Project};
use tokio::sync::{mpsc, oneshot};

use super::command::{CommandEnvelope, LedgerCommand, Reply};
use crate::errors::RuntimeError;

/// Cloneable handle submitting commands to the sequencer.
#[derive(Debug, Clone)]
pub struct SequencerHandle {
    sender: mpsc::Sender<CommandEnvelope>,
}

impl SequencerHandle {
    pub(crate) fn new(sender: mpsc::Sender<CommandEnvelope>) -> Self {
        Self { sender }
    }

    /// Returns true once the sequencer has stopped.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(Reply<T>) -> LedgerCommand,
    ) -> Result<T, RuntimeError> {
        let (reply, response) = oneshot::channel();
        self.sender
            .send(CommandEnvelope::new(build(reply)))
            .await
            .map_err(|_| RuntimeError::QueueClosed)?;
        response.await.map_err(|_| RuntimeError::QueueClosed)
    }

    // =========================================================================
    // MUTATIONS
    // =========================================================================

    /// Registers `caller` as a member.
    pub async fn register_member(
        &self,
        caller: Address,
        national_id_ref: RefId,
        spouse_id_ref: RefId,
        married: bool,
    ) -> Result<EventEnvelope, RuntimeError> {
        self.request(|reply| LedgerCommand::RegisterMember {
            caller,
            national_id_ref,
            spouse_id_ref,
            married,
            reply,
        })
        .await?
        .map_err(RuntimeError::from)
    }

    /// Registers a project.
    pub async fn register_project(
        &self,
        caller: Address,
        project_ref: RefId,
        restricted: bool,
    ) -> Result<EventEnvelope, RuntimeError> {
        self.request(|reply| LedgerCommand::RegisterProject {
            caller,
            project_ref,
            restricted,
            reply,
        })
        .await?
        .map_err(RuntimeError::from)
    }

    /// Registers a unit.
    pub async fn register_housing_unit(
        &self,
        caller: Address,
        project_ref: RefId,
        unit_ref: RefId,
        unit_type: UnitType,
        total_unit_cost: Amount,
        required_deposit: Amount,
    ) -> Result<EventEnvelope, RuntimeError> {
        self.request(|reply| LedgerCommand::RegisterHousingUnit {
            caller,
            project_ref,
            unit_ref,
            unit_type,
            total_unit_cost,
            required_deposit,
            reply,
        })
        .await?
        .map_err(RuntimeError::from)
    }

    /// Deposits `amount` into the caller's escrow.
    pub async fn deposit_funds(
        &self,
        caller: Address,
        unit_ref: Option<RefId>,
        amount: Amount,
    ) -> Result<EventEnvelope, RuntimeError> {
        self.request(|reply| LedgerCommand::DepositFunds {
            caller,
            unit_ref,
            amount,
            reply,
        })
        .await?
        .map_err(RuntimeError::from)
    }

    /// Allocates `unit_ref` to `member`.
    pub async fn allocate_housing_unit(
        &self,
        caller: Address,
        member: Address,
        unit_ref: RefId,
    ) -> Result<EventEnvelope, RuntimeError> {
        self.request(|reply| LedgerCommand::AllocateHousingUnit {
            caller,
            member,
            unit_ref,
            reply,
        })
        .await?
        .map_err(RuntimeError::from)
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    /// Member snapshot.
    pub async fn get_member_data(&self, address: Address) -> Result<Member, RuntimeError> {
        self.request(|reply| LedgerCommand::GetMemberData { address, reply })
            .await
    }

    /// Unit snapshot.
    pub async fn get_housing_unit_data(&self, unit_ref: RefId) -> Result<HousingUnit, RuntimeError> {
        self.request(|reply| LedgerCommand::GetHousingUnitData { unit_ref, reply })
            .await
    }

    /// Project snapshot.
    pub async fn get_project_data(&self, project_ref: RefId) -> Result<Project, RuntimeError> {
        self.request(|reply| LedgerCommand::GetProjectData { project_ref, reply })
            .await
    }

    /// Escrow balance.
    pub async fn get_member_balance(&self, address: Address) -> Result<Amount, RuntimeError> {
        self.request(|reply| LedgerCommand::GetMemberBalance { address, reply })
            .await
    }

    /// Accepted deposits, oldest first.
    pub async fn get_deposit_history(
        &self,
        address: Address,
    ) -> Result<Vec<DepositReceipt>, RuntimeError> {
        self.request(|reply| LedgerCommand::GetDepositHistory { address, reply })
            .await
    }

    /// Full state view.
    pub async fn snapshot(&self) -> Result<LedgerSnapshot, RuntimeError> {
        self.request(|reply| LedgerCommand::Snapshot { reply }).await
    }
}
