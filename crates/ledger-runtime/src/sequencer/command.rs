//! Commands accepted by the sequencer.

use housing_ledger::domain::{Address, Amount, RefId, UnitType};
use housing_ledger::errors::LedgerError;
use housing_ledger::escrow::DepositReceipt;
use housing_ledger::events::EventEnvelope;
use housing_ledger::identity::Member;
use housing_ledger::ledger::{LedgerSnapshot, Operation};
use housing_ledger::projects::{HousingUnit, Project};
use tokio::sync::oneshot;
use uuid::Uuid;

/// Reply channel of a command.
pub type Reply<T> = oneshot::Sender<T>;

/// Reply channel of a mutation.
pub type MutationReply = Reply<Result<EventEnvelope, LedgerError>>;

/// One ledger request. `caller` is the authenticated address; the
/// sequencer resolves its role.
#[allow(missing_docs)]
#[derive(Debug)]
pub enum LedgerCommand {
    /// `register_member`
    RegisterMember {
        caller: Address,
        national_id_ref: RefId,
        spouse_id_ref: RefId,
        married: bool,
        reply: MutationReply,
    },
    /// `register_project`
    RegisterProject {
        caller: Address,
        project_ref: RefId,
        restricted: bool,
        reply: MutationReply,
    },
    /// `register_housing_unit`
    RegisterHousingUnit {
        caller: Address,
        project_ref: RefId,
        unit_ref: RefId,
        unit_type: UnitType,
        total_unit_cost: Amount,
        required_deposit: Amount,
        reply: MutationReply,
    },
    /// `deposit_funds`
    DepositFunds {
        caller: Address,
        unit_ref: Option<RefId>,
        amount: Amount,
        reply: MutationReply,
    },
    /// `allocate_housing_unit`
    AllocateHousingUnit {
        caller: Address,
        member: Address,
        unit_ref: RefId,
        reply: MutationReply,
    },
    /// `get_member_data`
    GetMemberData { address: Address, reply: Reply<Member> },
    /// `get_housing_unit_data`
    GetHousingUnitData { unit_ref: RefId, reply: Reply<HousingUnit> },
    /// `get_project_data`
    GetProjectData { project_ref: RefId, reply: Reply<Project> },
    /// `get_member_balance`
    GetMemberBalance { address: Address, reply: Reply<Amount> },
    /// `get_deposit_history`
    GetDepositHistory {
        address: Address,
        reply: Reply<Vec<DepositReceipt>>,
    },
    /// Full state view.
    Snapshot { reply: Reply<LedgerSnapshot> },
}

impl LedgerCommand {
    /// The mutation this command performs, `None` for reads.
    #[must_use]
    pub fn operation(&self) -> Option<Operation> {
        match self {
            Self::RegisterMember { .. } => Some(Operation::RegisterMember),
            Self::RegisterProject { .. } => Some(Operation::RegisterProject),
            Self::RegisterHousingUnit { .. } => Some(Operation::RegisterHousingUnit),
            Self::DepositFunds { .. } => Some(Operation::DepositFunds),
            Self::AllocateHousingUnit { .. } => Some(Operation::AllocateHousingUnit),
            _ => None,
        }
    }

    /// Label for logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::GetMemberData { .. } => "get_member_data",
            Self::GetHousingUnitData { .. } => "get_housing_unit_data",
            Self::GetProjectData { .. } => "get_project_data",
            Self::GetMemberBalance { .. } => "get_member_balance",
            Self::GetDepositHistory { .. } => "get_deposit_history",
            Self::Snapshot { .. } => "snapshot",
            mutation => mutation.operation().map_or("unknown", Operation::as_str),
        }
    }
}

/// A command tagged with a correlation id for log tracing.
#[derive(Debug)]
pub struct CommandEnvelope {
    /// Assigned by the handle.
    pub correlation_id: Uuid,
    /// The command.
    pub command: LedgerCommand,
}

impl CommandEnvelope {
    /// Wraps a command with a fresh correlation id.
    #[must_use]
    pub fn new(command: LedgerCommand) -> Self {
        Self {
            correlation_id: Uuid::new_v4(),
            command,
        }
    }
}
