//! The sequencer task.

use std::sync::Arc;

use housing_ledger::errors::LedgerError;
use housing_ledger::events::EventEnvelope;
use housing_ledger::ports::HousingProgramApi;
use housing_telemetry::metrics::record_rejection;
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, info};

use super::command::{CommandEnvelope, LedgerCommand};
use super::handle::SequencerHandle;
use crate::access::RoleResolver;

/// Applies commands one at a time against the ledger API.
pub struct LedgerSequencer<A: ?Sized> {
    api: Arc<A>,
    resolver: RoleResolver,
    receiver: mpsc::Receiver<CommandEnvelope>,
    shutdown: watch::Receiver<bool>,
}

impl<A> LedgerSequencer<A>
where
    A: HousingProgramApi + ?Sized + 'static,
{
    /// Creates the sequencer and the handle that feeds it.
    pub fn new(
        api: Arc<A>,
        resolver: RoleResolver,
        capacity: usize,
        shutdown: watch::Receiver<bool>,
    ) -> (Self, SequencerHandle) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        let sequencer = Self {
            api,
            resolver,
            receiver,
            shutdown,
        };
        (sequencer, SequencerHandle::new(sender))
    }

    /// Runs until shutdown is signalled or every handle is dropped.
    ///
    /// Commands still queued at shutdown are dropped; their callers see
    /// a closed queue.
    pub async fn run(mut self) {
        info!(admins = self.resolver.admin_count(), "Ledger sequencer started");
        loop {
            tokio::select! {
                biased;
                changed = self.shutdown.changed() => {
                    if changed.is_err() || *self.shutdown.borrow() {
                        break;
                    }
                }
                next = self.receiver.recv() => match next {
                    Some(envelope) => self.dispatch(envelope),
                    None => break,
                },
            }
        }
        self.receiver.close();
        info!("Ledger sequencer stopped");
    }

    fn dispatch(&self, envelope: CommandEnvelope) {
        let CommandEnvelope {
            correlation_id,
            command,
        } = envelope;
        let operation = command.name();
        debug!(%correlation_id, command = operation, "Dispatching ledger command");

        let api = self.api.as_ref();
        match command {
            LedgerCommand::RegisterMember {
                caller,
                national_id_ref,
                spouse_id_ref,
                married,
                reply,
            } => {
                let caller = self.resolver.resolve(caller);
                let result = api.register_member(caller, national_id_ref, spouse_id_ref, married);
                respond_mutation(operation, reply, result);
            }
            LedgerCommand::RegisterProject {
                caller,
                project_ref,
                restricted,
                reply,
            } => {
                let caller = self.resolver.resolve(caller);
                let result = api.register_project(caller, project_ref, restricted);
                respond_mutation(operation, reply, result);
            }
            LedgerCommand::RegisterHousingUnit {
                caller,
                project_ref,
                unit_ref,
                unit_type,
                total_unit_cost,
                required_deposit,
                reply,
            } => {
                let caller = self.resolver.resolve(caller);
                let result = api.register_housing_unit(
                    caller,
                    project_ref,
                    unit_ref,
                    unit_type,
                    total_unit_cost,
                    required_deposit,
                );
                respond_mutation(operation, reply, result);
            }
            LedgerCommand::DepositFunds {
                caller,
                unit_ref,
                amount,
                reply,
            } => {
                let caller = self.resolver.resolve(caller);
                let result = api.deposit_funds(caller, unit_ref, amount);
                respond_mutation(operation, reply, result);
            }
            LedgerCommand::AllocateHousingUnit {
                caller,
                member,
                unit_ref,
                reply,
            } => {
                let caller = self.resolver.resolve(caller);
                let result = api.allocate_housing_unit(caller, member, unit_ref);
                respond_mutation(operation, reply, result);
            }
            LedgerCommand::GetMemberData { address, reply } => {
                respond(reply, api.get_member_data(address));
            }
            LedgerCommand::GetHousingUnitData { unit_ref, reply } => {
                respond(reply, api.get_housing_unit_data(unit_ref));
            }
            LedgerCommand::GetProjectData { project_ref, reply } => {
                respond(reply, api.get_project_data(project_ref));
            }
            LedgerCommand::GetMemberBalance { address, reply } => {
                respond(reply, api.get_member_balance(address));
            }
            LedgerCommand::GetDepositHistory { address, reply } => {
                respond(reply, api.get_deposit_history(address));
            }
            LedgerCommand::Snapshot { reply } => {
                respond(reply, api.snapshot());
            }
        }
    }
}

fn respond_mutation(
    operation: &'static str,
    reply: oneshot::Sender<Result<EventEnvelope, LedgerError>>,
    result: Result<EventEnvelope, LedgerError>,
) {
    if let Err(e) = &result {
        record_rejection(operation, e.kind().as_str());
    }
    respond(reply, result);
}

fn respond<T>(reply: oneshot::Sender<T>, value: T) {
    if reply.send(value).is_err() {
        debug!("Requester went away before the reply");
    }
}
