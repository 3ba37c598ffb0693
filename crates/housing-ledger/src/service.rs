//! # Ledger Service
//!
//! Thread-safe front of the [`HousingLedger`]. One `RwLock` guards the whole
//! container: every mutation holds the write lock from its first check
//! until its event is published, so mutations are linearized and two
//! allocations of the same unit can never both pass their checks.
//! Reads take the read lock and see the last completed mutation.

use crate::adapters::InMemoryEventLog;
use crate::config::LedgerConfig;
use crate::domain::{check_all_invariants, Address, Amount, Caller, InvariantCheckResult, RefId, UnitType};
use crate::errors::{ErrorKind, LedgerError};
use crate::escrow::DepositReceipt;
use crate::events::{EventEnvelope, LedgerEvent};
use crate::identity::Member;
use crate::ledger::{HousingLedger, LedgerSnapshot, Operation};
use crate::ports::{EventSink, HousingProgramApi};
use crate::projects::{HousingUnit, Project};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Counters kept by the service.
#[derive(Debug, Default, Clone)]
pub struct ServiceStats {
    /// Mutations that succeeded.
    pub applied: u64,
    /// Mutations that failed.
    pub rejected: u64,
    /// Failures by kind.
    pub rejected_by_kind: HashMap<ErrorKind, u64>,
    /// Last sequence number handed out.
    pub last_sequence: u64,
}

struct Inner {
    ledger: HousingLedger,
    stats: ServiceStats,
}

/// Serialized access to the housing ledger.
pub struct LedgerService<E: EventSink> {
    inner: RwLock<Inner>,
    sink: E,
}

impl<E: EventSink> LedgerService<E> {
    /// Creates a service over an empty ledger.
    pub fn new(config: LedgerConfig, sink: E) -> Self {
        Self::from_ledger(HousingLedger::new(config), sink)
    }

    /// Wraps an existing ledger.
    pub fn from_ledger(ledger: HousingLedger, sink: E) -> Self {
        Self {
            inner: RwLock::new(Inner {
                ledger,
                stats: ServiceStats::default(),
            }),
            sink,
        }
    }

    /// The event sink.
    pub fn sink(&self) -> &E {
        &self.sink
    }

    /// Current counters.
    pub fn stats(&self) -> ServiceStats {
        self.inner.read().stats.clone()
    }

    /// Checks every ledger invariant against the current state.
    pub fn verify_invariants(&self) -> InvariantCheckResult {
        check_all_invariants(&self.inner.read().ledger)
    }

    /// Runs `op` under the write lock, then sequences and publishes the event.
    fn execute<F>(&self, operation: Operation, op: F) -> Result<EventEnvelope, LedgerError>
    where
        F: FnOnce(&mut HousingLedger) -> Result<LedgerEvent, LedgerError>,
    {
        let mut inner = self.inner.write();
        match op(&mut inner.ledger) {
            Ok(event) => {
                inner.stats.applied += 1;
                inner.stats.last_sequence += 1;
                let envelope = EventEnvelope {
                    sequence: inner.stats.last_sequence,
                    event,
                };
                info!(
                    operation = %operation,
                    sequence = envelope.sequence,
                    event = envelope.event.name(),
                    "Ledger operation applied"
                );
                self.sink.publish(&envelope);
                Ok(envelope)
            }
            Err(e) => {
                inner.stats.rejected += 1;
                *inner.stats.rejected_by_kind.entry(e.kind()).or_insert(0) += 1;
                warn!(
                    operation = %operation,
                    kind = %e.kind(),
                    error = %e,
                    "Ledger operation rejected"
                );
                Err(e)
            }
        }
    }
}

impl<E: EventSink> HousingProgramApi for LedgerService<E> {
    #[instrument(skip(self, national_id_ref, spouse_id_ref), fields(caller = %caller.address))]
    fn register_member(
        &self,
        caller: Caller,
        national_id_ref: RefId,
        spouse_id_ref: RefId,
        married: bool,
    ) -> Result<EventEnvelope, LedgerError> {
        self.execute(Operation::RegisterMember, |ledger| {
            ledger.register_member(&caller, national_id_ref, spouse_id_ref, married)
        })
    }

    #[instrument(skip(self), fields(caller = %caller.address, project = %project_ref))]
    fn register_project(
        &self,
        caller: Caller,
        project_ref: RefId,
        restricted: bool,
    ) -> Result<EventEnvelope, LedgerError> {
        self.execute(Operation::RegisterProject, |ledger| {
            ledger.register_project(&caller, project_ref, restricted)
        })
    }

    #[instrument(skip(self), fields(caller = %caller.address, unit = %unit_ref))]
    fn register_housing_unit(
        &self,
        caller: Caller,
        project_ref: RefId,
        unit_ref: RefId,
        unit_type: UnitType,
        total_unit_cost: Amount,
        required_deposit: Amount,
    ) -> Result<EventEnvelope, LedgerError> {
        self.execute(Operation::RegisterHousingUnit, |ledger| {
            ledger.register_housing_unit(
                &caller,
                project_ref,
                unit_ref,
                unit_type,
                total_unit_cost,
                required_deposit,
            )
        })
    }

    #[instrument(skip(self), fields(caller = %caller.address))]
    fn deposit_funds(
        &self,
        caller: Caller,
        unit_ref: Option<RefId>,
        amount: Amount,
    ) -> Result<EventEnvelope, LedgerError> {
        self.execute(Operation::DepositFunds, |ledger| {
            ledger.deposit_funds(&caller, unit_ref, amount)
        })
    }

    #[instrument(skip(self), fields(caller = %caller.address, member = %member, unit = %unit_ref))]
    fn allocate_housing_unit(
        &self,
        caller: Caller,
        member: Address,
        unit_ref: RefId,
    ) -> Result<EventEnvelope, LedgerError> {
        self.execute(Operation::AllocateHousingUnit, |ledger| {
            ledger.allocate_housing_unit(&caller, member, unit_ref)
        })
    }

    fn get_member_data(&self, address: Address) -> Member {
        debug!(member = %address, "Member data read");
        self.inner.read().ledger.get_member_data(address)
    }

    fn get_housing_unit_data(&self, unit_ref: RefId) -> HousingUnit {
        debug!(unit = %unit_ref, "Housing unit data read");
        self.inner.read().ledger.get_housing_unit_data(unit_ref)
    }

    fn get_project_data(&self, project_ref: RefId) -> Project {
        self.inner.read().ledger.get_project_data(project_ref)
    }

    fn get_member_balance(&self, address: Address) -> Amount {
        self.inner.read().ledger.get_member_balance(address)
    }

    fn get_deposit_history(&self, address: Address) -> Vec<DepositReceipt> {
        self.inner.read().ledger.get_deposit_history(address)
    }

    fn snapshot(&self) -> LedgerSnapshot {
        self.inner.read().ledger.snapshot()
    }
}

/// Service with default policies and an in-memory event log.
#[must_use]
pub fn create_test_service() -> LedgerService<Arc<InMemoryEventLog>> {
    LedgerService::new(LedgerConfig::default(), Arc::new(InMemoryEventLog::new()))
}
