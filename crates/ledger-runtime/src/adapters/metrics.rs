//! # Metrics Event Adapter
//!
//! Wraps another sink and keeps the `hp_*` Prometheus metrics current.

use housing_ledger::events::{EventEnvelope, LedgerEvent};
use housing_ledger::ports::EventSink;
use housing_telemetry::metrics::{
    DEPOSITS_ACCEPTED, ESCROW_HELD, MEMBERS_REGISTERED, PROJECTS_REGISTERED, UNITS_ALLOCATED,
    UNITS_REGISTERED,
};
use housing_telemetry::{log_event, log_member_event, log_unit_event, metric_inc};

const COMPONENT: &str = "ledger-events";

/// Records metrics for each event, then forwards it.
#[derive(Debug, Clone)]
pub struct MetricsEventSink<S> {
    inner: S,
}

impl<S: EventSink> MetricsEventSink<S> {
    /// Wraps `inner`.
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    /// The wrapped sink.
    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S: EventSink> EventSink for MetricsEventSink<S> {
    #[allow(clippy::cast_precision_loss)]
    fn publish(&self, envelope: &EventEnvelope) {
        let sequence = envelope.sequence;
        match &envelope.event {
            LedgerEvent::MemberRegistered { member, .. } => {
                metric_inc!(MEMBERS_REGISTERED);
                log_member_event!(debug, COMPONENT, "Member registered", member, sequence);
            }
            LedgerEvent::ProjectRegistered {
                project_ref,
                restricted,
            } => {
                metric_inc!(PROJECTS_REGISTERED);
                log_event!(debug, COMPONENT, "Project registered", sequence, project = %project_ref, restricted = *restricted);
            }
            LedgerEvent::HousingUnitRegistered { unit_ref, .. } => {
                metric_inc!(UNITS_REGISTERED);
                log_unit_event!(debug, COMPONENT, "Housing unit registered", unit_ref, sequence);
            }
            LedgerEvent::FundsDeposited { member, amount, .. } => {
                metric_inc!(DEPOSITS_ACCEPTED);
                ESCROW_HELD.add(*amount as f64);
                log_member_event!(debug, COMPONENT, "Funds deposited", member, sequence, amount = %amount);
            }
            LedgerEvent::HousingUnitAllocated { member, unit_ref } => {
                metric_inc!(UNITS_ALLOCATED);
                log_unit_event!(info, COMPONENT, "Housing unit allocated", unit_ref, sequence, member = %member);
            }
        }
        self.inner.publish(envelope);
    }
}
