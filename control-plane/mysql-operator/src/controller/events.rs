use kube::Resource;
use kube::runtime::events::{Event, EventType, Recorder};

use super::reconcile::{ReconcileOutcome, WorkloadOutcome};
use crate::crd::MySQL;

pub const REASON_CREATED: &str = "Created";
pub const REASON_CREATE_FAILED: &str = "CreateFailed";

/// Event describing the workload step of `outcome`, if it is worth one.
pub fn event_for(outcome: &ReconcileOutcome) -> Option<Event> {
    let ReconcileOutcome::Converged { workload, .. } = outcome else {
        return None;
    };
    match workload {
        WorkloadOutcome::Created => Some(Event {
            type_: EventType::Normal,
            reason: REASON_CREATED.into(),
            note: Some("Created Deployment for MySQL".into()),
            action: "Create".into(),
            secondary: None,
        }),
        WorkloadOutcome::CreateFailed(e) | WorkloadOutcome::LinkFailed(e) => {
            Some(Event {
                type_: EventType::Warning,
                reason: REASON_CREATE_FAILED.into(),
                note: Some(e.clone()),
                action: "Create".into(),
                secondary: None,
            })
        }
        WorkloadOutcome::AlreadyPresent | WorkloadOutcome::CreateRaced => None,
    }
}

pub async fn emit_outcome(
    recorder: &Recorder,
    instance: &MySQL,
    outcome: &ReconcileOutcome,
) {
    if let Some(ev) = event_for(outcome) {
        let _ = recorder.publish(&ev, &instance.object_ref(&())).await;
    }
}
