use k8s_openapi::api::apps::v1::Deployment;
use tracing::{debug, instrument, trace};

use super::ownership::link;
use super::status::{CONVERGED_MARKER, report};
use super::workload::synthesize;
use crate::crd::MySQL;
use crate::store::{InstanceStore, ObjectKey, StoreError, WorkloadStore};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ReconcileErr {
    #[error("failed to fetch {key}: {source}")]
    Fetch {
        key: ObjectKey,
        #[source]
        source: StoreError,
    },
    #[error("failed to look up workload {key}: {source}")]
    Lookup {
        key: ObjectKey,
        #[source]
        source: StoreError,
    },
    #[error("failed to write status of {key}: {source}")]
    Status {
        key: ObjectKey,
        #[source]
        source: StoreError,
    },
}

/// What to do about the workload given what currently exists.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorkloadDecision {
    /// A workload exists; it is left exactly as found, even if drifted.
    NoOp,
    Create,
}

pub fn decide(current: Option<&Deployment>) -> WorkloadDecision {
    match current {
        Some(_) => WorkloadDecision::NoOp,
        None => WorkloadDecision::Create,
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WorkloadOutcome {
    Created,
    AlreadyPresent,
    /// Create lost a race with an earlier create of the same key.
    CreateRaced,
    CreateFailed(String),
    LinkFailed(String),
}

impl WorkloadOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            WorkloadOutcome::CreateFailed(_) | WorkloadOutcome::LinkFailed(_)
        )
    }
}

/// Result of one reconciliation pass, for the caller to log or record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// The MySQL is gone, either at fetch time or by the time its status
    /// was written.
    InstanceAbsent,
    /// The pass ran to completion and wrote `status`.
    ///
    /// The status is written even when `workload` is a failure.
    Converged {
        workload: WorkloadOutcome,
        status: String,
    },
}

impl ReconcileOutcome {
    pub fn message(&self) -> String {
        match self {
            ReconcileOutcome::InstanceAbsent => {
                "instance not found; nothing to do".to_string()
            }
            ReconcileOutcome::Converged { workload, status } => {
                let w = match workload {
                    WorkloadOutcome::Created => "workload created".to_string(),
                    WorkloadOutcome::AlreadyPresent => {
                        "workload already present".to_string()
                    }
                    WorkloadOutcome::CreateRaced => {
                        "workload created by an earlier pass".to_string()
                    }
                    WorkloadOutcome::CreateFailed(e) => {
                        format!("workload create failed: {e}")
                    }
                    WorkloadOutcome::LinkFailed(e) => {
                        format!("workload owner link failed: {e}")
                    }
                };
                format!("{w}; status set to {status}")
            }
        }
    }

    /// True when a sub-step failed and the pass should be retried later.
    pub fn needs_retry(&self) -> bool {
        match self {
            ReconcileOutcome::InstanceAbsent => false,
            ReconcileOutcome::Converged { workload, .. } => {
                workload.is_failure()
            }
        }
    }
}

/// Convergence engine for MySQL objects over an injected store.
///
/// Holds no state between passes; every pass re-reads the store, so
/// passes can be repeated at will.
pub struct Reconciler<S> {
    store: S,
}

impl<S> Reconciler<S>
where
    S: InstanceStore + WorkloadStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    #[instrument(level = "debug", skip(self), fields(key = %key))]
    pub async fn reconcile(
        &self,
        key: &ObjectKey,
    ) -> Result<ReconcileOutcome, ReconcileErr> {
        let Some(instance) =
            self.store.get_instance(key).await.map_err(|source| {
                ReconcileErr::Fetch {
                    key: key.clone(),
                    source,
                }
            })?
        else {
            trace!("instance absent; stopping");
            return Ok(ReconcileOutcome::InstanceAbsent);
        };

        let current = self.store.get_workload(key).await.map_err(|source| {
            ReconcileErr::Lookup {
                key: key.clone(),
                source,
            }
        })?;

        let workload = match decide(current.as_ref()) {
            WorkloadDecision::NoOp => WorkloadOutcome::AlreadyPresent,
            WorkloadDecision::Create => self.create(&instance).await,
        };
        debug!(?workload, "workload step finished");

        match report(&self.store, &instance, CONVERGED_MARKER).await {
            Ok(()) => {}
            Err(StoreError::NotFound(_)) => {
                trace!("instance deleted during pass; dropping status");
                return Ok(ReconcileOutcome::InstanceAbsent);
            }
            Err(source) => {
                return Err(ReconcileErr::Status {
                    key: key.clone(),
                    source,
                });
            }
        }

        Ok(ReconcileOutcome::Converged {
            workload,
            status: CONVERGED_MARKER.to_string(),
        })
    }

    async fn create(&self, instance: &MySQL) -> WorkloadOutcome {
        let mut desired = synthesize(instance);
        if let Err(e) = link(instance, &mut desired) {
            return WorkloadOutcome::LinkFailed(e.to_string());
        }
        match self.store.create_workload(&desired).await {
            Ok(_) => WorkloadOutcome::Created,
            Err(e) if e.is_already_exists() => WorkloadOutcome::CreateRaced,
            Err(e) => WorkloadOutcome::CreateFailed(e.to_string()),
        }
    }
}
