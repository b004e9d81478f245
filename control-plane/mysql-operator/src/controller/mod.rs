use std::sync::Arc;

use futures_util::StreamExt;
use k8s_openapi::api::apps::v1::Deployment;
use kube::{
    Client, ResourceExt,
    api::Api,
    runtime::{
        Controller,
        controller::Action,
        events::{Recorder, Reporter},
        watcher::Config,
    },
};
use tracing::{debug, info, instrument, warn};

use crate::config::OperatorConfig;
use crate::crd::MySQL;
use crate::store::{KubeStore, ObjectKey};

pub mod events;
pub mod ownership;
pub mod reconcile;
pub mod status;
pub mod workload;

pub use reconcile::{
    ReconcileErr, ReconcileOutcome, Reconciler, WorkloadDecision,
    WorkloadOutcome, decide,
};


pub struct ControllerContext {
    pub reconciler: Reconciler<KubeStore>,
    pub cfg: OperatorConfig,
    pub recorder: Option<Recorder>,
}

fn scoped_api<K>(client: &Client, ns: Option<&str>) -> Api<K>
where
    K: kube::Resource<
            Scope = k8s_openapi::NamespaceResourceScope,
            DynamicType = (),
        >,
{
    match ns {
        Some(ns) => Api::namespaced(client.clone(), ns),
        None => Api::all(client.clone()),
    }
}

pub async fn run_controller(
    client: Client,
    cfg: OperatorConfig,
) -> anyhow::Result<()> {
    let ns = cfg.watch_namespace.as_deref();
    let instances: Api<MySQL> = scoped_api(&client, ns);
    let workloads: Api<Deployment> = scoped_api(&client, ns);
    info!(namespace = ns.unwrap_or("*"), "starting MySQL controller");

    let recorder = cfg.events.then(|| {
        Recorder::new(
            client.clone(),
            Reporter {
                controller: cfg.reporter.clone(),
                instance: None,
            },
        )
    });
    let ctx = Arc::new(ControllerContext {
        reconciler: Reconciler::new(KubeStore::new(
            client.clone(),
            cfg.reporter.clone(),
        )),
        cfg,
        recorder,
    });

    Controller::new(instances, Config::default())
        .owns(workloads, Config::default())
        .shutdown_on_signal()
        .run(reconcile, error_policy, ctx)
        .for_each(|res| async move {
            match res {
                Ok((obj_ref, action)) => {
                    debug!(object = %obj_ref, ?action, "reconciled")
                }
                Err(e) => warn!(error = %e, "reconcile failed"),
            }
        })
        .await;

    Ok(())
}

/// Requeue policy for a finished pass.
pub fn next_action(cfg: &OperatorConfig, outcome: &ReconcileOutcome) -> Action {
    if outcome.needs_retry() {
        return Action::requeue(cfg.error_requeue());
    }
    match (outcome, cfg.resync_interval()) {
        (ReconcileOutcome::InstanceAbsent, _) | (_, None) => {
            Action::await_change()
        }
        (_, Some(every)) => Action::requeue(every),
    }
}

#[instrument(skip_all, fields(ns = %obj.namespace().unwrap_or_else(|| "default".into()), name = %obj.name_any()))]
async fn reconcile(
    obj: Arc<MySQL>,
    ctx: Arc<ControllerContext>,
) -> Result<Action, ReconcileErr> {
    let key = ObjectKey::of(&*obj);
    let outcome = ctx.reconciler.reconcile(&key).await?;
    if outcome.needs_retry() {
        warn!(%key, outcome = %outcome.message(), "reconcile: pass degraded");
    } else {
        info!(%key, outcome = %outcome.message(), "reconcile: pass complete");
    }
    if let Some(recorder) = ctx.recorder.as_ref() {
        events::emit_outcome(recorder, &obj, &outcome).await;
    }
    Ok(next_action(&ctx.cfg, &outcome))
}

fn error_policy(
    obj: Arc<MySQL>,
    error: &ReconcileErr,
    ctx: Arc<ControllerContext>,
) -> Action {
    warn!(name = %obj.name_any(), error = %error, "reconcile: requeue after error");
    Action::requeue(ctx.cfg.error_requeue())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn cfg(resync_secs: u64) -> OperatorConfig {
        OperatorConfig {
            watch_namespace: None,
            resync_secs,
            error_requeue_secs: 30,
            reporter: "mysql-operator".into(),
            events: false,
            http_port: 8088,
        }
    }

    fn converged(workload: WorkloadOutcome) -> ReconcileOutcome {
        ReconcileOutcome::Converged {
            workload,
            status: "Running".into(),
        }
    }

    #[test]
    fn absent_instance_waits_for_change() {
        assert_eq!(
            next_action(&cfg(300), &ReconcileOutcome::InstanceAbsent),
            Action::await_change()
        );
    }

    #[test]
    fn converged_pass_resyncs_periodically() {
        assert_eq!(
            next_action(&cfg(300), &converged(WorkloadOutcome::Created)),
            Action::requeue(Duration::from_secs(300))
        );
        assert_eq!(
            next_action(&cfg(0), &converged(WorkloadOutcome::AlreadyPresent)),
            Action::await_change()
        );
    }

    #[test]
    fn failed_create_requeues_with_error_delay() {
        let out = converged(WorkloadOutcome::CreateFailed("boom".into()));
        assert_eq!(
            next_action(&cfg(0), &out),
            Action::requeue(Duration::from_secs(30))
        );
    }
}
