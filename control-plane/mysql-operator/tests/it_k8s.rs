// Integration tests require a running Kubernetes cluster with the MySQL CRD
// applied (`cargo run --bin crdgen | kubectl apply -f -`). Ignored by default.

use std::time::Duration;

use envconfig::Envconfig;
use k8s_openapi::api::apps::v1::Deployment;
use kube::{
    Client,
    api::{Api, DeleteParams, PostParams},
};
use mysql_operator::config::OperatorConfig;
use mysql_operator::controller::ownership::controller_of;
use mysql_operator::crd::MySQL;

mod common;
use common::{NS, default_labels, spec, uniq};

// RAII guard to ensure controller abort + cleanup
struct ControllerGuard {
    name: String,
    client: Client,
    ctrl: tokio::task::JoinHandle<()>,
}

impl Drop for ControllerGuard {
    fn drop(&mut self) {
        self.ctrl.abort();
        let name = self.name.clone();
        let client = self.client.clone();
        let _ = tokio::spawn(async move {
            let api: Api<MySQL> = Api::namespaced(client, NS);
            let _ = api.delete(&name, &DeleteParams::default()).await;
        });
    }
}

#[test_log::test(tokio::test)]
#[ignore]
async fn controller_creates_owned_deployment_and_reports_running() {
    let client = Client::try_default().await.expect("kube client");
    let name = uniq("mysql-it");

    let api: Api<MySQL> = Api::namespaced(client.clone(), NS);
    let mut db = MySQL::new(&name, spec("mysql:8", 1));
    db.metadata.labels = Some(default_labels(&name));
    let created = api
        .create(&PostParams::default(), &db)
        .await
        .expect("create MySQL");

    let cfg = OperatorConfig::init_from_hashmap(&Default::default())
        .expect("default config");
    let client_for_ctrl = client.clone();
    let ctrl = tokio::spawn(async move {
        let _ = mysql_operator::controller::run_controller(client_for_ctrl, cfg)
            .await;
    });
    let _guard = ControllerGuard {
        name: name.clone(),
        client: client.clone(),
        ctrl,
    };

    let dep_api: Api<Deployment> = Api::namespaced(client.clone(), NS);
    let mut dep = None;
    for _ in 0..30 {
        dep = dep_api.get_opt(&name).await.unwrap_or(None);
        if dep.is_some() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(1000)).await;
    }
    let dep = dep.expect("expected Deployment created by controller");
    let oref = controller_of(&dep).expect("owner reference");
    assert_eq!(Some(oref.uid.clone()), created.metadata.uid);

    let mut status = None;
    for _ in 0..30 {
        status = api
            .get_opt(&name)
            .await
            .unwrap_or(None)
            .and_then(|m| m.status_marker().map(str::to_string));
        if status.is_some() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(1000)).await;
    }
    assert_eq!(status.as_deref(), Some("Running"));
}
