//! Derives the Deployment that realizes a MySQL object.
//!
//! Only the fields below are set; everything else stays at the
//! `Default` of the k8s-openapi types so the API server fills in its own
//! defaults (rolling update strategy, restart policy, probes, ...).

use std::collections::BTreeMap;

use k8s_openapi::api::apps::v1::{Deployment, DeploymentSpec};
use k8s_openapi::api::core::v1::{Container, PodSpec, PodTemplateSpec};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{
    LabelSelector, ObjectMeta,
};
use kube::ResourceExt;

use crate::crd::MySQL;
use crate::store::ObjectKey;

/// Build the full desired Deployment for `instance`. Pure and deterministic.
pub fn synthesize(instance: &MySQL) -> Deployment {
    let key = ObjectKey::of(instance);
    let labels = instance.metadata.labels.clone();
    Deployment {
        metadata: workload_meta(&key, labels.clone()),
        spec: Some(DeploymentSpec {
            replicas: Some(instance.spec.replicas),
            selector: workload_selector(labels.clone()),
            template: pod_template(
                labels,
                database_container(&instance.name_any(), &instance.spec.image),
            ),
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// Identity mirrors the owner; labels are copied verbatim.
pub fn workload_meta(
    key: &ObjectKey,
    labels: Option<BTreeMap<String, String>>,
) -> ObjectMeta {
    ObjectMeta {
        name: Some(key.name.clone()),
        namespace: Some(key.namespace.clone()),
        labels,
        ..Default::default()
    }
}

/// Selector matches exactly the owner's labels. Callers must keep that
/// label set unique and stable, or the selector drifts with it.
pub fn workload_selector(
    labels: Option<BTreeMap<String, String>>,
) -> LabelSelector {
    LabelSelector {
        match_labels: labels,
        ..Default::default()
    }
}

pub fn pod_template(
    labels: Option<BTreeMap<String, String>>,
    container: Container,
) -> PodTemplateSpec {
    PodTemplateSpec {
        metadata: Some(ObjectMeta {
            labels,
            ..Default::default()
        }),
        spec: Some(PodSpec {
            containers: vec![container],
            ..Default::default()
        }),
    }
}

pub fn database_container(name: &str, image: &str) -> Container {
    Container {
        name: name.to_string(),
        image: Some(image.to_string()),
        ..Default::default()
    }
}
