use async_trait::async_trait;
use k8s_openapi::api::apps::v1::Deployment;
use kube::{
    Client, ResourceExt,
    api::{Api, Patch, PatchParams, PostParams},
};
use serde_json::json;
use tracing::{debug, instrument};

use super::{InstanceStore, ObjectKey, StoreError, StoreResult, WorkloadStore};
use crate::crd::MySQL;

/// Object store backed by the Kubernetes API server.
#[derive(Clone)]
pub struct KubeStore {
    client: Client,
    field_manager: String,
}

impl KubeStore {
    pub fn new(client: Client, field_manager: impl Into<String>) -> Self {
        Self {
            client,
            field_manager: field_manager.into(),
        }
    }

    fn post_params(&self) -> PostParams {
        PostParams {
            field_manager: Some(self.field_manager.clone()),
            ..Default::default()
        }
    }

    fn mysql_api(&self, ns: &str) -> Api<MySQL> {
        Api::namespaced(self.client.clone(), ns)
    }

    fn deployment_api(&self, ns: &str) -> Api<Deployment> {
        Api::namespaced(self.client.clone(), ns)
    }
}

fn key_of(obj: &Deployment) -> StoreResult<ObjectKey> {
    if obj.metadata.name.is_none() {
        return Err(StoreError::Transient(
            "workload has no metadata.name".into(),
        ));
    }
    Ok(ObjectKey::of(obj))
}

#[async_trait]
impl InstanceStore for KubeStore {
    #[instrument(level = "debug", skip(self), fields(key = %key))]
    async fn get_instance(&self, key: &ObjectKey) -> StoreResult<Option<MySQL>> {
        Ok(self.mysql_api(&key.namespace).get_opt(&key.name).await?)
    }

    #[instrument(level = "debug", skip_all, fields(name = %instance.name_any()))]
    async fn update_instance_status(
        &self,
        instance: &MySQL,
    ) -> StoreResult<()> {
        let key = ObjectKey::of(instance);
        let patch = json!({ "status": instance.status });
        let pp = PatchParams {
            field_manager: Some(self.field_manager.clone()),
            ..Default::default()
        };
        let _ = self
            .mysql_api(&key.namespace)
            .patch_status(&key.name, &pp, &Patch::Merge(&patch))
            .await?;
        debug!(%key, "status subresource patched");
        Ok(())
    }
}

#[async_trait]
impl WorkloadStore for KubeStore {
    #[instrument(level = "debug", skip(self), fields(key = %key))]
    async fn get_workload(
        &self,
        key: &ObjectKey,
    ) -> StoreResult<Option<Deployment>> {
        Ok(self.deployment_api(&key.namespace).get_opt(&key.name).await?)
    }

    #[instrument(level = "debug", skip_all)]
    async fn create_workload(
        &self,
        workload: &Deployment,
    ) -> StoreResult<Deployment> {
        let key = key_of(workload)?;
        let created = self
            .deployment_api(&key.namespace)
            .create(&self.post_params(), workload)
            .await?;
        debug!(%key, "deployment created");
        Ok(created)
    }

    #[instrument(level = "debug", skip_all)]
    async fn update_workload(
        &self,
        workload: &Deployment,
    ) -> StoreResult<Deployment> {
        let key = key_of(workload)?;
        let updated = self
            .deployment_api(&key.namespace)
            .replace(&key.name, &self.post_params(), workload)
            .await?;
        debug!(%key, "deployment replaced");
        Ok(updated)
    }
}
