use async_trait::async_trait;
use k8s_openapi::api::apps::v1::Deployment;

use super::{ObjectKey, StoreError};
use crate::crd::MySQL;

pub type StoreResult<T> = Result<T, StoreError>;

/// Read access to MySQL objects plus writes to their status subresource.
#[async_trait]
pub trait InstanceStore: Send + Sync {
    async fn get_instance(&self, key: &ObjectKey) -> StoreResult<Option<MySQL>>;
    /// Persist `instance.status`; the stored spec must be left untouched.
    async fn update_instance_status(&self, instance: &MySQL)
    -> StoreResult<()>;
}

/// Keyed access to the Deployments derived from MySQL objects.
#[async_trait]
pub trait WorkloadStore: Send + Sync {
    async fn get_workload(
        &self,
        key: &ObjectKey,
    ) -> StoreResult<Option<Deployment>>;
    async fn create_workload(
        &self,
        workload: &Deployment,
    ) -> StoreResult<Deployment>;
    async fn update_workload(
        &self,
        workload: &Deployment,
    ) -> StoreResult<Deployment>;
}
