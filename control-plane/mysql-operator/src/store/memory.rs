use async_trait::async_trait;
use k8s_openapi::api::apps::v1::Deployment;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

use super::{InstanceStore, ObjectKey, StoreError, StoreResult, WorkloadStore};
use crate::crd::MySQL;

type Objects<T> = Arc<RwLock<HashMap<ObjectKey, T>>>;

/// Store operation, used to count calls and to arm injected failures.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StoreOp {
    GetInstance,
    UpdateInstanceStatus,
    GetWorkload,
    CreateWorkload,
    UpdateWorkload,
}

#[derive(Default)]
struct Ledger {
    calls: HashMap<StoreOp, usize>,
    faults: HashMap<StoreOp, StoreError>,
    next_uid: u64,
}

impl Ledger {
    fn uid(&mut self) -> String {
        self.next_uid += 1;
        format!("00000000-0000-0000-0000-{:012}", self.next_uid)
    }
}

/// In-memory store with API-server-like semantics: created workloads get a
/// uid, resource versions move on every write, duplicate creates fail with
/// `AlreadyExists` and updates of missing objects fail with `NotFound`.
#[derive(Clone, Default)]
pub struct MemoryStore {
    instances: Objects<MySQL>,
    workloads: Objects<Deployment>,
    ledger: Arc<Mutex<Ledger>>,
}

fn bump_version(current: Option<&str>) -> String {
    current
        .and_then(|v| v.parse::<u64>().ok())
        .map(|v| v + 1)
        .unwrap_or(1)
        .to_string()
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a MySQL object as given; only the resource version is bumped,
    /// so tests control the uid (or its absence).
    pub async fn insert_instance(&self, mut instance: MySQL) -> MySQL {
        instance.metadata.resource_version =
            Some(bump_version(instance.metadata.resource_version.as_deref()));
        let key = ObjectKey::of(&instance);
        self.instances
            .write()
            .await
            .insert(key, instance.clone());
        instance
    }

    /// Seed a Deployment directly, bypassing create semantics.
    pub async fn insert_workload(&self, workload: Deployment) {
        let key = ObjectKey::of(&workload);
        self.workloads.write().await.insert(key, workload);
    }

    pub async fn remove_instance(&self, key: &ObjectKey) -> Option<MySQL> {
        self.instances.write().await.remove(key)
    }

    pub async fn instance(&self, key: &ObjectKey) -> Option<MySQL> {
        self.instances.read().await.get(key).cloned()
    }

    pub async fn workload(&self, key: &ObjectKey) -> Option<Deployment> {
        self.workloads.read().await.get(key).cloned()
    }

    pub async fn workload_count(&self) -> usize {
        self.workloads.read().await.len()
    }

    /// Fail the next call of `op` with `err`.
    pub async fn fail_next(&self, op: StoreOp, err: StoreError) {
        self.ledger.lock().await.faults.insert(op, err);
    }

    pub async fn calls(&self, op: StoreOp) -> usize {
        self.ledger
            .lock()
            .await
            .calls
            .get(&op)
            .copied()
            .unwrap_or(0)
    }

    async fn enter(&self, op: StoreOp) -> StoreResult<()> {
        let mut ledger = self.ledger.lock().await;
        *ledger.calls.entry(op).or_default() += 1;
        match ledger.faults.remove(&op) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl InstanceStore for MemoryStore {
    async fn get_instance(&self, key: &ObjectKey) -> StoreResult<Option<MySQL>> {
        self.enter(StoreOp::GetInstance).await?;
        Ok(self.instance(key).await)
    }

    async fn update_instance_status(
        &self,
        instance: &MySQL,
    ) -> StoreResult<()> {
        self.enter(StoreOp::UpdateInstanceStatus).await?;
        let key = ObjectKey::of(instance);
        let mut store = self.instances.write().await;
        let stored = store
            .get_mut(&key)
            .ok_or_else(|| StoreError::NotFound(key.to_string()))?;
        stored.status = instance.status.clone();
        stored.metadata.resource_version =
            Some(bump_version(stored.metadata.resource_version.as_deref()));
        Ok(())
    }
}

#[async_trait]
impl WorkloadStore for MemoryStore {
    async fn get_workload(
        &self,
        key: &ObjectKey,
    ) -> StoreResult<Option<Deployment>> {
        self.enter(StoreOp::GetWorkload).await?;
        Ok(self.workload(key).await)
    }

    async fn create_workload(
        &self,
        workload: &Deployment,
    ) -> StoreResult<Deployment> {
        self.enter(StoreOp::CreateWorkload).await?;
        let key = ObjectKey::of(workload);
        let uid = self.ledger.lock().await.uid();
        let mut store = self.workloads.write().await;
        if store.contains_key(&key) {
            return Err(StoreError::AlreadyExists(key.to_string()));
        }
        let mut created = workload.clone();
        created.metadata.uid = Some(uid);
        created.metadata.resource_version = Some("1".into());
        store.insert(key, created.clone());
        Ok(created)
    }

    async fn update_workload(
        &self,
        workload: &Deployment,
    ) -> StoreResult<Deployment> {
        self.enter(StoreOp::UpdateWorkload).await?;
        let key = ObjectKey::of(workload);
        let mut store = self.workloads.write().await;
        let stored = store
            .get_mut(&key)
            .ok_or_else(|| StoreError::NotFound(key.to_string()))?;
        let mut updated = workload.clone();
        updated.metadata.uid = stored.metadata.uid.clone();
        updated.metadata.resource_version =
            Some(bump_version(stored.metadata.resource_version.as_deref()));
        *stored = updated.clone();
        Ok(updated)
    }
}
