use crate::crd::{MySQL, MySQLStatus};
use crate::store::{InstanceStore, StoreResult};

/// Status value written once a pass completes.
pub const CONVERGED_MARKER: &str = "Running";

/// Copy of `instance` where only `status` differs.
pub fn with_status(instance: &MySQL, value: &str) -> MySQL {
    let mut next = instance.clone();
    next.status = Some(MySQLStatus {
        status: Some(value.to_string()),
    });
    next
}

/// Write `value` to the status subresource of `instance`.
pub async fn report<S: InstanceStore + ?Sized>(
    store: &S,
    instance: &MySQL,
    value: &str,
) -> StoreResult<()> {
    store
        .update_instance_status(&with_status(instance, value))
        .await
}
