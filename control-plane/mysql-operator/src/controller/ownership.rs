use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::OwnerReference;
use kube::{Resource, ResourceExt};

use crate::crd::MySQL;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LinkError {
    #[error("owner {0} has no name or uid to reference")]
    MissingIdentity(String),
    #[error("workload is already controlled by {kind} {name}")]
    AlreadyOwned { kind: String, name: String },
}

fn same_owner(a: &OwnerReference, b: &OwnerReference) -> bool {
    a.uid == b.uid && a.kind == b.kind && a.api_version == b.api_version
}

/// Mark `owner` as the controlling owner of `child`, so deleting the MySQL
/// cascades to the Deployment through the garbage collector.
///
/// Re-linking the same owner is a no-op.
pub fn link(owner: &MySQL, child: &mut Deployment) -> Result<(), LinkError> {
    let oref = owner
        .controller_owner_ref(&())
        .ok_or_else(|| LinkError::MissingIdentity(owner.name_any()))?;
    let oref = OwnerReference {
        block_owner_deletion: Some(true),
        ..oref
    };

    let refs = child.metadata.owner_references.get_or_insert_with(Vec::new);
    if let Some(existing) = refs.iter().find(|r| r.controller == Some(true)) {
        if same_owner(existing, &oref) {
            return Ok(());
        }
        return Err(LinkError::AlreadyOwned {
            kind: existing.kind.clone(),
            name: existing.name.clone(),
        });
    }
    refs.retain(|r| !same_owner(r, &oref));
    refs.push(oref);
    Ok(())
}

/// The controlling owner reference of `obj`, if any.
pub fn controller_of<K: Resource>(obj: &K) -> Option<&OwnerReference> {
    obj.meta()
        .owner_references
        .as_ref()
        .and_then(|refs| refs.iter().find(|r| r.controller == Some(true)))
}
