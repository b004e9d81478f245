use std::fmt;

use kube::{Resource, ResourceExt};

/// Namespace used when an object carries no namespace of its own.
pub const DEFAULT_NAMESPACE: &str = "default";

/// Namespaced name identifying one reconcile target.
///
/// A MySQL and the Deployment derived from it share the same key.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectKey {
    pub namespace: String,
    pub name: String,
}

impl ObjectKey {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    pub fn of<K: Resource>(obj: &K) -> Self {
        Self {
            namespace: obj
                .namespace()
                .unwrap_or_else(|| DEFAULT_NAMESPACE.to_string()),
            name: obj.name_any(),
        }
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}
