/// Failures reported by an object store.
///
/// Absence on reads is not an error; getters return `Ok(None)` instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("object already exists: {0}")]
    AlreadyExists(String),

    #[error("object not found: {0}")]
    NotFound(String),

    #[error("write conflict: {0}")]
    Conflict(String),

    #[error("store request failed: {0}")]
    Transient(String),
}

impl StoreError {
    pub fn is_already_exists(&self) -> bool {
        matches!(self, StoreError::AlreadyExists(_))
    }
}

impl From<kube::Error> for StoreError {
    fn from(e: kube::Error) -> Self {
        match e {
            kube::Error::Api(ae) => match (ae.code, ae.reason.as_str()) {
                (409, "AlreadyExists") => StoreError::AlreadyExists(ae.message),
                (409, _) => StoreError::Conflict(ae.message),
                (404, _) => StoreError::NotFound(ae.message),
                _ => StoreError::Transient(ae.to_string()),
            },
            other => StoreError::Transient(other.to_string()),
        }
    }
}
