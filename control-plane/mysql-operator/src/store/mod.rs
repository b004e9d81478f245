pub mod error;
pub mod k8s;
pub mod key;
pub mod memory;
pub mod traits;

pub use error::*;
pub use k8s::KubeStore;
pub use key::ObjectKey;
pub use memory::{MemoryStore, StoreOp};
pub use traits::*;
