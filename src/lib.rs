pub mod config;
pub mod error;
pub mod lambda;
pub mod path;
pub mod resolver;
pub mod response;
pub mod server;
pub mod storage;

pub use config::{MissingObjectPolicy, ResolveMode, ResolverConfig};
pub use error::{ConfigError, RedirectError};
pub use path::{RequestDescriptor, ResolvedObjectRef};
pub use resolver::{RedirectResolver, PRESIGN_EXPIRY};
pub use storage::{ObjectStore, S3ObjectStore, StorageError};
