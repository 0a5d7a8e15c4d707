use thiserror::Error;

use crate::storage::StorageError;

#[derive(Debug, Error)]
pub enum RedirectError {
    #[error("path {path:?} does not name a bucket and key")]
    MalformedPath { path: String },
    #[error("missing path parameter `{0}`")]
    MissingParameter(&'static str),
    #[error("no matching object under prefix {prefix:?}")]
    NoMatchingObject { prefix: String },
    #[error("object storage failure")]
    Storage(#[from] StorageError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    Missing(&'static str),
    #[error("invalid value {value:?} for {name}")]
    Invalid { name: &'static str, value: String },
}
