use std::time::Duration;

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::{presigning::PresigningConfig, Client};
use thiserror::Error;
use tracing::instrument;

use crate::config::ResolverConfig;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("invalid presigning configuration")]
    PresigningConfig(#[from] aws_sdk_s3::presigning::PresigningConfigError),
    #[error("object storage request failed")]
    Sdk(#[from] aws_sdk_s3::Error),
    #[error("object storage unavailable: {0}")]
    Unavailable(String),
}

/// The two object-storage operations a redirect needs.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Mints a URL granting GET access to `bucket`/`key` for `expires_in`.
    async fn presign_get(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> Result<String, StorageError>;

    /// Every key under `prefix`, in listing order.
    async fn list_keys(&self, bucket: &str, prefix: &str) -> Result<Vec<String>, StorageError>;
}

/// [`ObjectStore`] backed by S3, addressed through `https://{BUCKET_NAME}`.
#[derive(Clone, Debug)]
pub struct S3ObjectStore {
    client: Client,
}

impl S3ObjectStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Loads credentials and region from the environment and points the client at
    /// the configured endpoint. Requests are signed with SigV4.
    pub async fn from_config(config: &ResolverConfig) -> Self {
        let shared = aws_config::load_defaults(BehaviorVersion::latest()).await;

        Self::with_builder(aws_sdk_s3::config::Builder::from(&shared), config)
    }

    /// Finishes `builder` with the endpoint and addressing style from `config`.
    pub fn with_builder(builder: aws_sdk_s3::config::Builder, config: &ResolverConfig) -> Self {
        let s3_config = builder
            .endpoint_url(config.endpoint_url())
            .force_path_style(config.force_path_style)
            .build();

        Self::new(Client::from_conf(s3_config))
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    #[instrument(skip(self))]
    async fn presign_get(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> Result<String, StorageError> {
        let presigning = PresigningConfig::expires_in(expires_in)?;

        let request = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .presigned(presigning)
            .await
            .map_err(aws_sdk_s3::Error::from)?;

        Ok(request.uri().to_string())
    }

    #[instrument(skip(self))]
    async fn list_keys(&self, bucket: &str, prefix: &str) -> Result<Vec<String>, StorageError> {
        let mut pages = self
            .client
            .list_objects_v2()
            .bucket(bucket)
            .prefix(prefix)
            .into_paginator()
            .send();

        let mut keys = Vec::new();

        while let Some(page) = pages.next().await {
            let page = page.map_err(aws_sdk_s3::Error::from)?;

            keys.extend(
                page.contents()
                    .iter()
                    .filter_map(|object| object.key().map(str::to_owned)),
            );
        }

        tracing::debug!("Listed {} keys under {}", keys.len(), prefix);

        Ok(keys)
    }
}

#[cfg(test)]
pub(crate) mod memory {
    use std::sync::Mutex;

    use super::*;

    /// Records every presign request and serves listings from a fixed key set.
    #[derive(Default)]
    pub(crate) struct MemoryStore {
        pub keys: Vec<String>,
        pub fail: bool,
        pub presigned: Mutex<Vec<(String, String, Duration)>>,
        pub listed: Mutex<Vec<(String, String)>>,
    }

    impl MemoryStore {
        pub fn with_keys(keys: &[&str]) -> Self {
            Self {
                keys: keys.iter().map(|key| key.to_string()).collect(),
                ..Default::default()
            }
        }

        pub fn failing() -> Self {
            Self {
                fail: true,
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl ObjectStore for MemoryStore {
        async fn presign_get(
            &self,
            bucket: &str,
            key: &str,
            expires_in: Duration,
        ) -> Result<String, StorageError> {
            if self.fail {
                return Err(StorageError::Unavailable("access denied".to_owned()));
            }

            self.presigned
                .lock()
                .unwrap()
                .push((bucket.to_owned(), key.to_owned(), expires_in));

            Ok(format!(
                "https://{bucket}.example.com/{key}?X-Amz-Expires={}",
                expires_in.as_secs()
            ))
        }

        async fn list_keys(&self, bucket: &str, prefix: &str) -> Result<Vec<String>, StorageError> {
            if self.fail {
                return Err(StorageError::Unavailable("access denied".to_owned()));
            }

            self.listed
                .lock()
                .unwrap()
                .push((bucket.to_owned(), prefix.to_owned()));

            Ok(self
                .keys
                .iter()
                .filter(|key| key.starts_with(prefix))
                .cloned()
                .collect())
        }
    }
}
