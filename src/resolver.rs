use std::{sync::Arc, time::Duration};

use tracing::instrument;

use crate::{
    config::ResolverConfig,
    error::RedirectError,
    path::{RequestDescriptor, ResolvedObjectRef},
    storage::ObjectStore,
};

/// Lifetime of every signed URL.
pub const PRESIGN_EXPIRY: Duration = Duration::from_secs(3600);

/// Path parameter naming the test whose report is looked up.
pub const TEST_ID_PARAM: &str = "testId";

const REPORT_SUFFIX: &str = ".pdf";

/// Maps requests to signed object URLs. Built once per process and shared read-only.
pub struct RedirectResolver {
    config: ResolverConfig,
    store: Arc<dyn ObjectStore>,
}

impl RedirectResolver {
    pub fn new(config: ResolverConfig, store: Arc<dyn ObjectStore>) -> Self {
        Self { config, store }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub async fn locate(
        &self,
        descriptor: &RequestDescriptor,
    ) -> Result<ResolvedObjectRef, RedirectError> {
        match self.config.mode.bucket_offset() {
            Some(offset) => descriptor.object_at(offset),
            None => self.find_report(descriptor).await,
        }
    }

    async fn find_report(
        &self,
        descriptor: &RequestDescriptor,
    ) -> Result<ResolvedObjectRef, RedirectError> {
        let test_id = descriptor
            .param(TEST_ID_PARAM)
            .filter(|id| !id.is_empty())
            .ok_or(RedirectError::MissingParameter(TEST_ID_PARAM))?;

        let prefix = format!("{test_id}/");

        let keys = self
            .store
            .list_keys(&self.config.bucket_name, &prefix)
            .await?;

        keys.iter()
            .find(|key| key.ends_with(REPORT_SUFFIX))
            .and_then(|key| ResolvedObjectRef::split_key(key))
            .ok_or(RedirectError::NoMatchingObject { prefix })
    }

    /// Resolves the request to an object and returns a GET URL for it, valid for
    /// [`PRESIGN_EXPIRY`].
    #[instrument(skip(self, descriptor), fields(path = descriptor.path()))]
    pub async fn resolve(&self, descriptor: &RequestDescriptor) -> Result<String, RedirectError> {
        tracing::info!("Resolving {:?}", descriptor.segments());

        let object = self.locate(descriptor).await?;

        let url = self
            .store
            .presign_get(&object.bucket, &object.key, PRESIGN_EXPIRY)
            .await?;

        tracing::info!("Presigned {}/{}: {}", object.bucket, object.key, url);

        Ok(url)
    }
}
