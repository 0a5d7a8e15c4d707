use std::{collections::HashMap, sync::Arc};

use lambda_http::{service_fn, Body, Error, Request, RequestExt, Response};
use tracing::instrument;

use crate::{
    config::{ResolveMode, ResolverConfig},
    error::RedirectError,
    path::RequestDescriptor,
    resolver::RedirectResolver,
    response::RedirectResponse,
    storage::S3ObjectStore,
};

/// Reads the event's `path` and `pathParameters`. The platform hands over `path`
/// already decoded; the URI path used in its absence is not.
pub fn descriptor(request: &Request) -> Result<RequestDescriptor, RedirectError> {
    let params: HashMap<String, String> = request
        .path_parameters()
        .iter()
        .map(|(name, value)| (name.to_owned(), value.to_owned()))
        .collect();

    let raw_path = request.raw_http_path().to_string();
    if !raw_path.is_empty() {
        return Ok(RequestDescriptor::new(raw_path, params));
    }

    Ok(RequestDescriptor::from_encoded_path(request.uri().path())?.with_params(params))
}

#[instrument(skip_all)]
pub async fn handler(resolver: &RedirectResolver, request: Request) -> Result<Response<Body>, Error> {
    let result = match descriptor(&request) {
        Ok(descriptor) => resolver.resolve(&descriptor).await,
        Err(err) => Err(err),
    };

    RedirectResponse::from_result(result, resolver.config().on_missing).into_lambda()
}

/// Builds the resolver from the environment and serves Lambda events in `mode`.
pub async fn run(mode: ResolveMode) -> Result<(), Error> {
    let config = ResolverConfig::from_env(mode)?;
    let store = S3ObjectStore::from_config(&config).await;

    tracing::info!("Serving {:?} redirects through {}", mode, config.endpoint_url());

    let resolver = Arc::new(RedirectResolver::new(config, Arc::new(store)));

    lambda_http::run(service_fn(|request: Request| {
        let resolver = resolver.clone();
        async move { handler(&resolver, request).await }
    }))
    .await
}
