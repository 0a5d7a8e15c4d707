use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{OriginalUri, Path, State},
    routing::get,
    Router,
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use tracing::instrument;

use crate::{
    config::ResolveMode,
    path::RequestDescriptor,
    resolver::{RedirectResolver, TEST_ID_PARAM},
    response::RedirectResponse,
};

#[derive(Debug, Deserialize)]
pub struct ReportPath {
    #[serde(rename = "testId")]
    pub test_id: String,
}

#[instrument(skip(resolver))]
async fn path_redirect_handler(
    State(resolver): State<Arc<RedirectResolver>>,
    OriginalUri(uri): OriginalUri,
) -> RedirectResponse {
    let result = match RequestDescriptor::from_encoded_path(uri.path()) {
        Ok(descriptor) => resolver.resolve(&descriptor).await,
        Err(err) => Err(err),
    };

    RedirectResponse::from_result(result, resolver.config().on_missing)
}

#[instrument(skip(resolver))]
async fn report_redirect_handler(
    State(resolver): State<Arc<RedirectResolver>>,
    Path(ReportPath { test_id }): Path<ReportPath>,
) -> RedirectResponse {
    let descriptor = RequestDescriptor::new(
        format!("/{test_id}"),
        HashMap::from([(TEST_ID_PARAM.to_owned(), test_id)]),
    );

    let result = resolver.resolve(&descriptor).await;

    RedirectResponse::from_result(result, resolver.config().on_missing)
}

pub fn router(resolver: Arc<RedirectResolver>) -> Router {
    let router = match resolver.config().mode {
        ResolveMode::Direct | ResolveMode::Offset => Router::new().fallback(path_redirect_handler),
        ResolveMode::PrefixLookup => Router::new().route("/:testId", get(report_redirect_handler)),
    };

    router
        .layer(TraceLayer::new_for_http())
        .with_state(resolver)
}
