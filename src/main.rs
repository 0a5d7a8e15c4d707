use std::{env, net::SocketAddr, sync::Arc};

use anyhow::Context;
use presign_redirect::{server::router, RedirectResolver, ResolveMode, ResolverConfig, S3ObjectStore};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "presign_redirect=debug,tower_http=debug".into()),
        )
        .with_file(true)
        .init();

    let mode = ResolveMode::from_env()?;
    let config = ResolverConfig::from_env(mode).context("reading configuration")?;
    let store = S3ObjectStore::from_config(&config).await;

    tracing::info!("Serving {:?} redirects through {}", mode, config.endpoint_url());

    let app = router(Arc::new(RedirectResolver::new(config, Arc::new(store))));

    let addr: SocketAddr = format!("[::]:{}", env::var("PORT").unwrap_or("3000".to_owned()))
        .parse()
        .context("parsing PORT")?;

    tracing::info!("Listening on: {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
