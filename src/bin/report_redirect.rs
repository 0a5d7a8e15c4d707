use lambda_http::Error;
use presign_redirect::{lambda, ResolveMode};

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .without_time()
        .init();

    lambda::run(ResolveMode::PrefixLookup).await
}
