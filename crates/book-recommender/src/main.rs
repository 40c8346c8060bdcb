mod cache;
mod config;
mod corpus;
mod error;
mod fuzzy;
mod matrix;
mod model;
mod recommend;
mod resolver;
mod server;
mod service;
mod tfidf;
#[cfg(test)]
mod test_support;

use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use config::Config;
use corpus::Corpus;
use service::Recommender;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("starting book-recommender");

    // 1. Load config from environment
    let config = Config::from_env()?;
    info!(
        data_dir = %config.data_dir.display(),
        bind_addr = %config.bind_addr,
        redis = config.redis_url.is_some(),
        "configuration loaded"
    );

    // 2. Load the precomputed artifacts; any failure aborts startup
    let corpus = Corpus::load(&config.data_dir)?;
    if corpus.is_empty() {
        warn!("book table is empty, every request will fall through to the books api");
    }

    // 3. Wire the books api client and the optional redis lookup cache
    let recommender = Arc::new(Recommender::connect(&config, Arc::new(corpus)).await?);
    let app = server::router(recommender);

    // 4. Serve HTTP
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!(addr = %config.bind_addr, "HTTP server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .inspect_err(|e| tracing::error!(error = %e, "HTTP server error"))?;

    info!("HTTP server shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
