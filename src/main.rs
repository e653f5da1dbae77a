use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use marquee_api::{
    config::Config,
    db::{create_redis_client, Cache},
    routes::{create_router, AppState},
    services::{providers::TmdbProvider, Enricher, HttpRecommender, PreferencesStore},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("marquee_api=info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    // Metadata cache is optional
    let (cache, cache_writer) = match config.redis_url.as_deref() {
        Some(url) => {
            let (cache, handle) = Cache::new(create_redis_client(url)?);
            tracing::info!(ttl = config.metadata_cache_ttl, "Metadata cache enabled");
            (Some(cache), Some(handle))
        }
        None => {
            tracing::info!("REDIS_URL not set, metadata cache disabled");
            (None, None)
        }
    };

    let lookup = TmdbProvider::from_config(&config, cache)?;
    let mut enricher = Enricher::new(Arc::new(lookup));
    if let Some(limit) = config.enrich_concurrency {
        enricher = enricher.with_concurrency_limit(limit);
    }

    let recommender = HttpRecommender::from_config(&config)?;
    let preferences = PreferencesStore::load(&config.preferences_path).await;

    let state = Arc::new(AppState::new(Arc::new(recommender), enricher, preferences));
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    tracing::info!(
        addr = %config.bind_addr(),
        recommender = %config.recommender_url,
        max_concurrency = ?config.enrich_concurrency,
        "Server running"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(handle) = cache_writer {
        handle.shutdown().await;
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
