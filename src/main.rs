//! Server entry point: configuration, tracing, wiring, serve.

use std::error::Error;
use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use velvet::adapters::http::{api_router, AppState};
use velvet::adapters::memory::InMemoryEventBus;
use velvet::adapters::postgres::{
    PostgresCollectionStore, PostgresContentRepository, PostgresEntitlementStore,
    PostgresUserDirectory,
};
use velvet::application::handlers::billing::WebhookPipeline;
use velvet::config::AppConfig;
use velvet::domain::billing::WebhookVerifier;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_target(false)
        .init();

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await?;
    sqlx::migrate!().run(&pool).await?;

    let entitlements = Arc::new(PostgresEntitlementStore::new(pool.clone()));
    let directory = Arc::new(PostgresUserDirectory::new(pool.clone()));
    let content = Arc::new(PostgresContentRepository::new(pool.clone()));
    let collections = Arc::new(PostgresCollectionStore::new(pool));

    let pipeline = Arc::new(WebhookPipeline::new(
        WebhookVerifier::new(config.payment.webhook_secret.clone()),
        config.payment.tier_policy(),
        entitlements.clone(),
        directory.clone(),
        Arc::new(InMemoryEventBus::new()),
        config.sync.pipeline_settings(),
    ));

    let state = AppState {
        entitlements,
        directory,
        content,
        collections,
        pipeline,
    };

    let app = api_router()
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = config.server.bind_addr();
    info!(%addr, "velvet listening");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
