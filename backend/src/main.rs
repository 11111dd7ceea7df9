//! Evacuation Map Platform - Backend Server
//!
//! Serves evacuation zones near a user, falling back to the full zone listing
//! when the proximity query is unavailable, along with the geometry queries
//! the map needs (closest shelter, containing zones, viewport bounds).

use axum::{routing::get, Router};
use sqlx::postgres::PgPoolOptions;
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio_util::sync::CancellationToken;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod external;
mod handlers;
mod models;
mod routes;
mod services;

pub use config::Config;

use config::ZoneSourceKind;
use external::PostgrestClient;
use services::{PgZoneSource, ZoneRepository, ZoneSource};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<ZoneRepository>,
    pub config: Arc<Config>,
    /// Cancelled on shutdown; in-flight zone fetches stop publishing
    pub shutdown: CancellationToken,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "evac_server=debug,tower_http=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::load()?;

    tracing::info!("Starting Evacuation Map Server");
    tracing::info!("Environment: {}", config.environment);

    let source = build_zone_source(&config).await?;
    tracing::info!("Zone source: {}", source.name());

    // Create application state
    let shutdown = CancellationToken::new();
    let state = AppState {
        repository: Arc::new(ZoneRepository::new(source)),
        config: Arc::new(config.clone()),
        shutdown: shutdown.clone(),
    };

    // Build application
    let app = create_app(state);

    // Start server
    let host: std::net::IpAddr = config
        .server
        .host
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid server host '{}': {}", config.server.host, e))?;
    let addr = SocketAddr::from((host, config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Connect the configured zone source
async fn build_zone_source(config: &Config) -> anyhow::Result<Arc<dyn ZoneSource>> {
    let zone_source = &config.zone_source;

    match zone_source.kind {
        ZoneSourceKind::Rest => {
            let url = zone_source
                .rest_url
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("EVAC_ZONE_SOURCE__REST_URL is required for the rest zone source"))?;
            let api_key = zone_source
                .api_key
                .clone()
                .ok_or_else(|| anyhow::anyhow!("EVAC_ZONE_SOURCE__API_KEY is required for the rest zone source"))?;

            let client = PostgrestClient::new(
                url,
                api_key,
                Duration::from_secs(zone_source.request_timeout_secs),
            )?;
            Ok(Arc::new(client))
        }
        ZoneSourceKind::Postgres => {
            let database = config
                .database
                .as_ref()
                .ok_or_else(|| anyhow::anyhow!("EVAC_DATABASE__URL is required for the postgres zone source"))?;

            // Create database connection pool
            tracing::info!("Connecting to database...");
            let db_pool = PgPoolOptions::new()
                .max_connections(database.max_connections)
                .min_connections(database.min_connections)
                .acquire_timeout(Duration::from_secs(zone_source.request_timeout_secs))
                .connect(&database.url)
                .await?;

            tracing::info!("Database connection established");

            // Run migrations in development
            if config.environment == "development" {
                tracing::info!("Running database migrations...");
                sqlx::migrate!("./migrations").run(&db_pool).await?;
                tracing::info!("Migrations completed");
            }

            Ok(Arc::new(PgZoneSource::new(db_pool)))
        }
    }
}

/// Resolve on Ctrl+C and cancel outstanding zone fetches
async fn shutdown_signal(shutdown: CancellationToken) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown requested");
    shutdown.cancel();
}

/// Create the application router with all routes and middleware
fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Evacuation Map Platform API v1.0"
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
