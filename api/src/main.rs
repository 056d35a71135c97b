use anyhow::Result;
use axum::{routing::get, Router};
use shared::{get_pool, Config, DbPool};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

mod error;
mod handlers;
mod market;
mod queries;
mod templates;

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    info!("Starting cross-market dashboard server...");

    let config = Config::from_env()?;
    let pool = get_pool(&config.database_url).await?;
    info!("Connected to database");

    let app = Router::new()
        .route("/health", get(handlers::health))
        .route("/", get(handlers::dashboard_page))
        .route("/assets/:coin_id", get(handlers::asset_page))
        .route("/correlation", get(handlers::correlation_page))
        .route("/queries", get(handlers::queries_page))
        .route("/queries/:id", get(handlers::query_run_page))
        .route("/api/market/summary", get(handlers::market_summary_json))
        .route("/api/assets/:coin_id/series", get(handlers::asset_series_json))
        .route("/api/correlation", get(handlers::correlation_json))
        .route("/api/queries", get(handlers::queries_json))
        .route("/api/queries/:id/run", get(handlers::query_run_json))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(AppState { pool });

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("Dashboard listening on http://{}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
