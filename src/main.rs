use anyhow::Context;
use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

mod analytics;
mod config;
mod db;
mod error;
mod finance;
mod handlers;
mod models;
mod store;

use config::Config;
use finance::{AggregatorClient, FinanceGateway};
use store::{EntryStore, NoteStore};

#[derive(Clone)]
pub struct AppState {
    pub entries: Arc<dyn EntryStore>,
    pub notes: Arc<dyn NoteStore>,
    pub finance: Arc<dyn FinanceGateway>,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "couple_dashboard_api=debug,tower_http=debug".into()),
        )
        .json()
        .init();

    analytics::metrics::validate_definitions().context("Invalid metric definitions")?;

    let config = Arc::new(Config::from_env());

    let (entries, notes): (Arc<dyn EntryStore>, Arc<dyn NoteStore>) =
        match config.database_url.as_deref() {
            Some(url) => {
                let pool = db::create_pool(url)
                    .await
                    .context("Failed to create database pool")?;

                sqlx::migrate!("./migrations")
                    .run(&pool)
                    .await
                    .context("Failed to run database migrations")?;
                tracing::info!("Database migrations applied");

                (
                    Arc::new(store::PgEntryStore::new(pool.clone())),
                    Arc::new(store::PgNoteStore::new(pool)),
                )
            }
            None => {
                tracing::warn!("DATABASE_URL not set, using in-memory stores");
                (
                    Arc::new(store::MemoryEntryStore::new()),
                    Arc::new(store::MemoryNoteStore::new()),
                )
            }
        };

    let finance = AggregatorClient::new(
        config.finance_api_url.clone(),
        Duration::from_secs(config.finance_timeout_secs),
    )?;
    if !finance.is_configured() {
        tracing::warn!("FINANCE_API_URL not set, /api/finances will return 502");
    }

    let state = AppState {
        entries,
        notes,
        finance: Arc::new(finance),
        config: config.clone(),
    };

    let app = build_router(state);

    let addr = config.listen_addr();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/api/metrics", get(handlers::analytics::list_metrics))
        .route("/api/metrics/:key", get(handlers::analytics::get_metric))
        // Entries
        .route("/api/entries", get(handlers::entries::list_entries))
        .route("/api/entries/all", get(handlers::entries::list_all_entries))
        .route("/api/entries/today", get(handlers::entries::get_today))
        .route(
            "/api/entries/:date/adjust",
            post(handlers::entries::adjust_metric),
        )
        // Analytics & rollups
        .route("/api/analytics", get(handlers::analytics::get_analytics))
        .route(
            "/api/rollups/weekly",
            get(handlers::analytics::get_weekly_rollup),
        )
        .route(
            "/api/rollups/weekly/goals",
            get(handlers::analytics::get_weekly_goal_progress),
        )
        .route(
            "/api/rollups/monthly",
            get(handlers::analytics::get_monthly_rollup),
        )
        .route(
            "/api/rollups/monthly/history",
            get(handlers::analytics::get_monthly_history),
        )
        // Notes
        .route(
            "/api/notes",
            get(handlers::notes::list_notes).post(handlers::notes::create_note),
        )
        .route(
            "/api/notes/:id",
            put(handlers::notes::update_note).delete(handlers::notes::delete_note),
        )
        // Finances
        .route("/api/finances", get(handlers::finances::get_finances));

    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/readyz", get(handlers::health::readyz))
        .merge(api_routes)
        .layer(cors_layer(&state.config))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    // In dev, CORS_EXTRA_ORIGINS also allows LAN access (e.g. from a phone)
    let allowed_origins: Vec<HeaderValue> = std::iter::once(&config.frontend_url)
        .chain(config.cors_extra_origins.iter())
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(hv) => Some(hv),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
}
