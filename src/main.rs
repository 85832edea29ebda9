//! Seatflow Backend
//!
//! REST backend for hackathon seat allocation: venue catalog management and
//! transactional seat assignment for checked-in teams.

mod api;
mod auth;
mod config;
mod db;
mod errors;
mod models;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use db::{AllocationEngine, CatalogRepository};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CatalogRepository>,
    pub allocations: Arc<AllocationEngine>,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env();

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Seatflow Backend");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Bind address: {}", config.bind_addr);
    tracing::info!("Supported city: {}", config.city);

    // Warn if PSK is not configured
    if config.api_psk.is_none() {
        tracing::warn!("No API PSK configured (SEATFLOW_API_PSK). Authentication is disabled!");
    }

    // Initialize database
    let pool = db::init_database(&config.db_path).await?;
    let catalog = Arc::new(CatalogRepository::new(pool.clone()));
    let allocations = Arc::new(AllocationEngine::new(pool));

    // Create application state
    let state = AppState {
        catalog,
        allocations,
        config: Arc::new(config.clone()),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Clone PSK for the auth layer
    let psk = state.config.api_psk.clone();

    // API routes
    let api_routes = Router::new()
        // Catalog
        .route("/blocks", post(api::create_block))
        .route("/blocks", get(api::list_blocks))
        .route("/blocks/{id}/rooms", get(api::list_rooms))
        .route("/rooms", post(api::create_room))
        .route("/rooms/{id}/seats/grid", post(api::generate_seat_grid))
        .route("/rooms/{id}/seats", get(api::list_seats))
        .route("/rooms/occupancy/recompute", post(api::recompute_occupancy))
        .route("/seats/size-preference", put(api::set_seat_size_preference))
        // Allocation
        .route("/allocations", post(api::allocate_seat))
        .route("/allocations/stats", get(api::get_allocation_stats))
        .route("/allocations/{team_id}", get(api::get_team_allocation))
        .route("/allocations/{team_id}", delete(api::release_seat))
        // Apply PSK auth middleware
        .layer(middleware::from_fn(move |req, next| {
            auth::psk_auth_layer(psk.clone(), req, next)
        }));

    // Health check (no auth required)
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
