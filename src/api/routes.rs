//! API Routes
//!
//! Configures the Axum router with all resolver endpoints.

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    account_handler, cache_stats_handler, health_handler, match_handler, matches_handler,
    mmr_handler, rank_handler, stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /api/account/:name/:tag` - Resolve a Riot ID
/// - `GET /api/matches/:name/:tag` - Recent match history in the detected region
/// - `GET /api/match/:id` - One match, optional `?region=`
/// - `GET /api/stats/:name/:tag` - Current-season competitive aggregates
/// - `GET /api/mmr/:name/:tag` - Current rank as JSON
/// - `GET /api/rank/:name/:tag` - Current rank as plain text
/// - `GET /api/cache/stats` - Per-cache statistics
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/account/:name/:tag", get(account_handler))
        .route("/api/matches/:name/:tag", get(matches_handler))
        .route("/api/match/:id", get(match_handler))
        .route("/api/stats/:name/:tag", get(stats_handler))
        .route("/api/mmr/:name/:tag", get(mmr_handler))
        .route("/api/rank/:name/:tag", get(rank_handler))
        .route("/api/cache/stats", get(cache_stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
