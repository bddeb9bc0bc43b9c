//! API Module
//!
//! HTTP handlers and routing for the resolver REST API.
//!
//! # Endpoints
//! - `GET /api/account/:name/:tag` - Resolve a Riot ID
//! - `GET /api/matches/:name/:tag` - Recent match history
//! - `GET /api/match/:id` - Match detail
//! - `GET /api/stats/:name/:tag` - Season statistics
//! - `GET /api/mmr/:name/:tag` and `GET /api/rank/:name/:tag` - Current rank
//! - `GET /api/cache/stats` - Cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
