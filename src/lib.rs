//! Rengar - a caching player-lookup service for the Riot API
//!
//! Resolves Riot IDs to accounts, finds the region a player plays in, and
//! derives match history, season statistics and rank, with every upstream
//! lookup cached and concurrent identical fetches coalesced.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod resolver;
pub mod tasks;
pub mod upstream;

pub use api::{create_router, AppState};
pub use config::Config;
pub use resolver::Resolver;
pub use tasks::spawn_cleanup_task;
