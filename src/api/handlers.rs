//! API Handlers
//!
//! HTTP request handlers for each resolver endpoint. Resolver-backed
//! responses carry an `X-Cache: HIT|MISS` header.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::cache::CacheStatus;
use crate::config::Config;
use crate::error::Result;
use crate::models::{
    rank_text, AccountResponse, CacheStatsResponse, HealthResponse, MatchQuery, MatchResponse,
    MatchesResponse, MmrResponse, StatsResponse,
};
use crate::resolver::{Resolved, Resolver};
use crate::upstream::{HttpRiotClient, RiotApi};

/// Header reporting whether every cache lookup behind a response was a hit.
pub const CACHE_HEADER: &str = "x-cache";

/// A response body tagged with its `X-Cache` header.
pub type Cached<T> = ([(&'static str, &'static str); 1], T);

fn cached<T, U>(resolved: Resolved<T>, f: impl FnOnce(T) -> U) -> Cached<U> {
    tag(resolved.cache, f(resolved.value))
}

fn tag<T>(status: CacheStatus, body: T) -> Cached<T> {
    ([(CACHE_HEADER, status.header_value())], body)
}

/// Application state shared across all handlers.
///
/// The resolver owns the caches, so cloning the state shares them.
#[derive(Clone)]
pub struct AppState {
    pub resolver: Resolver,
}

impl AppState {
    pub fn new(resolver: Resolver) -> Self {
        Self { resolver }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Builds the HTTP upstream client and one resolver around it.
    pub fn from_config(config: &Config) -> Result<Self> {
        let api: Arc<dyn RiotApi> = Arc::new(HttpRiotClient::new(config)?);
        Ok(Self::new(Resolver::new(api, config.ttls(), config.max_entries)))
    }
}

/// Handler for GET /api/account/:name/:tag
pub async fn account_handler(
    State(state): State<AppState>,
    Path((name, tag_line)): Path<(String, String)>,
) -> Result<Cached<Json<AccountResponse>>> {
    let account = state.resolver.resolve_account(&name, &tag_line).await?;
    Ok(cached(account, |a| Json(a.into())))
}

/// Handler for GET /api/matches/:name/:tag
///
/// Most recent entries of the player's history in their detected region.
pub async fn matches_handler(
    State(state): State<AppState>,
    Path((name, tag_line)): Path<(String, String)>,
) -> Result<Cached<Json<MatchesResponse>>> {
    let resolved = state.resolver.resolve_history(&name, &tag_line).await?;
    Ok(cached(resolved, |(account, region, history)| {
        Json(MatchesResponse::new(account, region, &history))
    }))
}

/// Handler for GET /api/match/:id
///
/// Looks only in `?region=` when given, otherwise in every region in turn.
pub async fn match_handler(
    State(state): State<AppState>,
    Path(match_id): Path<String>,
    Query(query): Query<MatchQuery>,
) -> Result<Cached<Json<MatchResponse>>> {
    let region = query.region()?;
    let found = state.resolver.find_match(&match_id, region).await?;
    Ok(cached(found, |(region, detail)| {
        Json(MatchResponse::new(region, &detail))
    }))
}

/// Handler for GET /api/stats/:name/:tag
pub async fn stats_handler(
    State(state): State<AppState>,
    Path((name, tag_line)): Path<(String, String)>,
) -> Result<Cached<Json<StatsResponse>>> {
    let report = state.resolver.compute_stats(&name, &tag_line).await?;
    Ok(cached(report, |r| Json(r.into())))
}

/// Handler for GET /api/mmr/:name/:tag
pub async fn mmr_handler(
    State(state): State<AppState>,
    Path((name, tag_line)): Path<(String, String)>,
) -> Result<Cached<Json<MmrResponse>>> {
    let report = state.resolver.compute_rank(&name, &tag_line).await?;
    Ok(cached(report, |r| Json(r.into())))
}

/// Handler for GET /api/rank/:name/:tag
///
/// Plain-text variant of the mmr endpoint.
pub async fn rank_handler(
    State(state): State<AppState>,
    Path((name, tag_line)): Path<(String, String)>,
) -> Result<Cached<String>> {
    let report = state.resolver.compute_rank(&name, &tag_line).await?;
    Ok(cached(report, |r| rank_text(&r)))
}

/// Handler for GET /api/cache/stats
pub async fn cache_stats_handler(State(state): State<AppState>) -> Json<CacheStatsResponse> {
    Json(state.resolver.cache_stats().await.into())
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
