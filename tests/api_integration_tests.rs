//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycle for each endpoint against a scripted
//! upstream.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    response::Response,
    Router,
};
use rengar::{
    api::create_router,
    config::{CacheTtls, Config},
    error::{ApiError, Result},
    upstream::{
        AccountRecord, MatchDetail, MatchSummary, PlayerEntry, PlayerStats, Region, RiotApi,
        COMPETITIVE_QUEUE,
    },
    AppState, Resolver,
};
use serde_json::Value;
use tower::ServiceExt;

// == Scripted Upstream ==

#[derive(Default)]
struct ScriptedApi {
    accounts: HashMap<String, AccountRecord>,
    histories: HashMap<(String, Region), Result<Vec<MatchSummary>>>,
    matches: HashMap<String, MatchDetail>,
    latency: Duration,
    account_calls: AtomicUsize,
    list_calls: AtomicUsize,
}

impl ScriptedApi {
    fn account(mut self, name: &str, tag: &str, puuid: &str) -> Self {
        self.accounts.insert(
            format!("{name}#{tag}"),
            AccountRecord {
                puuid: puuid.to_string(),
                name: name.to_string(),
                tag: tag.to_string(),
            },
        );
        self
    }

    fn history(mut self, puuid: &str, region: Region, history: Vec<MatchSummary>) -> Self {
        self.histories
            .insert((puuid.to_string(), region), Ok(history));
        self
    }

    fn failing_history(mut self, puuid: &str, region: Region) -> Self {
        self.histories.insert(
            (puuid.to_string(), region),
            Err(ApiError::Upstream("status 503".to_string())),
        );
        self
    }

    fn detail(mut self, detail: MatchDetail) -> Self {
        self.matches.insert(detail.match_id.clone(), detail);
        self
    }

    fn latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }
}

#[async_trait]
impl RiotApi for ScriptedApi {
    async fn account_by_riot_id(&self, name: &str, tag: &str) -> Result<AccountRecord> {
        self.account_calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.latency).await;
        self.accounts
            .get(&format!("{name}#{tag}"))
            .cloned()
            .ok_or_else(|| ApiError::NotFound("Player not found".to_string()))
    }

    async fn match_list(&self, puuid: &str, region: Region) -> Result<Vec<MatchSummary>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.latency).await;
        self.histories
            .get(&(puuid.to_string(), region))
            .cloned()
            .unwrap_or_else(|| Err(ApiError::NotFound("Match history not found".to_string())))
    }

    async fn match_detail(&self, match_id: &str, region: Region) -> Result<MatchDetail> {
        tokio::time::sleep(self.latency).await;
        match self.matches.get(match_id) {
            Some(detail) if region == Region::Na => Ok(detail.clone()),
            _ => Err(ApiError::NotFound("Match not found".to_string())),
        }
    }
}

// == Helper Functions ==

fn summary(id: &str, queue: &str, season: &str) -> MatchSummary {
    MatchSummary {
        match_id: id.to_string(),
        start_time_millis: 1_700_000_000_000,
        queue_id: queue.to_string(),
        season_id: Some(season.to_string()),
    }
}

fn detail(id: &str, season: &str, puuid: &str, stats: PlayerStats, tier: u32) -> MatchDetail {
    MatchDetail {
        match_id: id.to_string(),
        map: Some("/Game/Maps/Bonsai/Bonsai".to_string()),
        mode: Some(COMPETITIVE_QUEUE.to_string()),
        start_time_millis: Some(1_700_000_000_000),
        duration_millis: Some(2_400_000),
        season_id: Some(season.to_string()),
        players: vec![PlayerEntry {
            puuid: puuid.to_string(),
            display_name: Some("my melody".to_string()),
            tagline: Some("aaa".to_string()),
            team_id: Some("Blue".to_string()),
            character_id: Some("jett".to_string()),
            competitive_tier: Some(tier),
            card_id: Some("card-1".to_string()),
            stats: Some(stats),
        }],
        teams: Vec::new(),
    }
}

fn line(kills: u32, deaths: u32, assists: u32, score: u32, rounds: u32) -> PlayerStats {
    PlayerStats {
        kills,
        deaths,
        assists,
        score,
        rounds_played: rounds,
    }
}

/// A player on NA with two current-season competitive matches, one
/// unrated match and one competitive match from an older season.
fn scripted() -> ScriptedApi {
    ScriptedApi::default()
        .account("my melody", "aaa", "p1")
        .account("lurker", "0001", "p2")
        .history(
            "p1",
            Region::Na,
            vec![
                summary("m1", COMPETITIVE_QUEUE, "S1"),
                summary("m2", "unrated", "S1"),
                summary("m3", COMPETITIVE_QUEUE, "S1"),
                summary("m4", COMPETITIVE_QUEUE, "S0"),
            ],
        )
        .detail(detail("m1", "S1", "p1", line(20, 10, 5, 5000, 20), 15))
        .detail(detail("m3", "S1", "p1", line(10, 10, 5, 3000, 20), 14))
        .detail(detail("m4", "S0", "p1", line(99, 1, 0, 9900, 10), 9))
}

fn create_app(api: Arc<ScriptedApi>) -> Router {
    let resolver = Resolver::new(api, CacheTtls::default(), 100);
    create_router(AppState::new(resolver))
}

async fn get(app: &Router, uri: &str) -> Response {
    app.clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn body_to_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_to_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn cache_header(response: &Response) -> &str {
    response.headers()["x-cache"].to_str().unwrap()
}

// == Account Endpoint ==

#[tokio::test]
async fn test_account_endpoint_caches() {
    let api = Arc::new(scripted());
    let app = create_app(api.clone());

    let first = get(&app, "/api/account/my%20melody/aaa").await;
    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(cache_header(&first), "MISS");
    let json = body_to_json(first).await;
    assert_eq!(json["puuid"], "p1");
    assert_eq!(json["name"], "my melody");

    let second = get(&app, "/api/account/my%20melody/aaa").await;
    assert_eq!(cache_header(&second), "HIT");
    assert_eq!(api.account_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_account_endpoint_not_found() {
    let app = create_app(Arc::new(scripted()));

    let response = get(&app, "/api/account/nobody/0000").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_to_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("Player not found"));
}

// == Matches Endpoint ==

#[tokio::test]
async fn test_matches_endpoint_detects_region() {
    let api = Arc::new(scripted());
    let app = create_app(api.clone());

    let response = get(&app, "/api/matches/my%20melody/aaa").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response).await;

    assert_eq!(json["region"], "na");
    assert_eq!(json["matches"].as_array().unwrap().len(), 4);
    assert_eq!(json["matches"][0]["id"], "m1");
    // One probe per region; the winning history is reused rather than refetched
    assert_eq!(api.list_calls.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn test_matches_endpoint_no_history() {
    let app = create_app(Arc::new(scripted()));

    let response = get(&app, "/api/matches/lurker/0001").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_failed_region_probe_does_not_hide_history() {
    let api = scripted().failing_history("p1", Region::Eu);
    let app = create_app(Arc::new(api));

    let response = get(&app, "/api/matches/my%20melody/aaa").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_to_json(response).await["region"], "na");
}

#[tokio::test]
async fn test_all_region_probes_failing_is_bad_gateway() {
    let mut api = ScriptedApi::default().account("a", "b", "p9");
    for region in Region::CANDIDATES {
        api = api.failing_history("p9", region);
    }
    let app = create_app(Arc::new(api));

    let response = get(&app, "/api/matches/a/b").await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

// == Match Endpoint ==

#[tokio::test]
async fn test_match_endpoint_searches_regions() {
    let app = create_app(Arc::new(scripted()));

    let response = get(&app, "/api/match/m1").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response).await;

    assert_eq!(json["id"], "m1");
    assert_eq!(json["region"], "na");
    assert_eq!(json["players"][0]["agent"], "jett");
    assert_eq!(json["players"][0]["kills"], 20);
}

#[tokio::test]
async fn test_match_endpoint_explicit_region() {
    let app = create_app(Arc::new(scripted()));

    let missing = get(&app, "/api/match/m3?region=kr").await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);

    let found = get(&app, "/api/match/m1?region=NA").await;
    assert_eq!(found.status(), StatusCode::OK);
    assert_eq!(cache_header(&found), "MISS");

    // A cached match answers with the region it was fetched from
    let cached = get(&app, "/api/match/m1?region=kr").await;
    assert_eq!(cached.status(), StatusCode::OK);
    assert_eq!(cache_header(&cached), "HIT");
    assert_eq!(body_to_json(cached).await["region"], "na");

    let invalid = get(&app, "/api/match/m1?region=moon").await;
    assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);
}

// == Stats Endpoint ==

#[tokio::test]
async fn test_stats_endpoint_current_season_only() {
    let app = create_app(Arc::new(scripted()));

    let response = get(&app, "/api/stats/my%20melody/aaa").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(cache_header(&response), "MISS");
    let json = body_to_json(response).await;

    assert_eq!(json["region"], "na");
    assert_eq!(json["matches"], 2);
    assert_eq!(json["kills"], 30);
    assert_eq!(json["deaths"], 20);
    assert_eq!(json["assists"], 10);
    assert_eq!(json["kd"], "1.50");
    assert_eq!(json["acs"], 200);
    assert_eq!(json["adr"], 140);

    let again = get(&app, "/api/stats/my%20melody/aaa").await;
    assert_eq!(cache_header(&again), "HIT");
}

#[tokio::test]
async fn test_stats_endpoint_without_history_is_zeroed() {
    let app = create_app(Arc::new(scripted()));

    let response = get(&app, "/api/stats/lurker/0001").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response).await;

    assert!(json["region"].is_null());
    assert_eq!(json["matches"], 0);
    assert_eq!(json["kd"], "0.00");
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_requests_share_upstream_calls() {
    let api = Arc::new(scripted().latency(Duration::from_millis(50)));
    let app = create_app(api.clone());

    let requests = (0..8).map(|_| get(&app, "/api/stats/my%20melody/aaa"));
    let responses = futures::future::join_all(requests).await;

    assert!(responses.iter().all(|r| r.status() == StatusCode::OK));
    assert_eq!(api.account_calls.load(Ordering::SeqCst), 1);
    assert_eq!(api.list_calls.load(Ordering::SeqCst), 4);
}

// == Rank Endpoints ==

#[tokio::test]
async fn test_mmr_endpoint_uses_latest_competitive_match() {
    let app = create_app(Arc::new(scripted()));

    let response = get(&app, "/api/mmr/my%20melody/aaa").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response).await;

    assert_eq!(json["rank"], "Platinum 1");
    assert_eq!(json["rr"], 0);
    assert_eq!(json["card"], "card-1");
    assert_eq!(json["region"], "na");
}

#[tokio::test]
async fn test_rank_endpoint_plain_text() {
    let app = create_app(Arc::new(scripted()));

    let response = get(&app, "/api/rank/my%20melody/aaa").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_to_text(response).await, "my melody#aaa is Platinum 1");

    let unranked = get(&app, "/api/rank/lurker/0001").await;
    assert_eq!(body_to_text(unranked).await, "lurker#0001 is Unranked");
}

// == Cache Stats and Health ==

#[tokio::test]
async fn test_cache_stats_endpoint() {
    let app = create_app(Arc::new(scripted()));
    get(&app, "/api/account/my%20melody/aaa").await;
    get(&app, "/api/account/my%20melody/aaa").await;

    let response = get(&app, "/api/cache/stats").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response).await;

    assert_eq!(json["account"]["hits"], 1);
    assert_eq!(json["account"]["misses"], 1);
    assert_eq!(json["account"]["total_entries"], 1);
    assert_eq!(json["account"]["hit_rate"], 0.5);
    assert_eq!(json["region"]["total_entries"], 0);
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_app(Arc::new(scripted()));

    let response = get(&app, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response).await;
    assert_eq!(json["status"], "healthy");
    assert!(json.get("timestamp").is_some());
}

// == Configuration ==

#[tokio::test]
async fn test_missing_api_key_is_server_error() {
    let config = Config {
        api_key: None,
        ..Config::default()
    };
    let app = create_router(AppState::from_config(&config).unwrap());

    let response = get(&app, "/api/account/my%20melody/aaa").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body_to_json(response).await["error"]
        .as_str()
        .unwrap()
        .contains("API key"));
}
