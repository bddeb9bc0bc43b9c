//! Response DTOs for the resolver API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::CacheStats;
use crate::resolver::{RankReport, ResolverCacheStats, StatsReport};
use crate::upstream::{AccountRecord, MatchDetail, MatchSummary, PlayerEntry, Region, TeamResult};

/// Number of history entries returned by the matches endpoint.
pub const MATCH_LIST_LIMIT: usize = 20;

/// Response body for `GET /api/account/:name/:tag`
#[derive(Debug, Clone, Serialize)]
pub struct AccountResponse {
    pub puuid: String,
    pub name: String,
    pub tag: String,
}

impl From<AccountRecord> for AccountResponse {
    fn from(account: AccountRecord) -> Self {
        Self {
            puuid: account.puuid,
            name: account.name,
            tag: account.tag,
        }
    }
}

/// One entry of `MatchesResponse::matches`
#[derive(Debug, Clone, Serialize)]
pub struct MatchEntry {
    pub id: String,
    pub started: i64,
    pub queue: String,
}

/// Response body for `GET /api/matches/:name/:tag`
#[derive(Debug, Clone, Serialize)]
pub struct MatchesResponse {
    pub name: String,
    pub tag: String,
    pub puuid: String,
    pub region: Region,
    pub matches: Vec<MatchEntry>,
}

impl MatchesResponse {
    /// Keeps the most recent `MATCH_LIST_LIMIT` entries.
    pub fn new(account: AccountRecord, region: Region, history: &[MatchSummary]) -> Self {
        Self {
            name: account.name,
            tag: account.tag,
            puuid: account.puuid,
            region,
            matches: history
                .iter()
                .take(MATCH_LIST_LIMIT)
                .map(|m| MatchEntry {
                    id: m.match_id.clone(),
                    started: m.start_time_millis,
                    queue: m.queue_id.clone(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchPlayer {
    pub puuid: String,
    pub name: Option<String>,
    pub tag: Option<String>,
    pub team: Option<String>,
    pub agent: Option<String>,
    pub kills: Option<u32>,
    pub deaths: Option<u32>,
    pub assists: Option<u32>,
    pub score: Option<u32>,
}

impl From<&PlayerEntry> for MatchPlayer {
    fn from(p: &PlayerEntry) -> Self {
        Self {
            puuid: p.puuid.clone(),
            name: p.display_name.clone(),
            tag: p.tagline.clone(),
            team: p.team_id.clone(),
            agent: p.character_id.clone(),
            kills: p.stats.map(|s| s.kills),
            deaths: p.stats.map(|s| s.deaths),
            assists: p.stats.map(|s| s.assists),
            score: p.stats.map(|s| s.score),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchTeam {
    pub id: String,
    pub won: bool,
    pub rounds: u32,
    pub total: u32,
}

impl From<&TeamResult> for MatchTeam {
    fn from(t: &TeamResult) -> Self {
        Self {
            id: t.team_id.clone(),
            won: t.won,
            rounds: t.rounds_won,
            total: t.rounds_played,
        }
    }
}

/// Response body for `GET /api/match/:id`
#[derive(Debug, Clone, Serialize)]
pub struct MatchResponse {
    pub id: String,
    pub map: Option<String>,
    pub mode: Option<String>,
    pub started: Option<i64>,
    pub length: Option<i64>,
    pub region: Region,
    pub players: Vec<MatchPlayer>,
    pub teams: Vec<MatchTeam>,
}

impl MatchResponse {
    pub fn new(region: Region, detail: &MatchDetail) -> Self {
        Self {
            id: detail.match_id.clone(),
            map: detail.map.clone(),
            mode: detail.mode.clone(),
            started: detail.start_time_millis,
            length: detail.duration_millis,
            region,
            players: detail.players.iter().map(MatchPlayer::from).collect(),
            teams: detail.teams.iter().map(MatchTeam::from).collect(),
        }
    }
}

/// Response body for `GET /api/stats/:name/:tag`
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub name: String,
    pub tag: String,
    pub puuid: String,
    pub region: Option<Region>,
    pub matches: u32,
    pub kills: u64,
    pub deaths: u64,
    pub assists: u64,
    /// Two decimals, e.g. "1.25"
    pub kd: String,
    pub acs: u64,
    pub adr: u64,
}

impl From<StatsReport> for StatsResponse {
    fn from(report: StatsReport) -> Self {
        let totals = report.totals;
        Self {
            name: report.account.name,
            tag: report.account.tag,
            puuid: report.account.puuid,
            region: report.region,
            matches: totals.matches,
            kills: totals.kills,
            deaths: totals.deaths,
            assists: totals.assists,
            kd: totals.kd(),
            acs: totals.acs(),
            adr: totals.adr(),
        }
    }
}

/// Response body for `GET /api/mmr/:name/:tag`
#[derive(Debug, Clone, Serialize)]
pub struct MmrResponse {
    pub name: String,
    pub tag: String,
    pub puuid: String,
    pub region: Option<Region>,
    pub rank: String,
    pub rr: u32,
    pub card: Option<String>,
}

impl From<RankReport> for MmrResponse {
    fn from(report: RankReport) -> Self {
        Self {
            name: report.account.name,
            tag: report.account.tag,
            puuid: report.account.puuid,
            region: report.region,
            rank: report.rank.to_string(),
            rr: report.rr,
            card: report.card,
        }
    }
}

/// Plain-text rank line for chat bots, with the rating appended when known.
pub fn rank_text(report: &RankReport) -> String {
    let line = format!(
        "{}#{} is {}",
        report.account.name, report.account.tag, report.rank
    );
    if report.rr > 0 {
        format!("{line} ({}rr)", report.rr)
    } else {
        line
    }
}

/// Per-cache entry of `CacheStatsResponse`
#[derive(Debug, Clone, Serialize)]
pub struct CacheSummary {
    #[serde(flatten)]
    pub stats: CacheStats,
    pub hit_rate: f64,
}

impl From<CacheStats> for CacheSummary {
    fn from(stats: CacheStats) -> Self {
        let hit_rate = stats.hit_rate();
        Self { stats, hit_rate }
    }
}

/// Response body for `GET /api/cache/stats`
#[derive(Debug, Clone, Serialize)]
pub struct CacheStatsResponse {
    pub account: CacheSummary,
    pub region: CacheSummary,
    pub match_list: CacheSummary,
    pub match_detail: CacheSummary,
}

impl From<ResolverCacheStats> for CacheStatsResponse {
    fn from(stats: ResolverCacheStats) -> Self {
        Self {
            account: stats.account.into(),
            region: stats.region.into(),
            match_list: stats.match_list.into(),
            match_detail: stats.match_detail.into(),
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
