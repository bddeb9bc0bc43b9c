//! In-process `RiotApi` used by unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{ApiError, Result};
use crate::upstream::models::{
    AccountRecord, MatchDetail, MatchSummary, PlayerEntry, PlayerStats, COMPETITIVE_QUEUE,
};
use crate::upstream::{Region, RiotApi};

#[derive(Default)]
pub(crate) struct FakeRiotApi {
    accounts: HashMap<(String, String), AccountRecord>,
    histories: HashMap<(String, Region), Result<Vec<MatchSummary>>>,
    matches: HashMap<String, Result<MatchDetail>>,
    delays: HashMap<Region, Duration>,
    pub account_calls: AtomicUsize,
    pub detail_calls: AtomicUsize,
    list_calls: Mutex<HashMap<Region, usize>>,
}

impl FakeRiotApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_account(mut self, name: &str, tag: &str, puuid: &str) -> Self {
        self.accounts.insert(
            (name.to_string(), tag.to_string()),
            AccountRecord {
                puuid: puuid.to_string(),
                name: name.to_string(),
                tag: tag.to_string(),
            },
        );
        self
    }

    pub fn with_history(mut self, puuid: &str, region: Region, history: Vec<MatchSummary>) -> Self {
        self.histories.insert((puuid.to_string(), region), Ok(history));
        self
    }

    pub fn with_history_error(mut self, puuid: &str, region: Region, err: ApiError) -> Self {
        self.histories.insert((puuid.to_string(), region), Err(err));
        self
    }

    pub fn with_match(mut self, detail: MatchDetail) -> Self {
        self.matches.insert(detail.match_id.clone(), Ok(detail));
        self
    }

    pub fn with_match_error(mut self, match_id: &str, err: ApiError) -> Self {
        self.matches.insert(match_id.to_string(), Err(err));
        self
    }

    /// Delays every response from `region`.
    pub fn with_delay(mut self, region: Region, delay: Duration) -> Self {
        self.delays.insert(region, delay);
        self
    }

    pub fn list_calls(&self, region: Region) -> usize {
        self.list_calls
            .lock()
            .map(|calls| calls.get(&region).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    pub fn total_list_calls(&self) -> usize {
        Region::CANDIDATES.iter().map(|r| self.list_calls(*r)).sum()
    }

    async fn delay(&self, region: Region) {
        if let Some(delay) = self.delays.get(&region) {
            tokio::time::sleep(*delay).await;
        }
    }
}

#[async_trait]
impl RiotApi for FakeRiotApi {
    async fn account_by_riot_id(&self, name: &str, tag: &str) -> Result<AccountRecord> {
        self.account_calls.fetch_add(1, Ordering::SeqCst);
        self.accounts
            .get(&(name.to_string(), tag.to_string()))
            .cloned()
            .ok_or_else(|| ApiError::NotFound("Player not found".to_string()))
    }

    async fn match_list(&self, puuid: &str, region: Region) -> Result<Vec<MatchSummary>> {
        if let Ok(mut calls) = self.list_calls.lock() {
            *calls.entry(region).or_default() += 1;
        }
        self.delay(region).await;
        self.histories
            .get(&(puuid.to_string(), region))
            .cloned()
            .unwrap_or_else(|| Err(ApiError::NotFound("Match history not found".to_string())))
    }

    async fn match_detail(&self, match_id: &str, region: Region) -> Result<MatchDetail> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        self.delay(region).await;
        self.matches
            .get(match_id)
            .cloned()
            .unwrap_or_else(|| Err(ApiError::NotFound("Match not found".to_string())))
    }
}

// == Fixture Builders ==

pub(crate) fn summary(match_id: &str, queue_id: &str) -> MatchSummary {
    MatchSummary {
        match_id: match_id.to_string(),
        start_time_millis: 0,
        queue_id: queue_id.to_string(),
        season_id: None,
    }
}

pub(crate) fn competitive(match_id: &str) -> MatchSummary {
    summary(match_id, COMPETITIVE_QUEUE)
}

pub(crate) fn player(puuid: &str, stats: PlayerStats) -> PlayerEntry {
    PlayerEntry {
        puuid: puuid.to_string(),
        display_name: None,
        tagline: None,
        team_id: Some("Red".to_string()),
        character_id: None,
        competitive_tier: None,
        card_id: None,
        stats: Some(stats),
    }
}

pub(crate) fn stats(kills: u32, deaths: u32, assists: u32, score: u32, rounds: u32) -> PlayerStats {
    PlayerStats {
        kills,
        deaths,
        assists,
        score,
        rounds_played: rounds,
    }
}

pub(crate) fn detail(match_id: &str, season: &str, players: Vec<PlayerEntry>) -> MatchDetail {
    MatchDetail {
        match_id: match_id.to_string(),
        map: Some("/Game/Maps/Ascent/Ascent".to_string()),
        mode: Some(COMPETITIVE_QUEUE.to_string()),
        start_time_millis: Some(0),
        duration_millis: Some(0),
        season_id: Some(season.to_string()),
        players,
        teams: Vec::new(),
    }
}
