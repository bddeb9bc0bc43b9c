//! Upstream wire formats and the typed records they are validated into.
//!
//! Every wire field is optional; conversion happens once, at the client
//! boundary, so nothing downstream handles loosely shaped JSON.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Queue id of ranked matches.
pub const COMPETITIVE_QUEUE: &str = "competitive";

// == Domain Records ==

/// A resolved Riot ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountRecord {
    pub puuid: String,
    pub name: String,
    pub tag: String,
}

/// One entry of a player's match history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchSummary {
    pub match_id: String,
    pub start_time_millis: i64,
    pub queue_id: String,
    pub season_id: Option<String>,
}

impl MatchSummary {
    pub fn is_competitive(&self) -> bool {
        self.queue_id == COMPETITIVE_QUEUE
    }
}

/// Match history, most recent first, shared between cache and callers.
pub type MatchHistory = Arc<Vec<MatchSummary>>;

/// A finished match.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchDetail {
    pub match_id: String,
    pub map: Option<String>,
    pub mode: Option<String>,
    pub start_time_millis: Option<i64>,
    pub duration_millis: Option<i64>,
    pub season_id: Option<String>,
    pub players: Vec<PlayerEntry>,
    pub teams: Vec<TeamResult>,
}

impl MatchDetail {
    pub fn player(&self, puuid: &str) -> Option<&PlayerEntry> {
        self.players.iter().find(|p| p.puuid == puuid)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerEntry {
    pub puuid: String,
    pub display_name: Option<String>,
    pub tagline: Option<String>,
    pub team_id: Option<String>,
    pub character_id: Option<String>,
    pub competitive_tier: Option<u32>,
    pub card_id: Option<String>,
    /// Absent when the upstream record carries no stats block
    pub stats: Option<PlayerStats>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerStats {
    pub kills: u32,
    pub deaths: u32,
    pub assists: u32,
    pub score: u32,
    pub rounds_played: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamResult {
    pub team_id: String,
    pub won: bool,
    pub rounds_won: u32,
    pub rounds_played: u32,
}

// == Wire Formats ==

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountDto {
    pub puuid: Option<String>,
    pub game_name: Option<String>,
    pub tag_line: Option<String>,
}

impl TryFrom<AccountDto> for AccountRecord {
    type Error = ApiError;

    fn try_from(dto: AccountDto) -> Result<Self, Self::Error> {
        let puuid = dto
            .puuid
            .filter(|p| !p.is_empty())
            .ok_or_else(|| ApiError::Upstream("account response missing puuid".to_string()))?;

        Ok(Self {
            puuid,
            name: dto.game_name.unwrap_or_default(),
            tag: dto.tag_line.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct MatchListDto {
    #[serde(default)]
    pub history: Vec<MatchSummaryDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchSummaryDto {
    pub match_id: Option<String>,
    pub game_start_time_millis: Option<i64>,
    pub queue_id: Option<String>,
    pub season_id: Option<String>,
}

impl From<MatchListDto> for Vec<MatchSummary> {
    /// Entries without a match id cannot be fetched and are dropped.
    fn from(dto: MatchListDto) -> Self {
        dto.history
            .into_iter()
            .filter_map(|m| {
                Some(MatchSummary {
                    match_id: m.match_id.filter(|id| !id.is_empty())?,
                    start_time_millis: m.game_start_time_millis.unwrap_or_default(),
                    queue_id: m.queue_id.unwrap_or_default(),
                    season_id: m.season_id,
                })
            })
            .collect()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchDto {
    pub match_info: Option<MatchInfoDto>,
    #[serde(default)]
    pub players: Vec<PlayerDto>,
    #[serde(default)]
    pub teams: Vec<TeamDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchInfoDto {
    pub match_id: Option<String>,
    pub map_id: Option<String>,
    pub queue_id: Option<String>,
    pub game_start_millis: Option<i64>,
    pub game_length_millis: Option<i64>,
    pub season_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerDto {
    pub puuid: Option<String>,
    pub game_name: Option<String>,
    pub tag_line: Option<String>,
    pub team_id: Option<String>,
    pub character_id: Option<String>,
    pub competitive_tier: Option<u32>,
    pub player_card: Option<String>,
    pub stats: Option<PlayerStatsDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStatsDto {
    pub kills: Option<u32>,
    pub deaths: Option<u32>,
    pub assists: Option<u32>,
    pub score: Option<u32>,
    pub rounds_played: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamDto {
    pub team_id: Option<String>,
    pub won: Option<bool>,
    pub rounds_won: Option<u32>,
    pub rounds_played: Option<u32>,
}

impl MatchDto {
    /// Validates the record; `requested_id` stands in when `matchInfo` lacks one.
    pub fn into_detail(self, requested_id: &str) -> MatchDetail {
        let info = self.match_info;
        let (match_id, map, mode, start, length, season) = match info {
            Some(i) => (
                i.match_id,
                i.map_id,
                i.queue_id,
                i.game_start_millis,
                i.game_length_millis,
                i.season_id,
            ),
            None => (None, None, None, None, None, None),
        };

        MatchDetail {
            match_id: match_id.unwrap_or_else(|| requested_id.to_string()),
            map,
            mode,
            start_time_millis: start,
            duration_millis: length,
            season_id: season,
            players: self.players.into_iter().filter_map(PlayerDto::into_entry).collect(),
            teams: self.teams.into_iter().map(TeamDto::into_result).collect(),
        }
    }
}

impl PlayerDto {
    fn into_entry(self) -> Option<PlayerEntry> {
        Some(PlayerEntry {
            puuid: self.puuid.filter(|p| !p.is_empty())?,
            display_name: self.game_name,
            tagline: self.tag_line,
            team_id: self.team_id,
            character_id: self.character_id,
            competitive_tier: self.competitive_tier,
            card_id: self.player_card.filter(|c| !c.is_empty()),
            stats: self.stats.map(|s| PlayerStats {
                kills: s.kills.unwrap_or(0),
                deaths: s.deaths.unwrap_or(0),
                assists: s.assists.unwrap_or(0),
                score: s.score.unwrap_or(0),
                rounds_played: s.rounds_played.unwrap_or(0),
            }),
        })
    }
}

impl TeamDto {
    fn into_result(self) -> TeamResult {
        TeamResult {
            team_id: self.team_id.unwrap_or_default(),
            won: self.won.unwrap_or(false),
            rounds_won: self.rounds_won.unwrap_or(0),
            rounds_played: self.rounds_played.unwrap_or(0),
        }
    }
}
