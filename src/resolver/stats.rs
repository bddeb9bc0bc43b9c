//! Season-scoped competitive statistics.

use futures::future::join_all;
use serde::Serialize;
use tracing::{debug, info};

use crate::cache::CacheStatus;
use crate::error::Result;
use crate::resolver::{AccountResolver, MatchDetailFetcher, MatchListFetcher, RegionLocator, Resolved};
use crate::upstream::{AccountRecord, MatchDetail, MatchSummary, PlayerStats, Region};

/// Match details fetched concurrently per batch; batches run one after another.
pub const STATS_BATCH_SIZE: usize = 5;

/// Share of combat score used as the damage-per-round estimate.
const ADR_SCORE_FACTOR: f64 = 0.7;

// == Stat Totals ==
/// Running sums over the included matches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatTotals {
    pub matches: u32,
    pub kills: u64,
    pub deaths: u64,
    pub assists: u64,
    pub score: u64,
    pub rounds: u64,
}

impl StatTotals {
    pub fn add(&mut self, stats: PlayerStats) {
        self.matches += 1;
        self.kills += u64::from(stats.kills);
        self.deaths += u64::from(stats.deaths);
        self.assists += u64::from(stats.assists);
        self.score += u64::from(stats.score);
        self.rounds += u64::from(stats.rounds_played);
    }

    /// Kill/death ratio to two decimals, halves rounded up; with no deaths the
    /// kill count stands in.
    pub fn kd(&self) -> String {
        if self.deaths == 0 {
            return format!("{}.00", self.kills);
        }
        let hundredths = (self.kills * 200 + self.deaths) / (2 * self.deaths);
        format!("{}.{:02}", hundredths / 100, hundredths % 100)
    }

    /// Average combat score per round, 0 without rounds.
    pub fn acs(&self) -> u64 {
        self.per_round(self.score as f64)
    }

    /// Damage per round approximated from score; there is no damage field upstream.
    pub fn adr(&self) -> u64 {
        self.per_round(ADR_SCORE_FACTOR * self.score as f64)
    }

    fn per_round(&self, total: f64) -> u64 {
        if self.rounds == 0 {
            0
        } else {
            (total / self.rounds as f64).round() as u64
        }
    }
}

// == Season Filter ==
/// Folds match records into totals for a single season.
///
/// The first record that carries a season id fixes the season; later records
/// from any other season are excluded.
#[derive(Debug)]
pub(crate) struct SeasonAccumulator<'a> {
    puuid: &'a str,
    season: Option<String>,
    totals: StatTotals,
}

impl<'a> SeasonAccumulator<'a> {
    pub(crate) fn new(puuid: &'a str) -> Self {
        Self {
            puuid,
            season: None,
            totals: StatTotals::default(),
        }
    }

    /// Returns whether the match was counted.
    pub(crate) fn accept(&mut self, summary: &MatchSummary, detail: &MatchDetail) -> bool {
        let match_season = detail.season_id.as_ref().or(summary.season_id.as_ref());

        if self.season.is_none() {
            self.season = match_season.cloned();
        }
        if let Some(season) = &self.season {
            if match_season != Some(season) {
                debug!(match_id = %detail.match_id, "different season, excluded");
                return false;
            }
        }

        let Some(stats) = detail.player(self.puuid).and_then(|p| p.stats) else {
            debug!(match_id = %detail.match_id, "player missing from match, skipped");
            return false;
        };

        self.totals.add(stats);
        true
    }

    pub(crate) fn finish(self) -> (Option<String>, StatTotals) {
        (self.season, self.totals)
    }
}

// == Stats Report ==
#[derive(Debug, Clone, PartialEq)]
pub struct StatsReport {
    pub account: AccountRecord,
    /// `None` when no region has any history for the player
    pub region: Option<Region>,
    pub season: Option<String>,
    pub totals: StatTotals,
}

// == Stats Aggregator ==
#[derive(Clone)]
pub struct StatsAggregator {
    accounts: AccountResolver,
    regions: RegionLocator,
    lists: MatchListFetcher,
    details: MatchDetailFetcher,
}

impl StatsAggregator {
    pub fn new(
        accounts: AccountResolver,
        regions: RegionLocator,
        lists: MatchListFetcher,
        details: MatchDetailFetcher,
    ) -> Self {
        Self {
            accounts,
            regions,
            lists,
            details,
        }
    }

    /// Aggregates the player's competitive matches of the most recent season in their history.
    ///
    /// A player without any history gets an all-zero report, not an error.
    pub async fn compute_stats(&self, name: &str, tag: &str) -> Result<Resolved<StatsReport>> {
        let account = self.accounts.resolve(name, tag).await?;
        let mut cache = account.cache;
        let account = account.value;

        let region = match self.regions.locate(&account.puuid).await {
            Ok(region) => region,
            Err(err) if err.is_not_found() => {
                return Ok(Resolved::new(
                    StatsReport {
                        account,
                        region: None,
                        season: None,
                        totals: StatTotals::default(),
                    },
                    cache.combine(CacheStatus::Miss),
                ));
            }
            Err(err) => return Err(err),
        };
        cache = cache.combine(region.cache);
        let region = region.value;

        let history = self.lists.get_history(&account.puuid, region).await?;
        cache = cache.combine(history.cache);

        let competitive: Vec<&MatchSummary> =
            history.value.iter().filter(|m| m.is_competitive()).collect();

        let mut acc = SeasonAccumulator::new(&account.puuid);
        for batch in competitive.chunks(STATS_BATCH_SIZE) {
            let fetched = join_all(
                batch
                    .iter()
                    .map(|summary| self.details.get_match(&summary.match_id, region)),
            )
            .await;

            for (summary, detail) in batch.iter().zip(fetched) {
                cache = cache.combine(detail.cache);
                if let Some(detail) = detail.value {
                    acc.accept(summary, &detail);
                }
            }
        }

        let (season, totals) = acc.finish();
        info!(
            puuid = %account.puuid,
            %region,
            candidates = competitive.len(),
            included = totals.matches,
            "stats aggregated"
        );

        Ok(Resolved::new(
            StatsReport {
                account,
                region: Some(region),
                season,
                totals,
            },
            cache,
        ))
    }
}
