//! Current rank from the most recent competitive match.

use tracing::debug;

use crate::cache::CacheStatus;
use crate::error::Result;
use crate::resolver::{AccountResolver, MatchDetailFetcher, MatchListFetcher, RegionLocator, Resolved};
use crate::upstream::{AccountRecord, Region};

pub const UNRANKED: &str = "Unranked";

/// Human label for a competitive tier code. 0, 1, 2 and unknown codes are unranked.
pub fn tier_name(tier: u32) -> &'static str {
    match tier {
        3 => "Iron 1",
        4 => "Iron 2",
        5 => "Iron 3",
        6 => "Bronze 1",
        7 => "Bronze 2",
        8 => "Bronze 3",
        9 => "Silver 1",
        10 => "Silver 2",
        11 => "Silver 3",
        12 => "Gold 1",
        13 => "Gold 2",
        14 => "Gold 3",
        15 => "Platinum 1",
        16 => "Platinum 2",
        17 => "Platinum 3",
        18 => "Diamond 1",
        19 => "Diamond 2",
        20 => "Diamond 3",
        21 => "Ascendant 1",
        22 => "Ascendant 2",
        23 => "Ascendant 3",
        24 => "Immortal 1",
        25 => "Immortal 2",
        26 => "Immortal 3",
        27 => "Radiant",
        _ => UNRANKED,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankReport {
    pub account: AccountRecord,
    /// `None` when no region has any history for the player
    pub region: Option<Region>,
    pub rank: &'static str,
    pub tier: Option<u32>,
    pub card: Option<String>,
    /// Rank rating within the tier; match records do not carry it, so it stays 0
    pub rr: u32,
}

impl RankReport {
    fn unranked(account: AccountRecord, region: Option<Region>) -> Self {
        Self {
            account,
            region,
            rank: UNRANKED,
            tier: None,
            card: None,
            rr: 0,
        }
    }
}

#[derive(Clone)]
pub struct RankResolver {
    accounts: AccountResolver,
    regions: RegionLocator,
    lists: MatchListFetcher,
    details: MatchDetailFetcher,
}

impl RankResolver {
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

    /// Reads tier and card from the player's latest competitive match.
    ///
    /// No history, no competitive match, or a match that cannot be read all
    /// yield `Unranked` rather than an error.
    pub async fn compute_rank(&self, name: &str, tag: &str) -> Result<Resolved<RankReport>> {
        let account = self.accounts.resolve(name, tag).await?;
        let mut cache = account.cache;
        let account = account.value;

        let region = match self.regions.locate(&account.puuid).await {
            Ok(region) => region,
            Err(err) if err.is_not_found() => {
                return Ok(Resolved::new(
                    RankReport::unranked(account, None),
                    cache.combine(CacheStatus::Miss),
                ));
            }
            Err(err) => return Err(err),
        };
        cache = cache.combine(region.cache);
        let region = region.value;

        let history = self.lists.get_history(&account.puuid, region).await?;
        cache = cache.combine(history.cache);

        let Some(latest) = history.value.iter().find(|m| m.is_competitive()) else {
            debug!(puuid = %account.puuid, "no competitive match in history");
            return Ok(Resolved::new(RankReport::unranked(account, Some(region)), cache));
        };

        let detail = self.details.get_match(&latest.match_id, region).await;
        cache = cache.combine(detail.cache);

        let entry = detail
            .value
            .as_deref()
            .and_then(|d| d.player(&account.puuid).cloned());
        let report = match entry {
            Some(entry) => RankReport {
                rank: entry.competitive_tier.map_or(UNRANKED, tier_name),
                tier: entry.competitive_tier,
                card: entry.card_id,
                rr: 0,
                region: Some(region),
                account,
            },
            None => RankReport::unranked(account, Some(region)),
        };

        Ok(Resolved::new(report, cache))
    }
}
