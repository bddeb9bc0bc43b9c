//! Resolver Module
//!
//! Turns a Riot ID into account, region, match history, statistics and rank,
//! each layer backed by its own cache.
//!
//! # Flow
//! identity → account → region → match list → {stats | rank} → match details

mod account;
mod matches;
mod rank;
mod region;
mod stats;

use std::sync::Arc;

use serde::Serialize;

use crate::cache::{CacheStats, CacheStatus};
use crate::config::CacheTtls;
use crate::error::Result;
use crate::upstream::{AccountRecord, MatchDetail, MatchHistory, Region, RiotApi};

pub use account::AccountResolver;
pub use matches::{MatchDetailFetcher, MatchListFetcher, SourcedMatch};
pub use rank::{tier_name, RankReport, RankResolver, UNRANKED};
pub use region::RegionLocator;
pub use stats::{StatTotals, StatsAggregator, StatsReport, STATS_BATCH_SIZE};

// == Resolved ==
/// A resolver result together with how the caches served it.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved<T> {
    pub value: T,
    pub cache: CacheStatus,
}

impl<T> Resolved<T> {
    pub fn new(value: T, cache: CacheStatus) -> Self {
        Self { value, cache }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Resolved<U> {
        Resolved {
            value: f(self.value),
            cache: self.cache,
        }
    }
}

/// Statistics of every resolver cache.
#[derive(Debug, Clone, Serialize)]
pub struct ResolverCacheStats {
    pub account: CacheStats,
    pub region: CacheStats,
    pub match_list: CacheStats,
    pub match_detail: CacheStats,
}

// == Resolver ==
/// Lifecycle-owned entry point holding the upstream client and all caches.
///
/// Cheap to clone; clones share caches.
#[derive(Clone)]
pub struct Resolver {
    accounts: AccountResolver,
    regions: RegionLocator,
    lists: MatchListFetcher,
    details: MatchDetailFetcher,
    stats: StatsAggregator,
    ranks: RankResolver,
}

impl Resolver {
    /// Wires the components around a shared upstream client.
    ///
    /// `max_entries` bounds each cache independently.
    pub fn new(api: Arc<dyn RiotApi>, ttls: CacheTtls, max_entries: usize) -> Self {
        let accounts = AccountResolver::new(Arc::clone(&api), ttls.account, max_entries);
        let lists = MatchListFetcher::new(Arc::clone(&api), ttls.match_list, max_entries);
        let regions = RegionLocator::new(Arc::clone(&api), lists.clone(), ttls.region, max_entries);
        let details = MatchDetailFetcher::new(api, ttls.match_detail, max_entries);

        let stats = StatsAggregator::new(
            accounts.clone(),
            regions.clone(),
            lists.clone(),
            details.clone(),
        );
        let ranks = RankResolver::new(
            accounts.clone(),
            regions.clone(),
            lists.clone(),
            details.clone(),
        );

        Self {
            accounts,
            regions,
            lists,
            details,
            stats,
            ranks,
        }
    }

    pub async fn resolve_account(&self, name: &str, tag: &str) -> Result<Resolved<AccountRecord>> {
        self.accounts.resolve(name, tag).await
    }

    pub async fn resolve_region(&self, puuid: &str) -> Result<Resolved<Region>> {
        self.regions.locate(puuid).await
    }

    pub async fn get_match_list(&self, puuid: &str, region: Region) -> Result<Resolved<MatchHistory>> {
        self.lists.get_history(puuid, region).await
    }

    /// Match detail for aggregation callers; failures come back as `None`.
    pub async fn get_match_detail(
        &self,
        match_id: &str,
        region: Region,
    ) -> Resolved<Option<Arc<MatchDetail>>> {
        self.details.get_match(match_id, region).await
    }

    /// Match detail with the failure surfaced, searching every region when none is given.
    ///
    /// The region returned is the one that served the match, which can differ
    /// from `region` when the match was already cached.
    pub async fn find_match(
        &self,
        match_id: &str,
        region: Option<Region>,
    ) -> Result<Resolved<SourcedMatch>> {
        self.details.find_match(match_id, region).await
    }

    pub async fn compute_stats(&self, name: &str, tag: &str) -> Result<Resolved<StatsReport>> {
        self.stats.compute_stats(name, tag).await
    }

    pub async fn compute_rank(&self, name: &str, tag: &str) -> Result<Resolved<RankReport>> {
        self.ranks.compute_rank(name, tag).await
    }

    /// Account, region and current history in one go.
    ///
    /// `NotFound` when no region has history for the player.
    pub async fn resolve_history(
        &self,
        name: &str,
        tag: &str,
    ) -> Result<Resolved<(AccountRecord, Region, MatchHistory)>> {
        let account = self.resolve_account(name, tag).await?;
        let region = self.resolve_region(&account.value.puuid).await?;
        let history = self
            .get_match_list(&account.value.puuid, region.value)
            .await?;

        let cache = account.cache.combine(region.cache).combine(history.cache);
        Ok(Resolved::new(
            (account.value, region.value, history.value),
            cache,
        ))
    }

    pub async fn cache_stats(&self) -> ResolverCacheStats {
        ResolverCacheStats {
            account: self.accounts.cache().stats().await,
            region: self.regions.cache().stats().await,
            match_list: self.lists.cache().stats().await,
            match_detail: self.details.cache().stats().await,
        }
    }

    /// Drops expired entries from every cache, returning how many were removed.
    pub async fn sweep_expired(&self) -> usize {
        self.accounts.cache().cleanup_expired().await
            + self.regions.cache().cleanup_expired().await
            + self.lists.cache().cleanup_expired().await
            + self.details.cache().cleanup_expired().await
    }
}
