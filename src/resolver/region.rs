//! Region discovery by concurrent fan-out probing.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::cache::CacheStore;
use crate::error::{ApiError, Result};
use crate::resolver::{MatchListFetcher, Resolved};
use crate::upstream::{Region, RiotApi};

/// Finds which region holds a player's match history.
///
/// The mapping is cached for a long TTL. Misses are not cached, so a player
/// with no history yet is probed again on every call.
#[derive(Clone)]
pub struct RegionLocator {
    api: Arc<dyn RiotApi>,
    cache: CacheStore<String, Region>,
    lists: MatchListFetcher,
    ttl: Duration,
}

impl RegionLocator {
    pub fn new(
        api: Arc<dyn RiotApi>,
        lists: MatchListFetcher,
        ttl: Duration,
        max_entries: usize,
    ) -> Self {
        Self {
            api,
            cache: CacheStore::new("region", max_entries),
            lists,
            ttl,
        }
    }

    pub fn cache(&self) -> &CacheStore<String, Region> {
        &self.cache
    }

    /// Resolves the region for `puuid`, probing every candidate on a miss.
    pub async fn locate(&self, puuid: &str) -> Result<Resolved<Region>> {
        let api = Arc::clone(&self.api);
        let lists = self.lists.clone();
        let owned = puuid.to_string();

        let (region, cache) = self
            .cache
            .get_or_compute(puuid.to_string(), self.ttl, move || {
                probe(api, lists, owned)
            })
            .await?;

        Ok(Resolved::new(region, cache))
    }
}

/// Queries every candidate region at once.
///
/// The winner is the earliest candidate whose history is non-empty, whatever
/// order the responses arrive in. Its history seeds the match-list cache.
async fn probe(api: Arc<dyn RiotApi>, lists: MatchListFetcher, puuid: String) -> Result<Region> {
    let probes = Region::CANDIDATES.map(|region| {
        let api = Arc::clone(&api);
        let puuid = puuid.as_str();
        async move { (region, api.match_list(puuid, region).await) }
    });

    // join_all yields results in candidate order
    let results = join_all(probes).await;

    let mut first_error = None;
    let mut errors = 0;
    for (region, result) in results {
        match result {
            Ok(history) if !history.is_empty() => {
                info!(puuid = %puuid, %region, matches = history.len(), "region resolved");
                lists.seed(&puuid, region, Arc::new(history)).await;
                return Ok(region);
            }
            Ok(_) => debug!(puuid = %puuid, %region, "empty history in region"),
            Err(err) if err.is_not_found() => {
                debug!(puuid = %puuid, %region, "no history in region");
            }
            Err(err) => {
                warn!(puuid = %puuid, %region, error = %err, "region probe failed");
                errors += 1;
                first_error.get_or_insert(err);
            }
        }
    }

    match first_error {
        // Every probe failed outright: report the failure rather than "no history"
        Some(err) if errors == Region::CANDIDATES.len() => Err(err),
        _ => Err(ApiError::NotFound("No match history found".to_string())),
    }
}
