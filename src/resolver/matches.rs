//! Cached match-list and match-detail lookups.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::cache::{CacheStatus, CacheStore};
use crate::error::{ApiError, Result};
use crate::resolver::Resolved;
use crate::upstream::{MatchDetail, MatchHistory, Region, RiotApi};

// == Match List Fetcher ==
/// `(puuid, region)` to match history, medium TTL.
#[derive(Clone)]
pub struct MatchListFetcher {
    api: Arc<dyn RiotApi>,
    cache: CacheStore<(String, Region), MatchHistory>,
    ttl: Duration,
}

impl MatchListFetcher {
    pub fn new(api: Arc<dyn RiotApi>, ttl: Duration, max_entries: usize) -> Self {
        Self {
            api,
            cache: CacheStore::new("match_list", max_entries),
            ttl,
        }
    }

    pub fn cache(&self) -> &CacheStore<(String, Region), MatchHistory> {
        &self.cache
    }

    pub async fn get_history(&self, puuid: &str, region: Region) -> Result<Resolved<MatchHistory>> {
        let api = Arc::clone(&self.api);
        let owned = puuid.to_string();

        let (history, cache) = self
            .cache
            .get_or_compute((puuid.to_string(), region), self.ttl, move || async move {
                api.match_list(&owned, region).await.map(Arc::new)
            })
            .await?;

        Ok(Resolved::new(history, cache))
    }

    /// Stores a history obtained elsewhere (region probing) so it is not fetched twice.
    pub async fn seed(&self, puuid: &str, region: Region, history: MatchHistory) {
        self.cache
            .insert((puuid.to_string(), region), history, self.ttl)
            .await;
    }
}

// == Match Detail Fetcher ==
/// Match id to full match record. Finished matches never change, so the TTL is long.
///
/// Entries remember the region that served them; a later lookup naming another
/// region is answered from the cache with the original region.
#[derive(Clone)]
pub struct MatchDetailFetcher {
    api: Arc<dyn RiotApi>,
    cache: CacheStore<String, SourcedMatch>,
    ttl: Duration,
}

/// A match record and the region it was fetched from.
pub type SourcedMatch = (Region, Arc<MatchDetail>);

impl MatchDetailFetcher {
    pub fn new(api: Arc<dyn RiotApi>, ttl: Duration, max_entries: usize) -> Self {
        Self {
            api,
            cache: CacheStore::new("match_detail", max_entries),
            ttl,
        }
    }

    pub fn cache(&self) -> &CacheStore<String, SourcedMatch> {
        &self.cache
    }

    /// Fetches a match, surfacing the failure.
    pub async fn try_get_match(
        &self,
        match_id: &str,
        region: Region,
    ) -> Result<Resolved<SourcedMatch>> {
        let api = Arc::clone(&self.api);
        let owned = match_id.to_string();

        let (sourced, cache) = self
            .cache
            .get_or_compute(match_id.to_string(), self.ttl, move || async move {
                let detail = api.match_detail(&owned, region).await?;
                Ok((region, Arc::new(detail)))
            })
            .await?;

        Ok(Resolved::new(sourced, cache))
    }

    /// Fetches a match for batch aggregation; a failure becomes `None`.
    pub async fn get_match(&self, match_id: &str, region: Region) -> Resolved<Option<Arc<MatchDetail>>> {
        match self.try_get_match(match_id, region).await {
            Ok(resolved) => resolved.map(|(_, detail)| Some(detail)),
            Err(err) => {
                warn!(match_id, %region, error = %err, "match detail unavailable, skipping");
                Resolved::new(None, CacheStatus::Miss)
            }
        }
    }

    /// Finds a match in `region`, or in each candidate region in order when none is given.
    pub async fn find_match(
        &self,
        match_id: &str,
        region: Option<Region>,
    ) -> Result<Resolved<SourcedMatch>> {
        if let Some(region) = region {
            return self.try_get_match(match_id, region).await;
        }

        let mut last_error = None;
        for region in Region::CANDIDATES {
            match self.try_get_match(match_id, region).await {
                Ok(resolved) => return Ok(resolved),
                Err(err) if err.is_not_found() => debug!(match_id, %region, "match not in region"),
                Err(err) => {
                    warn!(match_id, %region, error = %err, "match lookup failed");
                    last_error = Some(err);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| ApiError::NotFound("Match not found".to_string())))
    }
}
