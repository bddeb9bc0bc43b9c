//! Riot ID to account resolution.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::cache::CacheStore;
use crate::error::{ApiError, Result};
use crate::resolver::Resolved;
use crate::upstream::{AccountRecord, RiotApi};

/// Cache key: Riot IDs are case-insensitive upstream.
type AccountKey = (String, String);

/// Resolves `name#tag` to a stable account record, cached per identity.
#[derive(Clone)]
pub struct AccountResolver {
    api: Arc<dyn RiotApi>,
    cache: CacheStore<AccountKey, AccountRecord>,
    ttl: Duration,
}

impl AccountResolver {
    pub fn new(api: Arc<dyn RiotApi>, ttl: Duration, max_entries: usize) -> Self {
        Self {
            api,
            cache: CacheStore::new("account", max_entries),
            ttl,
        }
    }

    pub fn cache(&self) -> &CacheStore<AccountKey, AccountRecord> {
        &self.cache
    }

    /// Looks up an account. `NotFound` if the identity does not exist upstream.
    pub async fn resolve(&self, name: &str, tag: &str) -> Result<Resolved<AccountRecord>> {
        let (name, tag) = (name.trim(), tag.trim());
        if name.is_empty() || tag.is_empty() {
            return Err(ApiError::InvalidRequest(
                "Name and tag must not be empty".to_string(),
            ));
        }

        let key = (name.to_lowercase(), tag.to_lowercase());
        let api = Arc::clone(&self.api);
        let (name, tag) = (name.to_string(), tag.to_string());

        let (account, cache) = self
            .cache
            .get_or_compute(key, self.ttl, move || async move {
                api.account_by_riot_id(&name, &tag).await
            })
            .await?;

        debug!(puuid = %account.puuid, cache = ?cache, "account resolved");
        Ok(Resolved::new(account, cache))
    }
}
