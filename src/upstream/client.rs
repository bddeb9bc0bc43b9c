//! Upstream API client
//!
//! `RiotApi` is the seam between the resolvers and the network; the HTTP
//! implementation lives here, tests substitute in-process fakes.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{ApiError, Result};
use crate::upstream::models::{
    AccountDto, AccountRecord, MatchDetail, MatchDto, MatchListDto, MatchSummary,
};
use crate::upstream::Region;

const TOKEN_HEADER: &str = "X-Riot-Token";

/// Operations the resolvers need from the upstream match-history service.
#[async_trait]
pub trait RiotApi: Send + Sync {
    /// Looks up an account by Riot ID. `NotFound` when the identity does not exist.
    async fn account_by_riot_id(&self, name: &str, tag: &str) -> Result<AccountRecord>;

    /// Match history for a player in one region, most recent first.
    async fn match_list(&self, puuid: &str, region: Region) -> Result<Vec<MatchSummary>>;

    /// Full record of one match.
    async fn match_detail(&self, match_id: &str, region: Region) -> Result<MatchDetail>;
}

// == HTTP Client ==
/// reqwest-backed client with a fixed per-request timeout.
#[derive(Debug, Clone)]
pub struct HttpRiotClient {
    client: Client,
    api_key: Option<String>,
    scheme: String,
    domain: String,
    account_routing: String,
}

impl HttpRiotClient {
    /// Builds a client from configuration.
    ///
    /// A missing API key is not an error here; every request reports it instead.
    pub fn new(config: &Config) -> Result<Self> {
        let timeout = Duration::from_secs(config.upstream_timeout.max(1));
        let client = ClientBuilder::new()
            .connect_timeout(timeout.min(Duration::from_secs(5)))
            .timeout(timeout)
            .pool_idle_timeout(Duration::from_secs(30))
            .user_agent(concat!("rengar/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::Configuration(format!("HTTP client build failed: {e}")))?;

        if config.api_key.is_none() {
            warn!("RIOT_API_KEY is not set; upstream requests will fail");
        }

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            scheme: config.upstream_scheme.clone(),
            domain: config.upstream_domain.clone(),
            account_routing: config.account_routing.clone(),
        })
    }

    /// Builds `{scheme}://{host}.{domain}/{segments...}`, percent-encoding each segment.
    fn url(&self, host: &str, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&format!("{}://{}.{}", self.scheme, host, self.domain))
            .map_err(|e| ApiError::Configuration(format!("invalid upstream url: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| ApiError::Configuration("upstream url cannot be a base".to_string()))?
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url, what: &str) -> Result<T> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| ApiError::Configuration("API key not configured".to_string()))?;

        debug!(%url, "upstream request");
        let response = self
            .client
            .get(url)
            .header(TOKEN_HEADER, api_key)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(what.to_string()));
        }
        if !status.is_success() {
            return Err(ApiError::Upstream(format!("{what}: upstream returned {status}")));
        }

        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl RiotApi for HttpRiotClient {
    async fn account_by_riot_id(&self, name: &str, tag: &str) -> Result<AccountRecord> {
        let url = self.url(
            &self.account_routing,
            &["riot", "account", "v1", "accounts", "by-riot-id", name, tag],
        )?;
        let dto: AccountDto = self.get_json(url, "Player not found").await?;
        AccountRecord::try_from(dto)
    }

    async fn match_list(&self, puuid: &str, region: Region) -> Result<Vec<MatchSummary>> {
        let url = self.url(
            region.as_str(),
            &["val", "match", "v1", "matchlists", "by-puuid", puuid],
        )?;
        let dto: MatchListDto = self.get_json(url, "Match history not found").await?;
        Ok(dto.into())
    }

    async fn match_detail(&self, match_id: &str, region: Region) -> Result<MatchDetail> {
        let url = self.url(region.as_str(), &["val", "match", "v1", "matches", match_id])?;
        let dto: MatchDto = self.get_json(url, "Match not found").await?;
        Ok(dto.into_detail(match_id))
    }
}
