//! Configuration Module
//!
//! Handles loading and managing service configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Upstream API credential; requests fail with a configuration error when absent
    pub api_key: Option<String>,
    /// HTTP server port
    pub server_port: u16,
    /// Upstream scheme, `https` in production
    pub upstream_scheme: String,
    /// Upstream base domain; hosts are `{region}.{domain}`
    pub upstream_domain: String,
    /// Routing cluster used for account lookups
    pub account_routing: String,
    /// Per-request upstream timeout in seconds
    pub upstream_timeout: u64,
    /// Maximum number of entries per cache
    pub max_entries: usize,
    /// Background cleanup task interval in seconds
    pub cleanup_interval: u64,
    /// Account cache TTL in seconds
    pub account_ttl: u64,
    /// Region cache TTL in seconds
    pub region_ttl: u64,
    /// Match list cache TTL in seconds
    pub match_list_ttl: u64,
    /// Match detail cache TTL in seconds
    pub match_ttl: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `RIOT_API_KEY` - Upstream credential (default: unset)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `UPSTREAM_SCHEME` - Upstream scheme (default: https)
    /// - `UPSTREAM_DOMAIN` - Upstream base domain (default: api.riotgames.com)
    /// - `ACCOUNT_ROUTING` - Account routing cluster (default: europe)
    /// - `UPSTREAM_TIMEOUT_SECS` - Upstream request timeout (default: 10)
    /// - `MAX_ENTRIES` - Maximum entries per cache (default: 10000)
    /// - `CLEANUP_INTERVAL` - Cleanup frequency in seconds (default: 60)
    /// - `ACCOUNT_TTL` / `REGION_TTL` / `MATCH_LIST_TTL` / `MATCH_TTL` - cache TTLs in seconds
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_key: env::var("RIOT_API_KEY").ok().filter(|k| !k.trim().is_empty()),
            server_port: parse_var("SERVER_PORT", defaults.server_port),
            upstream_scheme: env::var("UPSTREAM_SCHEME").unwrap_or(defaults.upstream_scheme),
            upstream_domain: env::var("UPSTREAM_DOMAIN").unwrap_or(defaults.upstream_domain),
            account_routing: env::var("ACCOUNT_ROUTING").unwrap_or(defaults.account_routing),
            upstream_timeout: parse_var("UPSTREAM_TIMEOUT_SECS", defaults.upstream_timeout),
            max_entries: parse_var("MAX_ENTRIES", defaults.max_entries),
            cleanup_interval: parse_var("CLEANUP_INTERVAL", defaults.cleanup_interval),
            account_ttl: parse_var("ACCOUNT_TTL", defaults.account_ttl),
            region_ttl: parse_var("REGION_TTL", defaults.region_ttl),
            match_list_ttl: parse_var("MATCH_LIST_TTL", defaults.match_list_ttl),
            match_ttl: parse_var("MATCH_TTL", defaults.match_ttl),
        }
    }

    /// Cache TTLs as durations.
    pub fn ttls(&self) -> CacheTtls {
        CacheTtls {
            account: Duration::from_secs(self.account_ttl),
            region: Duration::from_secs(self.region_ttl),
            match_list: Duration::from_secs(self.match_list_ttl),
            match_detail: Duration::from_secs(self.match_ttl),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            server_port: 3000,
            upstream_scheme: "https".to_string(),
            upstream_domain: "api.riotgames.com".to_string(),
            account_routing: "europe".to_string(),
            upstream_timeout: 10,
            max_entries: 10_000,
            cleanup_interval: 60,
            account_ttl: 5 * 60,
            region_ttl: 24 * 60 * 60,
            match_list_ttl: 60 * 60,
            match_ttl: 60 * 60,
        }
    }
}

/// Time-to-live applied to each resolver cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheTtls {
    pub account: Duration,
    pub region: Duration,
    pub match_list: Duration,
    pub match_detail: Duration,
}

impl Default for CacheTtls {
    fn default() -> Self {
        Config::default().ttls()
    }
}

fn parse_var<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
