//! Request DTOs for the resolver API
//!
//! Defines the structure of incoming query strings.

use serde::Deserialize;

use crate::error::Result;
use crate::upstream::Region;

/// Query string for `GET /api/match/:id`
///
/// # Fields
/// - `region`: Optional region to look in; every candidate region is tried when absent
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MatchQuery {
    #[serde(default)]
    pub region: Option<String>,
}

impl MatchQuery {
    /// Parses the region, treating an empty value as absent.
    pub fn region(&self) -> Result<Option<Region>> {
        match self.region.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(region) => region.parse().map(Some),
        }
    }
}
