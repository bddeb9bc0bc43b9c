//! Data-locality regions of the upstream match service.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// A shard of the upstream match service. A player's history lives in exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    Eu,
    Na,
    Ap,
    Kr,
}

impl Region {
    /// Probe order. When several regions report history, the earliest one here wins.
    pub const CANDIDATES: [Region; 4] = [Region::Eu, Region::Na, Region::Ap, Region::Kr];

    pub fn as_str(self) -> &'static str {
        match self {
            Region::Eu => "eu",
            Region::Na => "na",
            Region::Ap => "ap",
            Region::Kr => "kr",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Region {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Region::CANDIDATES
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ApiError::InvalidRequest(format!("Unknown region: {s}")))
    }
}
