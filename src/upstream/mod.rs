//! Upstream Module
//!
//! Client, wire formats and region set of the geographically partitioned
//! match-history service.

mod client;
pub mod models;
mod region;

#[cfg(test)]
pub(crate) mod fake;

pub use client::{HttpRiotClient, RiotApi};
pub use models::{
    AccountRecord, MatchDetail, MatchHistory, MatchSummary, PlayerEntry, PlayerStats, TeamResult,
    COMPETITIVE_QUEUE,
};
pub use region::Region;
