//! Request and Response models for the resolver API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::MatchQuery;
pub use responses::{
    rank_text, AccountResponse, CacheStatsResponse, HealthResponse, MatchResponse,
    MatchesResponse, MmrResponse, StatsResponse,
};
