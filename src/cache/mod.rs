//! Cache Module
//!
//! Provides in-memory caching with TTL expiration, LRU-bounded capacity and
//! per-key request coalescing.

mod entry;
mod lru;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use lru::LruTracker;
pub use stats::CacheStats;
pub use store::{CacheStatus, CacheStore};
