//! Time-to-live cache for API responses.
//!
//! This module knows nothing about Jira:
//! - Entries are JSON values keyed by an opaque string
//! - Expiry is computed from a per-call TTL and an injected `Clock`
//! - A TTL of zero bypasses the cache entirely
//! - Capacity is bounded; expired entries are evicted first

mod layer;
mod storage;
mod traits;

pub use layer::{CacheLayer, CacheStats, DEFAULT_MAX_ENTRIES};
pub use traits::CacheResult;
#[cfg(test)]
pub use traits::{CacheSource, ManualClock};
