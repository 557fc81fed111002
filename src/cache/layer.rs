//! Cache layer that wraps network fetches with a time-to-live.

use chrono::{DateTime, Utc};
use serde_json::Value;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tracing::debug;

use super::storage::{CachedEntry, MemoryStorage};
use super::traits::{CacheResult, Clock, SystemClock};

/// Default number of responses kept before eviction kicks in.
pub const DEFAULT_MAX_ENTRIES: usize = 256;

/// Hit/miss counters, mostly for logging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
  pub hits: u64,
  pub misses: u64,
  pub entries: usize,
}

/// TTL cache in front of a fetcher.
///
/// Cheap to clone; clones share the same entries. The storage lock is never
/// held while a fetch is in flight.
pub struct CacheLayer {
  storage: Arc<Mutex<MemoryStorage>>,
  clock: Arc<dyn Clock>,
  hits: Arc<AtomicU64>,
  misses: Arc<AtomicU64>,
}

impl CacheLayer {
  /// Create a cache on the wall clock.
  pub fn new(max_entries: usize) -> Self {
    Self::with_clock(max_entries, Arc::new(SystemClock))
  }

  /// Create a cache on a caller-supplied clock.
  pub fn with_clock(max_entries: usize, clock: Arc<dyn Clock>) -> Self {
    Self {
      storage: Arc::new(Mutex::new(MemoryStorage::new(max_entries))),
      clock,
      hits: Arc::new(AtomicU64::new(0)),
      misses: Arc::new(AtomicU64::new(0)),
    }
  }

  fn storage(&self) -> MutexGuard<'_, MemoryStorage> {
    // A panic mid-insert leaves the map consistent, so recover the guard.
    match self.storage.lock() {
      Ok(guard) => guard,
      Err(poisoned) => poisoned.into_inner(),
    }
  }

  fn expiry(&self, now: DateTime<Utc>, ttl: Duration) -> DateTime<Utc> {
    chrono::Duration::from_std(ttl)
      .ok()
      .and_then(|ttl| now.checked_add_signed(ttl))
      .unwrap_or(DateTime::<Utc>::MAX_UTC)
  }

  /// Return the cached value for `key`, or run `fetcher` and cache its result.
  ///
  /// 1. `ttl` of zero skips the cache entirely and always fetches
  /// 2. A live entry is returned without calling the fetcher
  /// 3. Otherwise the fetcher runs; only successful results are stored
  pub async fn get_or_fetch<E, F, Fut>(
    &self,
    key: &str,
    ttl: Duration,
    fetcher: F,
  ) -> Result<CacheResult<Value>, E>
  where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Value, E>>,
  {
    if ttl.is_zero() {
      let data = fetcher().await?;
      return Ok(CacheResult::uncached(data));
    }

    let now = self.clock.now();
    let cached = self.storage().get(key, now);
    if let Some(entry) = cached {
      self.hits.fetch_add(1, Ordering::Relaxed);
      debug!(key, "cache hit");
      return Ok(CacheResult::from_cache(entry.value, entry.expires_at));
    }

    self.misses.fetch_add(1, Ordering::Relaxed);
    debug!(key, "cache miss");

    let data = fetcher().await?;

    // Expiry counts from when the response arrived.
    let now = self.clock.now();
    let expires_at = self.expiry(now, ttl);
    self.storage().insert(
      key.to_string(),
      CachedEntry {
        value: data.clone(),
        expires_at,
      },
      now,
    );

    Ok(CacheResult::from_network(data, expires_at))
  }

  pub fn stats(&self) -> CacheStats {
    CacheStats {
      hits: self.hits.load(Ordering::Relaxed),
      misses: self.misses.load(Ordering::Relaxed),
      entries: self.storage().len(),
    }
  }
}

impl Default for CacheLayer {
  fn default() -> Self {
    Self::new(DEFAULT_MAX_ENTRIES)
  }
}

impl Clone for CacheLayer {
  fn clone(&self) -> Self {
    Self {
      storage: Arc::clone(&self.storage),
      clock: Arc::clone(&self.clock),
      hits: Arc::clone(&self.hits),
      misses: Arc::clone(&self.misses),
    }
  }
}
