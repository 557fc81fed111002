//! Core traits and types for the caching system.

use chrono::{DateTime, Utc};

/// Source of "now" for expiry calculations.
///
/// The cache never calls `Utc::now()` directly so tests can move time
/// forward without sleeping.
pub trait Clock: Send + Sync {
  fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
  fn now(&self) -> DateTime<Utc> {
    Utc::now()
  }
}

/// Clock that only moves when told to.
#[cfg(test)]
#[derive(Debug)]
pub struct ManualClock {
  now: std::sync::Mutex<DateTime<Utc>>,
}

#[cfg(test)]
impl ManualClock {
  pub fn new(start: DateTime<Utc>) -> Self {
    Self {
      now: std::sync::Mutex::new(start),
    }
  }

  /// Move the clock forward by `by`.
  pub fn advance(&self, by: chrono::Duration) {
    if let Ok(mut now) = self.now.lock() {
      *now += by;
    }
  }
}

#[cfg(test)]
impl Default for ManualClock {
  fn default() -> Self {
    Self::new(DateTime::<Utc>::UNIX_EPOCH)
  }
}

#[cfg(test)]
impl Clock for ManualClock {
  fn now(&self) -> DateTime<Utc> {
    match self.now.lock() {
      Ok(now) => *now,
      Err(poisoned) => *poisoned.into_inner(),
    }
  }
}

/// Result from a cache operation, including data and metadata about the source.
#[derive(Debug, Clone)]
pub struct CacheResult<T> {
  /// The actual data
  pub data: T,
  /// Where the data came from
  pub source: CacheSource,
  /// When the data expires from the cache (None when it was never stored)
  pub expires_at: Option<DateTime<Utc>>,
}

impl<T> CacheResult<T> {
  /// Fresh data from the network that was not stored (ttl of zero).
  pub fn uncached(data: T) -> Self {
    Self {
      data,
      source: CacheSource::Network,
      expires_at: None,
    }
  }

  /// Fresh data from the network, now stored until `expires_at`.
  pub fn from_network(data: T, expires_at: DateTime<Utc>) -> Self {
    Self {
      data,
      source: CacheSource::Network,
      expires_at: Some(expires_at),
    }
  }

  /// Data served from a live cache entry.
  pub fn from_cache(data: T, expires_at: DateTime<Utc>) -> Self {
    Self {
      data,
      source: CacheSource::Cache,
      expires_at: Some(expires_at),
    }
  }
}

/// Indicates where cached data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheSource {
  /// Fresh data from network
  Network,
  /// Data from an unexpired cache entry
  Cache,
}
