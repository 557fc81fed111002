//! In-memory cache storage with expiry and capacity eviction.

use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::HashMap;

/// A single cached response.
#[derive(Debug, Clone)]
pub struct CachedEntry {
  pub value: Value,
  pub expires_at: DateTime<Utc>,
}

impl CachedEntry {
  pub fn is_live(&self, now: DateTime<Utc>) -> bool {
    self.expires_at > now
  }
}

/// Bounded map of cache key to entry.
///
/// Not synchronized; `CacheLayer` wraps it in a mutex.
#[derive(Debug)]
pub struct MemoryStorage {
  entries: HashMap<String, CachedEntry>,
  max_entries: usize,
}

impl MemoryStorage {
  pub fn new(max_entries: usize) -> Self {
    Self {
      entries: HashMap::new(),
      max_entries: max_entries.max(1),
    }
  }

  /// Get a live entry. Expired entries are removed on the way.
  pub fn get(&mut self, key: &str, now: DateTime<Utc>) -> Option<CachedEntry> {
    match self.entries.get(key) {
      Some(entry) if entry.is_live(now) => Some(entry.clone()),
      Some(_) => {
        self.entries.remove(key);
        None
      }
      None => None,
    }
  }

  /// Store an entry, evicting if at capacity.
  ///
  /// Eviction drops expired entries first, then the entry closest to expiry.
  pub fn insert(&mut self, key: String, entry: CachedEntry, now: DateTime<Utc>) {
    if !self.entries.contains_key(&key) && self.entries.len() >= self.max_entries {
      self.purge_expired(now);

      if self.entries.len() >= self.max_entries {
        let victim = self
          .entries
          .iter()
          .min_by_key(|(_, e)| e.expires_at)
          .map(|(k, _)| k.clone());
        if let Some(victim) = victim {
          self.entries.remove(&victim);
        }
      }
    }

    self.entries.insert(key, entry);
  }

  /// Remove every entry whose expiry has passed.
  pub fn purge_expired(&mut self, now: DateTime<Utc>) -> usize {
    let before = self.entries.len();
    self.entries.retain(|_, e| e.is_live(now));
    before - self.entries.len()
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::Duration;
  use serde_json::json;

  fn entry(value: Value, expires_at: DateTime<Utc>) -> CachedEntry {
    CachedEntry { value, expires_at }
  }

  #[test]
  fn test_get_returns_live_entry() {
    let now = DateTime::<Utc>::UNIX_EPOCH;
    let mut storage = MemoryStorage::new(4);
    storage.insert("a".into(), entry(json!(1), now + Duration::seconds(10)), now);

    let got = storage.get("a", now).map(|e| e.value);
    assert_eq!(got, Some(json!(1)));
  }

  #[test]
  fn test_get_drops_expired_entry() {
    let now = DateTime::<Utc>::UNIX_EPOCH;
    let mut storage = MemoryStorage::new(4);
    storage.insert("a".into(), entry(json!(1), now + Duration::seconds(10)), now);

    assert!(storage.get("a", now + Duration::seconds(10)).is_none());
    assert_eq!(storage.len(), 0);
  }

  #[test]
  fn test_insert_evicts_expired_before_live() {
    let now = DateTime::<Utc>::UNIX_EPOCH;
    let mut storage = MemoryStorage::new(2);
    storage.insert("old".into(), entry(json!(1), now + Duration::seconds(1)), now);
    storage.insert("live".into(), entry(json!(2), now + Duration::seconds(100)), now);

    let later = now + Duration::seconds(5);
    storage.insert("new".into(), entry(json!(3), later + Duration::seconds(1)), later);

    assert_eq!(storage.len(), 2);
    assert!(storage.get("live", later).is_some());
    assert!(storage.get("new", later).is_some());
  }

  #[test]
  fn test_insert_evicts_soonest_expiry_when_all_live() {
    let now = DateTime::<Utc>::UNIX_EPOCH;
    let mut storage = MemoryStorage::new(2);
    storage.insert("soon".into(), entry(json!(1), now + Duration::seconds(10)), now);
    storage.insert("late".into(), entry(json!(2), now + Duration::seconds(100)), now);
    storage.insert("new".into(), entry(json!(3), now + Duration::seconds(50)), now);

    assert!(storage.get("soon", now).is_none());
    assert!(storage.get("late", now).is_some());
    assert!(storage.get("new", now).is_some());
  }

  #[test]
  fn test_replacing_existing_key_does_not_evict() {
    let now = DateTime::<Utc>::UNIX_EPOCH;
    let mut storage = MemoryStorage::new(2);
    storage.insert("a".into(), entry(json!(1), now + Duration::seconds(10)), now);
    storage.insert("b".into(), entry(json!(2), now + Duration::seconds(10)), now);
    storage.insert("a".into(), entry(json!(3), now + Duration::seconds(20)), now);

    assert_eq!(storage.len(), 2);
    assert_eq!(storage.get("a", now).map(|e| e.value), Some(json!(3)));
  }
}
