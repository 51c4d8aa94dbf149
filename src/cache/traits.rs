//! Core traits and types for the caching system.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::error::Result;

/// A cached response together with the time it was written.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedEntry {
  pub value: Value,
  pub cached_at: DateTime<Utc>,
}

impl CachedEntry {
  pub fn new(value: Value) -> Self {
    Self {
      value,
      cached_at: Utc::now(),
    }
  }
}

/// Capability interface over a key/value cache backend.
///
/// Entries never expire on their own; they live until [`CachePort::flush`]
/// empties the whole backend. Implementations must be shareable across
/// sessions, and concurrent writers to one key may resolve last-write-wins.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CachePort: Send + Sync {
  /// Look up a key. `Ok(None)` is a miss.
  async fn get(&self, key: &str) -> Result<Option<CachedEntry>>;

  /// Store a value, replacing whatever was there.
  async fn set(&self, key: &str, value: &Value) -> Result<()>;

  /// Remove every entry.
  async fn flush(&self) -> Result<()>;
}

/// Trait for request identities that can be used as cache keys.
pub trait QueryKey {
  /// Deterministic key: equal requests give equal keys, different
  /// identifying values give different keys.
  fn cache_key(&self) -> String;

  /// Human readable description, used in logs.
  fn description(&self) -> String;
}

/// A resolved value tagged with where it came from.
#[derive(Debug, Clone)]
pub struct CacheResult<T> {
  pub data: T,
  pub source: CacheSource,
  /// Set only for cache hits
  pub cached_at: Option<DateTime<Utc>>,
}

impl<T> CacheResult<T> {
  pub fn from_network(data: T) -> Self {
    Self {
      data,
      source: CacheSource::Network,
      cached_at: None,
    }
  }

  pub fn from_cache(data: T, cached_at: DateTime<Utc>) -> Self {
    Self {
      data,
      source: CacheSource::Cache,
      cached_at: Some(cached_at),
    }
  }
}

/// Indicates where returned data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheSource {
  Network,
  /// Data served from the cache without a network call
  Cache,
}
