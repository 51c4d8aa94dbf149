//! Cache layer that orchestrates caching logic with network fetching.

use serde_json::Value;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::traits::{CachePort, CacheResult, QueryKey};
use crate::error::Result;

/// Cache layer that manages caching logic and network fetching.
///
/// This layer sits between a query session and the network client,
/// providing read-through caching over any [`CachePort`] backend.
pub struct CacheLayer {
  storage: Arc<dyn CachePort>,
}

impl CacheLayer {
  /// Create a new cache layer with the given storage backend.
  pub fn new(storage: Arc<dyn CachePort>) -> Self {
    Self { storage }
  }

  /// The backend this layer reads and writes.
  pub fn storage(&self) -> &Arc<dyn CachePort> {
    &self.storage
  }

  /// Fetch a single response with cache-aside semantics.
  ///
  /// 1. Look the key up - a hit is returned as-is, with no fetch and no write
  /// 2. On a miss, run the fetcher exactly once
  /// 3. On success, write the result back before returning it
  ///
  /// A failed read counts as a miss and a failed write is only logged; neither
  /// can turn a successful fetch into an error. Fetch errors pass through
  /// untouched and nothing is written.
  pub async fn fetch_one<K, F, Fut>(&self, key: &K, fetcher: F) -> Result<CacheResult<Value>>
  where
    K: QueryKey + ?Sized,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Value>>,
  {
    let cache_key = key.cache_key();

    match self.storage.get(&cache_key).await {
      Ok(Some(entry)) => {
        debug!(key = %cache_key, "cache hit for {}", key.description());
        return Ok(CacheResult::from_cache(entry.value, entry.cached_at));
      }
      Ok(None) => debug!(key = %cache_key, "cache miss for {}", key.description()),
      Err(e) => warn!(key = %cache_key, error = %e, "cache read failed, fetching instead"),
    }

    let data = fetcher().await?;

    match self.storage.set(&cache_key, &data).await {
      Ok(()) => debug!(key = %cache_key, "stored response in cache"),
      Err(e) => warn!(key = %cache_key, error = %e, "cache write failed, returning fetched data"),
    }

    Ok(CacheResult::from_network(data))
  }

  /// Remove every cached entry from the backend.
  pub async fn flush(&self) -> Result<()> {
    self.storage.flush().await?;
    info!("cache flushed");
    Ok(())
  }
}

impl Clone for CacheLayer {
  fn clone(&self) -> Self {
    Self {
      storage: Arc::clone(&self.storage),
    }
  }
}

impl fmt::Debug for CacheLayer {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("CacheLayer").finish_non_exhaustive()
  }
}
