//! Generic caching layer for API responses.
//!
//! This module provides a backend-agnostic cache-aside mechanism that:
//! - Keys every response by a deterministic string derived from the request
//! - Serves hits without touching the network
//! - Writes fetched responses back on a miss
//! - Treats cache failures as misses instead of errors

mod layer;
mod storage;
mod traits;

pub use layer::CacheLayer;
pub use storage::{MemoryStorage, SqliteStorage};
pub use traits::{CachePort, CacheResult, CacheSource, CachedEntry, QueryKey};

#[cfg(test)]
pub use traits::MockCachePort;
