//! Cache storage backends: in-memory and SQLite.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::RwLock;

use super::traits::{CachePort, CachedEntry};
use crate::error::{Error, Result};

/// Process-local cache backend.
///
/// Clones of the owning `Arc` share one map, so a single instance can serve
/// any number of sessions.
#[derive(Default)]
pub struct MemoryStorage {
  entries: RwLock<HashMap<String, CachedEntry>>,
}

impl MemoryStorage {
  pub fn new() -> Self {
    Self::default()
  }

  /// Number of cached entries.
  pub async fn len(&self) -> usize {
    self.entries.read().await.len()
  }

  /// Check if the cache is empty.
  pub async fn is_empty(&self) -> bool {
    self.entries.read().await.is_empty()
  }
}

#[async_trait]
impl CachePort for MemoryStorage {
  async fn get(&self, key: &str) -> Result<Option<CachedEntry>> {
    Ok(self.entries.read().await.get(key).cloned())
  }

  async fn set(&self, key: &str, value: &Value) -> Result<()> {
    self
      .entries
      .write()
      .await
      .insert(key.to_string(), CachedEntry::new(value.clone()));
    Ok(())
  }

  async fn flush(&self) -> Result<()> {
    self.entries.write().await.clear();
    Ok(())
  }
}

/// SQLite-based cache storage implementation.
///
/// rusqlite is synchronous, so every query runs on tokio's blocking pool and
/// never stalls an async worker thread.
pub struct SqliteStorage {
  conn: Arc<Mutex<Connection>>,
}

impl SqliteStorage {
  /// Open the cache database at the default location.
  pub fn open() -> Result<Self> {
    let path = Self::default_path()?;
    Self::open_at(&path)
  }

  /// Open (or create) the cache database at `path`.
  pub fn open_at(path: &Path) -> Result<Self> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).map_err(|e| {
        Error::cache(
          "open",
          format!("failed to create cache directory {}: {}", parent.display(), e),
        )
      })?;
    }

    let conn = Connection::open(path).map_err(|e| {
      Error::cache(
        "open",
        format!("failed to open cache database at {}: {}", path.display(), e),
      )
    })?;

    Self::with_connection(conn)
  }

  /// Open a private in-memory database. Nothing survives the process.
  pub fn open_in_memory() -> Result<Self> {
    let conn = Connection::open_in_memory()
      .map_err(|e| Error::cache("open", format!("failed to open in-memory database: {}", e)))?;
    Self::with_connection(conn)
  }

  fn with_connection(conn: Connection) -> Result<Self> {
    let storage = Self {
      conn: Arc::new(Mutex::new(conn)),
    };
    storage.run_migrations()?;
    Ok(storage)
  }

  /// Get the default database path.
  pub fn default_path() -> Result<PathBuf> {
    let data_dir = dirs::data_dir()
      .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
      .ok_or_else(|| Error::configuration("Could not determine data directory"))?;

    Ok(data_dir.join("tftq").join("cache.db"))
  }

  /// Run database migrations for cache tables.
  fn run_migrations(&self) -> Result<()> {
    let conn = self.lock()?;

    conn
      .execute_batch(CACHE_SCHEMA)
      .map_err(|e| Error::cache("migrate", e))?;

    Ok(())
  }

  fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
    lock_conn(&self.conn)
  }

  /// Run `f` against the connection on the blocking pool.
  async fn with_conn<T, F>(&self, operation: &'static str, f: F) -> Result<T>
  where
    F: FnOnce(&Connection) -> Result<T> + Send + 'static,
    T: Send + 'static,
  {
    let conn = Arc::clone(&self.conn);
    tokio::task::spawn_blocking(move || {
      let conn = lock_conn(&conn)?;
      f(&conn)
    })
    .await
    .map_err(|e| Error::cache(operation, format!("database task failed: {}", e)))?
  }
}

fn lock_conn(conn: &Mutex<Connection>) -> Result<MutexGuard<'_, Connection>> {
  conn
    .lock()
    .map_err(|e| Error::cache("lock", format!("lock poisoned: {}", e)))
}

/// Schema for cache tables.
const CACHE_SCHEMA: &str = r#"
-- Response cache (stores serialized JSON)
CREATE TABLE IF NOT EXISTS response_cache (
    key_hash TEXT PRIMARY KEY,
    cache_key TEXT NOT NULL,
    data BLOB NOT NULL,
    cached_at TEXT NOT NULL DEFAULT (datetime('now'))
);
"#;

/// SHA256 hash for stable, fixed-length primary keys.
fn hash_key(key: &str) -> String {
  let mut hasher = Sha256::new();
  hasher.update(key.as_bytes());
  hex::encode(hasher.finalize())
}

#[async_trait]
impl CachePort for SqliteStorage {
  async fn get(&self, key: &str) -> Result<Option<CachedEntry>> {
    let key_hash = hash_key(key);
    let row: Option<(Vec<u8>, String)> = self
      .with_conn("get", move |conn| {
        conn
          .query_row(
            "SELECT data, cached_at FROM response_cache WHERE key_hash = ?",
            params![key_hash],
            |row| Ok((row.get(0)?, row.get(1)?)),
          )
          .optional()
          .map_err(|e| Error::cache("get", e))
      })
      .await?;

    match row {
      Some((data, cached_at_str)) => {
        let value: Value = serde_json::from_slice(&data)
          .map_err(|e| Error::cache("get", format!("failed to deserialize entry: {}", e)))?;
        let cached_at = parse_datetime(&cached_at_str)?;
        Ok(Some(CachedEntry { value, cached_at }))
      }
      None => Ok(None),
    }
  }

  async fn set(&self, key: &str, value: &Value) -> Result<()> {
    let data = serde_json::to_vec(value)
      .map_err(|e| Error::cache("set", format!("failed to serialize entry: {}", e)))?;
    let key_hash = hash_key(key);
    let key = key.to_string();

    self
      .with_conn("set", move |conn| {
        conn
          .execute(
            "INSERT OR REPLACE INTO response_cache (key_hash, cache_key, data, cached_at)
             VALUES (?, ?, ?, datetime('now'))",
            params![key_hash, key, data],
          )
          .map_err(|e| Error::cache("set", e))?;
        Ok(())
      })
      .await
  }

  async fn flush(&self) -> Result<()> {
    self
      .with_conn("flush", |conn| {
        conn
          .execute("DELETE FROM response_cache", [])
          .map_err(|e| Error::cache("flush", e))?;
        Ok(())
      })
      .await
  }
}

/// Parse a datetime string from SQLite format.
fn parse_datetime(s: &str) -> Result<DateTime<Utc>> {
  // SQLite stores as "YYYY-MM-DD HH:MM:SS"
  chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
    .map(|dt| dt.and_utc())
    .map_err(|e| Error::cache("get", format!("failed to parse datetime '{}': {}", s, e)))
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[tokio::test]
  async fn test_memory_get_set_flush() {
    let storage = MemoryStorage::new();
    assert!(storage.get("a").await.unwrap().is_none());

    storage.set("a", &json!({"x": 1})).await.unwrap();
    storage.set("b", &json!([1])).await.unwrap();
    assert_eq!(storage.len().await, 2);
    assert_eq!(
      storage.get("a").await.unwrap().unwrap().value,
      json!({"x": 1})
    );

    storage.set("a", &json!({"x": 2})).await.unwrap();
    assert_eq!(
      storage.get("a").await.unwrap().unwrap().value,
      json!({"x": 2})
    );

    storage.flush().await.unwrap();
    assert!(storage.is_empty().await);
    assert!(storage.get("b").await.unwrap().is_none());
  }

  #[tokio::test]
  async fn test_sqlite_get_set_flush() {
    let storage = SqliteStorage::open_in_memory().unwrap();
    assert!(storage.get("league-challenger").await.unwrap().is_none());

    let value = json!({"tier": "CHALLENGER", "entries": [{"summonerName": "a"}]});
    storage.set("league-challenger", &value).await.unwrap();

    let entry = storage.get("league-challenger").await.unwrap().unwrap();
    assert_eq!(entry.value, value);
    assert!(entry.cached_at <= Utc::now());

    storage.flush().await.unwrap();
    assert!(storage.get("league-challenger").await.unwrap().is_none());
  }

  #[tokio::test]
  async fn test_sqlite_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("cache.db");

    {
      let storage = SqliteStorage::open_at(&path).unwrap();
      storage
        .set("match-matchByMatchId-NA1_1", &json!({"metadata": {}}))
        .await
        .unwrap();
    }

    let reopened = SqliteStorage::open_at(&path).unwrap();
    let entry = reopened
      .get("match-matchByMatchId-NA1_1")
      .await
      .unwrap()
      .unwrap();
    assert_eq!(entry.value, json!({"metadata": {}}));
  }

  #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
  async fn test_sqlite_shared_across_tasks() {
    let storage = Arc::new(SqliteStorage::open_in_memory().unwrap());

    let mut handles = Vec::new();
    for i in 0..8usize {
      let storage = Arc::clone(&storage);
      handles.push(tokio::spawn(async move {
        let key = format!("match-matchByMatchId-NA1_{}", i);
        storage.set(&key, &json!({"n": i})).await.unwrap();
        storage.get(&key).await.unwrap().unwrap().value
      }));
    }

    for (i, handle) in handles.into_iter().enumerate() {
      assert_eq!(handle.await.unwrap(), json!({"n": i}));
    }
  }

  #[test]
  fn test_hash_key_is_stable_and_distinct() {
    assert_eq!(hash_key("a"), hash_key("a"));
    assert_ne!(hash_key("a"), hash_key("b"));
    assert_eq!(hash_key("a").len(), 64);
  }
}
