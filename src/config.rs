use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use url::Url;

use crate::cache::{CachePort, MemoryStorage, SqliteStorage};
use crate::error::{Error, Result};
use crate::riot::routes::Routes;
use crate::riot::types::Payload;

/// Environment variables checked for the API key, in order.
pub const API_KEY_VARS: [&str; 2] = ["TFT_API_KEY", "API_KEY"];

/// Everything needed to construct a query session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SessionConfig {
  /// Platform id, e.g. `na1` or `euw1`
  pub region: String,
  /// Initial request parameters
  #[serde(default)]
  pub payload: Payload,
  /// Falls back to the environment when unset
  pub api_key: Option<String>,
  #[serde(default)]
  pub use_cache: bool,
  /// Cache backend; in-memory when `use_cache` is set without one
  pub cache: Option<CacheConfig>,
  /// Send all requests to this host instead of the Riot API
  pub api_host: Option<String>,
}

/// Cache backend selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum CacheConfig {
  #[default]
  Memory,
  Sqlite {
    /// Defaults to the platform data directory
    #[serde(default)]
    path: Option<PathBuf>,
  },
}

impl CacheConfig {
  /// Open the configured backend.
  pub fn open(&self) -> Result<Arc<dyn CachePort>> {
    let storage: Arc<dyn CachePort> = match self {
      Self::Memory => Arc::new(MemoryStorage::new()),
      Self::Sqlite { path: Some(path) } => Arc::new(SqliteStorage::open_at(path)?),
      Self::Sqlite { path: None } => Arc::new(SqliteStorage::open()?),
    };
    Ok(storage)
  }
}

impl SessionConfig {
  pub fn new(region: impl Into<String>) -> Self {
    Self {
      region: region.into(),
      ..Default::default()
    }
  }

  pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
    self.api_key = Some(api_key.into());
    self
  }

  pub fn with_payload(mut self, payload: Payload) -> Self {
    self.payload = payload;
    self
  }

  /// Enable caching with the given backend.
  pub fn with_cache(mut self, cache: CacheConfig) -> Self {
    self.use_cache = true;
    self.cache = Some(cache);
    self
  }

  pub fn with_api_host(mut self, api_host: impl Into<String>) -> Self {
    self.api_host = Some(api_host.into());
    self
  }

  /// Resolve the API key: the explicit value first, then the environment.
  ///
  /// Checks TFT_API_KEY first, then API_KEY as fallback.
  pub fn resolve_api_key(&self) -> Result<String> {
    self.resolve_api_key_with(|name| std::env::var(name).ok())
  }

  fn resolve_api_key_with(&self, lookup: impl Fn(&str) -> Option<String>) -> Result<String> {
    self
      .api_key
      .clone()
      .into_iter()
      .chain(API_KEY_VARS.iter().filter_map(|name| lookup(name)))
      .find(|key| !key.trim().is_empty())
      .ok_or_else(|| {
        Error::configuration(
          "API key not found. Pass one explicitly or set the TFT_API_KEY or API_KEY environment variable.",
        )
      })
  }

  /// Build the route table for this configuration.
  pub fn routes(&self) -> Result<Routes> {
    let routes = Routes::new(&self.region)?;
    match &self.api_host {
      Some(host) => {
        let host = Url::parse(host)
          .map_err(|e| Error::configuration(format!("Invalid api_host '{}': {}", host, e)))?;
        Ok(routes.with_api_host(host))
      }
      None => Ok(routes),
    }
  }

  /// The cache backend to open at construction, if any.
  pub fn cache_backend(&self) -> Option<CacheConfig> {
    self
      .use_cache
      .then(|| self.cache.clone().unwrap_or_default())
  }

  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./tftq.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/tftq/config.yaml
  ///
  /// Returns `Ok(None)` when no explicit path was given and no file exists.
  pub fn load(explicit_path: Option<&Path>) -> Result<Option<Self>> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(Error::configuration(format!(
          "Config file not found: {}",
          p.display()
        )));
      }
    } else {
      Self::find_config_file()
    };

    path.map(|p| Self::load_from_path(&p)).transpose()
  }

  fn find_config_file() -> Option<PathBuf> {
    // Check current directory
    let local = PathBuf::from("tftq.yaml");
    if local.exists() {
      return Some(local);
    }

    // Check XDG config directory
    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("tftq").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
      Error::configuration(format!(
        "Failed to read config file {}: {}",
        path.display(),
        e
      ))
    })?;

    Self::from_yaml(&contents).map_err(|e| {
      Error::configuration(format!(
        "Failed to parse config file {}: {}",
        path.display(),
        e
      ))
    })
  }

  pub fn from_yaml(contents: &str) -> std::result::Result<Self, serde_yaml::Error> {
    serde_yaml::from_str(contents)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_parse_yaml() {
    let config = SessionConfig::from_yaml(
      r#"
region: euw1
api_key: RGAPI-test
use_cache: true
cache:
  backend: sqlite
  path: /tmp/tftq.db
payload:
  summonerName: Someone
  count: 10
"#,
    )
    .unwrap();

    assert_eq!(config.region, "euw1");
    assert_eq!(config.api_key.as_deref(), Some("RGAPI-test"));
    assert_eq!(
      config.cache_backend(),
      Some(CacheConfig::Sqlite {
        path: Some(PathBuf::from("/tmp/tftq.db"))
      })
    );
    assert_eq!(config.payload.summoner_name.as_deref(), Some("Someone"));
    assert_eq!(config.payload.count, Some(10));
  }

  #[test]
  fn test_cache_defaults_to_memory_when_enabled() {
    let config = SessionConfig::from_yaml("region: na1\nuse_cache: true\n").unwrap();
    assert_eq!(config.cache_backend(), Some(CacheConfig::Memory));

    let config = SessionConfig::from_yaml("region: na1\n").unwrap();
    assert_eq!(config.cache_backend(), None);
  }

  #[test]
  fn test_explicit_api_key_wins() {
    let config = SessionConfig::new("na1").with_api_key("explicit");
    let key = config
      .resolve_api_key_with(|_| Some("from-env".to_string()))
      .unwrap();
    assert_eq!(key, "explicit");
  }

  #[test]
  fn test_api_key_env_fallback_order() {
    let config = SessionConfig::new("na1");
    let key = config
      .resolve_api_key_with(|name| match name {
        "API_KEY" => Some("legacy".to_string()),
        _ => None,
      })
      .unwrap();
    assert_eq!(key, "legacy");

    let key = config
      .resolve_api_key_with(|name| Some(format!("{}-value", name)))
      .unwrap();
    assert_eq!(key, "TFT_API_KEY-value");
  }

  #[test]
  fn test_missing_api_key_is_configuration_error() {
    let err = SessionConfig::new("na1")
      .resolve_api_key_with(|_| None)
      .unwrap_err();
    assert_eq!(err.kind(), crate::error::ErrorKind::Configuration);
  }

  #[test]
  fn test_invalid_api_host() {
    let config = SessionConfig::new("na1").with_api_host("not a url");
    assert!(config.routes().is_err());
  }

  #[test]
  fn test_load_missing_explicit_path() {
    let err = SessionConfig::load(Some(Path::new("/definitely/not/here.yaml"))).unwrap_err();
    assert!(err.to_string().contains("Config file not found"));
  }

  #[test]
  fn test_load_explicit_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tftq.yaml");
    std::fs::write(&path, "region: kr\napi_key: k\n").unwrap();

    let config = SessionConfig::load(Some(&path)).unwrap().unwrap();
    assert_eq!(config.region, "kr");
  }
}
