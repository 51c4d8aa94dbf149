//! Query session: configured client state plus one resolver per resource.

use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::info;

use crate::cache::{CacheLayer, CachePort, CacheResult};
use crate::config::{CacheConfig, SessionConfig};
use crate::error::{Error, Result};

use super::client::{Fetcher, HttpFetcher};
use super::routes::{validate_count, Resource, Routes};
use super::types::{require, Payload};

/// A configured client for one region.
///
/// Resolvers take `&self` and receive their parameters either explicitly
/// through [`QuerySession::resolve`] or from the session payload. Nothing a
/// resolver does writes to the payload, so a shared session can serve
/// concurrent calls; changing the payload needs `&mut self`.
pub struct QuerySession {
  region: String,
  credential: String,
  payload: Payload,
  routes: Routes,
  cache: Option<CacheLayer>,
  fetcher: Arc<dyn Fetcher>,
}

impl QuerySession {
  /// Create a session that talks to the API over HTTP.
  pub fn new(config: SessionConfig) -> Result<Self> {
    let fetcher = Arc::new(HttpFetcher::new()?);
    Self::with_fetcher(config, fetcher)
  }

  /// Create a session with a custom transport.
  ///
  /// The API key is resolved here, once, and never re-read.
  pub fn with_fetcher(config: SessionConfig, fetcher: Arc<dyn Fetcher>) -> Result<Self> {
    let credential = config.resolve_api_key()?;
    let routes = config.routes()?;
    let cache = config
      .cache_backend()
      .map(|backend| backend.open().map(CacheLayer::new))
      .transpose()?;

    Ok(Self {
      region: routes.platform().to_string(),
      credential,
      payload: config.payload,
      routes,
      cache,
      fetcher,
    })
  }

  pub fn region(&self) -> &str {
    &self.region
  }

  pub fn payload(&self) -> &Payload {
    &self.payload
  }

  /// Merge fields into the payload; fields not mentioned are kept.
  pub fn update_payload(&mut self, update: Payload) {
    self.payload.merge(update);
  }

  pub fn is_cache_enabled(&self) -> bool {
    self.cache.is_some()
  }

  /// Open a cache backend and use it from now on, replacing any current one.
  pub fn enable_cache(&mut self, config: &CacheConfig) -> Result<()> {
    let storage = config.open()?;
    self.enable_cache_with(storage);
    Ok(())
  }

  /// Use an already-open cache backend, replacing any current one.
  pub fn enable_cache_with(&mut self, storage: Arc<dyn CachePort>) {
    if self.cache.replace(CacheLayer::new(storage)).is_some() {
      info!("replaced session cache");
    } else {
      info!("enabled session cache");
    }
  }

  /// Remove every entry from the configured cache.
  pub async fn flush_cache(&self) -> Result<()> {
    match &self.cache {
      Some(cache) => cache.flush().await,
      None => Err(Error::configuration(
        "Caching is not enabled. Enable it in the session config or call enable_cache first.",
      )),
    }
  }

  /// Resolve a resource through the cache, if one is configured.
  pub async fn resolve(&self, resource: &Resource) -> Result<Value> {
    self.resolve_with_source(resource).await.map(|r| r.data)
  }

  /// Like [`QuerySession::resolve`], also reporting where the data came from.
  pub async fn resolve_with_source(&self, resource: &Resource) -> Result<CacheResult<Value>> {
    resource.validate()?;
    match &self.cache {
      Some(cache) => cache.fetch_one(resource, || self.fetch(resource)).await,
      None => self.fetch(resource).await.map(CacheResult::from_network),
    }
  }

  async fn fetch(&self, resource: &Resource) -> Result<Value> {
    let request = self.routes.descriptor(resource, &self.credential)?;
    self
      .fetcher
      .fetch(&request)
      .await
      .map_err(|source| Error::Transport {
        operation: resource.operation(),
        source,
      })
  }

  // Summoner resources

  pub async fn summoner_by_name(&self) -> Result<Value> {
    let summoner_name = require(&self.payload.summoner_name, "summoner_by_name", "summoner_name")?;
    self
      .resolve(&Resource::SummonerByName {
        summoner_name: summoner_name.to_string(),
      })
      .await
  }

  pub async fn summoner_by_account_id(&self) -> Result<Value> {
    let account_id = require(&self.payload.account_id, "summoner_by_account_id", "account_id")?;
    self
      .resolve(&Resource::SummonerByAccountId {
        account_id: account_id.to_string(),
      })
      .await
  }

  pub async fn summoner_by_puuid(&self) -> Result<Value> {
    let puuid = require(&self.payload.puuid, "summoner_by_puuid", "puuid")?;
    self
      .resolve(&Resource::SummonerByPuuid {
        puuid: puuid.to_string(),
      })
      .await
  }

  pub async fn summoner_by_summoner_id(&self) -> Result<Value> {
    let summoner_id = require(&self.payload.summoner_id, "summoner_by_summoner_id", "summoner_id")?;
    self
      .resolve(&Resource::SummonerById {
        summoner_id: summoner_id.to_string(),
      })
      .await
  }

  // Match resources

  /// Match ids for `puuid`, most recent first. Honors `count` when set.
  pub async fn match_ids_by_puuid(&self) -> Result<Value> {
    let puuid = require(&self.payload.puuid, "match_ids_by_puuid", "puuid")?;
    let count = validate_count(self.payload.count, "match_ids_by_puuid")?;
    self
      .resolve(&Resource::MatchIdsByPuuid {
        puuid: puuid.to_string(),
        count,
      })
      .await
  }

  pub async fn match_by_id(&self) -> Result<Value> {
    let match_id = require(&self.payload.match_id, "match_by_id", "match_id")?;
    self
      .resolve(&Resource::MatchById {
        match_id: match_id.to_string(),
      })
      .await
  }

  // League resources

  pub async fn challenger_league(&self) -> Result<Value> {
    self.resolve(&Resource::ChallengerLeague).await
  }

  pub async fn grandmaster_league(&self) -> Result<Value> {
    self.resolve(&Resource::GrandmasterLeague).await
  }

  pub async fn master_league(&self) -> Result<Value> {
    self.resolve(&Resource::MasterLeague).await
  }

  pub async fn league_by_summoner_id(&self) -> Result<Value> {
    let summoner_id = require(&self.payload.summoner_id, "league_by_summoner_id", "summoner_id")?;
    self
      .resolve(&Resource::LeagueBySummonerId {
        summoner_id: summoner_id.to_string(),
      })
      .await
  }

  pub async fn league_by_league_id(&self) -> Result<Value> {
    let league_id = require(&self.payload.league_id, "league_by_league_id", "league_id")?;
    self
      .resolve(&Resource::LeagueById {
        league_id: league_id.to_string(),
      })
      .await
  }

  pub async fn league_by_tier_and_division(&self) -> Result<Value> {
    let tier = require(&self.payload.tier, "league_by_tier_and_division", "tier")?;
    let division = require(&self.payload.division, "league_by_tier_and_division", "division")?;
    self
      .resolve(&Resource::LeagueEntries {
        tier: tier.to_string(),
        division: division.to_string(),
      })
      .await
  }
}

impl fmt::Debug for QuerySession {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("QuerySession")
      .field("region", &self.region)
      .field("payload", &self.payload)
      .field("cache", &self.cache.is_some())
      .finish_non_exhaustive()
  }
}
