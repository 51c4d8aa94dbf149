//! Multi-call views built from single-resource resolvers.
//!
//! Every step runs after the previous one has finished, and intermediate
//! values (summoner ids, match ids) travel through local variables rather
//! than the session payload. The first failing step aborts the whole call;
//! no partial result is returned.

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{Error, Result};

use super::api_types::{into_object, primary_league_entry, view, SummonerIds};
use super::routes::{validate_count, Resource};
use super::session::QuerySession;
use super::types::require;

/// Match details keyed `game0`, `game1`, ... in input order.
pub type MatchBatch = Map<String, Value>;

/// Summoner record merged with rank, match ids and match details.
pub type AggregateRecord = Map<String, Value>;

/// Key the match id list is stored under in an [`AggregateRecord`].
pub const MATCH_IDS_KEY: &str = "matchIds";

/// Key the [`MatchBatch`] is stored under in an [`AggregateRecord`].
pub const ALL_MATCH_INFO_KEY: &str = "allMatchInfo";

const BATCH_METHOD: &str = "batch_of_match_info";
const ALL_INFO_METHOD: &str = "all_info_by_summoner_name";

impl QuerySession {
  /// Fetch details for every id in the payload's `match_ids`.
  pub async fn batch_of_match_info(&self) -> Result<MatchBatch> {
    let match_ids = self
      .payload()
      .match_ids
      .as_deref()
      .ok_or(Error::MissingField {
        method: BATCH_METHOD,
        field: "match_ids",
      })?;

    self.match_batch(match_ids).await
  }

  /// Fetch details for each match id, one after another.
  ///
  /// The result maps `game{i}` to the details of `match_ids[i]`. An empty list
  /// gives an empty batch. All ids are checked before the first request.
  pub async fn match_batch(&self, match_ids: &[String]) -> Result<MatchBatch> {
    if let Some(index) = match_ids.iter().position(|id| id.trim().is_empty()) {
      return Err(Error::InvalidField {
        method: BATCH_METHOD,
        field: "match_ids",
        reason: format!("entry {} is blank", index),
      });
    }

    let mut batch = MatchBatch::new();
    for (i, match_id) in match_ids.iter().enumerate() {
      let details = self
        .resolve(&Resource::MatchById {
          match_id: match_id.clone(),
        })
        .await?;
      batch.insert(format!("game{}", i), details);
    }

    debug!(matches = batch.len(), "resolved match batch");
    Ok(batch)
  }

  /// Summoner, primary rank and recent matches for the payload's `summoner_name`.
  pub async fn all_info_by_summoner_name(&self) -> Result<AggregateRecord> {
    let summoner_name = require(&self.payload().summoner_name, ALL_INFO_METHOD, "summoner_name")?;
    self.all_info_for(summoner_name).await
  }

  /// Build an [`AggregateRecord`] for `summoner_name`.
  ///
  /// 1. Resolve the summoner by name, which yields its `id` and `puuid`
  /// 2. Resolve league entries by `id` and merge the primary entry's fields
  /// 3. Resolve match ids by `puuid` (honoring the payload `count`) into `matchIds`
  /// 4. Resolve every match and store the batch under `allMatchInfo`
  ///
  /// Later merges overwrite on key collisions and never remove keys.
  pub async fn all_info_for(&self, summoner_name: &str) -> Result<AggregateRecord> {
    let count = validate_count(self.payload().count, ALL_INFO_METHOD)?;

    let summoner = self
      .resolve(&Resource::SummonerByName {
        summoner_name: summoner_name.to_string(),
      })
      .await?;
    let ids: SummonerIds = view(&summoner, "summoner_by_name")?;
    let mut record = into_object(summoner, "summoner_by_name")?;

    let entries = self
      .resolve(&Resource::LeagueBySummonerId {
        summoner_id: ids.id,
      })
      .await?;
    if let Some(primary) = primary_league_entry(entries, "league_by_summoner_id")? {
      record.extend(primary);
    }

    let match_ids = self
      .resolve(&Resource::MatchIdsByPuuid {
        puuid: ids.puuid,
        count,
      })
      .await?;
    let id_list: Vec<String> = view(&match_ids, "match_ids_by_puuid")?;
    record.insert(MATCH_IDS_KEY.to_string(), match_ids);

    let batch = self.match_batch(&id_list).await?;
    record.insert(ALL_MATCH_INFO_KEY.to_string(), Value::Object(batch));

    Ok(record)
  }
}
