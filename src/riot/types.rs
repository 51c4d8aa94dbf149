use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Per-session request parameters.
///
/// Resolver methods that take no arguments read their identifying values
/// from here. Every field is optional; a resolver fails with a validation
/// error when the field it needs is absent or blank.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Payload {
  pub summoner_name: Option<String>,
  pub account_id: Option<String>,
  pub puuid: Option<String>,
  pub summoner_id: Option<String>,
  pub match_id: Option<String>,
  pub match_ids: Option<Vec<String>>,
  /// Number of match ids to request (the API defaults to 20)
  pub count: Option<u32>,
  pub tier: Option<String>,
  pub division: Option<String>,
  pub league_id: Option<String>,
}

impl Payload {
  /// Merge `update` into this payload. Fields set in `update` overwrite,
  /// fields it leaves as `None` keep their current value.
  pub fn merge(&mut self, update: Payload) {
    let Payload {
      summoner_name,
      account_id,
      puuid,
      summoner_id,
      match_id,
      match_ids,
      count,
      tier,
      division,
      league_id,
    } = update;

    merge_field(&mut self.summoner_name, summoner_name);
    merge_field(&mut self.account_id, account_id);
    merge_field(&mut self.puuid, puuid);
    merge_field(&mut self.summoner_id, summoner_id);
    merge_field(&mut self.match_id, match_id);
    merge_field(&mut self.match_ids, match_ids);
    merge_field(&mut self.count, count);
    merge_field(&mut self.tier, tier);
    merge_field(&mut self.division, division);
    merge_field(&mut self.league_id, league_id);
  }
}

fn merge_field<T>(current: &mut Option<T>, update: Option<T>) {
  if update.is_some() {
    *current = update;
  }
}

/// Fetch a required string field, treating blank values as missing.
///
/// Non-blank values are returned exactly as set, surrounding whitespace included.
pub(crate) fn require<'a>(
  value: &'a Option<String>,
  method: &'static str,
  field: &'static str,
) -> Result<&'a str> {
  match value.as_deref() {
    Some(v) if !v.trim().is_empty() => Ok(v),
    _ => Err(Error::MissingField { method, field }),
  }
}
