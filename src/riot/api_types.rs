//! Typed views over the few response fields the crate itself reads.
//!
//! Responses are otherwise passed through as opaque JSON.

use serde::{de::DeserializeOwned, Deserialize};
use serde_json::{Map, Value};

use crate::error::{Error, FetchError};

/// Identifiers the aggregation pipeline needs from a summoner record.
#[derive(Debug, Clone, Deserialize)]
pub struct SummonerIds {
  /// Encrypted summoner id
  pub id: String,
  pub puuid: String,
}

/// Read a typed view out of a response without consuming it.
pub fn view<T: DeserializeOwned>(value: &Value, operation: &'static str) -> Result<T, Error> {
  T::deserialize(value).map_err(|e| unexpected_shape(operation, e))
}

/// Require a JSON object response.
pub fn into_object(value: Value, operation: &'static str) -> Result<Map<String, Value>, Error> {
  match value {
    Value::Object(map) => Ok(map),
    other => Err(unexpected_shape(
      operation,
      format!("expected an object, got {}", type_name(&other)),
    )),
  }
}

/// Select the primary ranked queue entry from a league-entries response.
///
/// The API returns one entry per ranked queue; only the first one is kept.
/// An empty list (an unranked summoner) yields `None`.
pub fn primary_league_entry(
  entries: Value,
  operation: &'static str,
) -> Result<Option<Map<String, Value>>, Error> {
  let entries = match entries {
    Value::Array(entries) => entries,
    other => {
      return Err(unexpected_shape(
        operation,
        format!("expected a list, got {}", type_name(&other)),
      ))
    }
  };

  entries
    .into_iter()
    .next()
    .map(|entry| into_object(entry, operation))
    .transpose()
}

pub(crate) fn unexpected_shape(operation: &'static str, reason: impl ToString) -> Error {
  Error::Transport {
    operation,
    source: FetchError::UnexpectedShape(reason.to_string()),
  }
}

fn type_name(value: &Value) -> &'static str {
  match value {
    Value::Null => "null",
    Value::Bool(_) => "a boolean",
    Value::Number(_) => "a number",
    Value::String(_) => "a string",
    Value::Array(_) => "a list",
    Value::Object(_) => "an object",
  }
}
