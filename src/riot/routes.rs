//! Resource descriptors: which URL a logical request resolves to.

use std::fmt;
use url::Url;

use crate::error::{Error, Result};

/// One logical API resource together with its identifying parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Resource {
  SummonerByName { summoner_name: String },
  SummonerByAccountId { account_id: String },
  SummonerByPuuid { puuid: String },
  SummonerById { summoner_id: String },
  MatchIdsByPuuid { puuid: String, count: Option<u32> },
  MatchById { match_id: String },
  ChallengerLeague,
  GrandmasterLeague,
  MasterLeague,
  LeagueBySummonerId { summoner_id: String },
  LeagueById { league_id: String },
  LeagueEntries { tier: String, division: String },
}

/// Which host family serves a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Routing {
  /// Platform hosts such as `na1` or `euw1`
  Platform,
  /// Regional hosts such as `americas` or `europe`
  Regional,
}

impl Resource {
  /// Name of the resolver method that requests this resource.
  pub fn operation(&self) -> &'static str {
    match self {
      Self::SummonerByName { .. } => "summoner_by_name",
      Self::SummonerByAccountId { .. } => "summoner_by_account_id",
      Self::SummonerByPuuid { .. } => "summoner_by_puuid",
      Self::SummonerById { .. } => "summoner_by_summoner_id",
      Self::MatchIdsByPuuid { .. } => "match_ids_by_puuid",
      Self::MatchById { .. } => "match_by_id",
      Self::ChallengerLeague => "challenger_league",
      Self::GrandmasterLeague => "grandmaster_league",
      Self::MasterLeague => "master_league",
      Self::LeagueBySummonerId { .. } => "league_by_summoner_id",
      Self::LeagueById { .. } => "league_by_league_id",
      Self::LeagueEntries { .. } => "league_by_tier_and_division",
    }
  }

  /// Reject blank identifying values and a zero count.
  ///
  /// Every resolve path runs this before touching the cache or the network,
  /// including values taken from earlier responses.
  pub fn validate(&self) -> Result<()> {
    let method = self.operation();
    let present = |value: &str, field: &'static str| -> Result<()> {
      if value.trim().is_empty() {
        Err(Error::MissingField { method, field })
      } else {
        Ok(())
      }
    };

    match self {
      Self::SummonerByName { summoner_name } => present(summoner_name, "summoner_name"),
      Self::SummonerByAccountId { account_id } => present(account_id, "account_id"),
      Self::SummonerByPuuid { puuid } => present(puuid, "puuid"),
      Self::SummonerById { summoner_id } | Self::LeagueBySummonerId { summoner_id } => {
        present(summoner_id, "summoner_id")
      }
      Self::MatchIdsByPuuid { puuid, count } => {
        present(puuid, "puuid")?;
        validate_count(*count, method).map(|_| ())
      }
      Self::MatchById { match_id } => present(match_id, "match_id"),
      Self::LeagueById { league_id } => present(league_id, "league_id"),
      Self::LeagueEntries { tier, division } => {
        present(tier, "tier")?;
        present(division, "division")
      }
      Self::ChallengerLeague | Self::GrandmasterLeague | Self::MasterLeague => Ok(()),
    }
  }

  pub fn routing(&self) -> Routing {
    match self {
      Self::MatchIdsByPuuid { .. } | Self::MatchById { .. } => Routing::Regional,
      _ => Routing::Platform,
    }
  }

  /// Path segments, unencoded.
  fn segments(&self) -> Vec<&str> {
    match self {
      Self::SummonerByName { summoner_name } => {
        vec!["tft", "summoner", "v1", "summoners", "by-name", summoner_name.as_str()]
      }
      Self::SummonerByAccountId { account_id } => {
        vec!["tft", "summoner", "v1", "summoners", "by-account", account_id.as_str()]
      }
      Self::SummonerByPuuid { puuid } => {
        vec!["tft", "summoner", "v1", "summoners", "by-puuid", puuid.as_str()]
      }
      Self::SummonerById { summoner_id } => {
        vec!["tft", "summoner", "v1", "summoners", summoner_id.as_str()]
      }
      Self::MatchIdsByPuuid { puuid, .. } => {
        vec!["tft", "match", "v1", "matches", "by-puuid", puuid.as_str(), "ids"]
      }
      Self::MatchById { match_id } => vec!["tft", "match", "v1", "matches", match_id.as_str()],
      Self::ChallengerLeague => vec!["tft", "league", "v1", "challenger"],
      Self::GrandmasterLeague => vec!["tft", "league", "v1", "grandmaster"],
      Self::MasterLeague => vec!["tft", "league", "v1", "master"],
      Self::LeagueBySummonerId { summoner_id } => {
        vec!["tft", "league", "v1", "entries", "by-summoner", summoner_id.as_str()]
      }
      Self::LeagueById { league_id } => vec!["tft", "league", "v1", "leagues", league_id.as_str()],
      Self::LeagueEntries { tier, division } => {
        vec!["tft", "league", "v1", "entries", tier.as_str(), division.as_str()]
      }
    }
  }
}

/// A fully-specified request target: URL plus the credential to send with it.
#[derive(Clone)]
pub struct RequestDescriptor {
  pub url: Url,
  credential: String,
}

impl RequestDescriptor {
  pub fn new(url: Url, credential: impl Into<String>) -> Self {
    Self {
      url,
      credential: credential.into(),
    }
  }

  pub fn credential(&self) -> &str {
    &self.credential
  }
}

impl fmt::Debug for RequestDescriptor {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("RequestDescriptor")
      .field("url", &self.url.as_str())
      .field("credential", &"<redacted>")
      .finish()
  }
}

/// Maps resources to URLs for one platform.
#[derive(Debug, Clone)]
pub struct Routes {
  platform: String,
  api_host: Option<Url>,
}

impl Routes {
  pub fn new(platform: &str) -> Result<Self> {
    let platform = platform.trim().to_lowercase();
    if platform.is_empty() {
      return Err(Error::configuration("A region is required, e.g. na1 or euw1"));
    }

    Ok(Self {
      platform,
      api_host: None,
    })
  }

  /// Send every request to `host` instead of the Riot hosts.
  pub fn with_api_host(mut self, host: Url) -> Self {
    self.api_host = Some(host);
    self
  }

  pub fn platform(&self) -> &str {
    &self.platform
  }

  /// Regional routing value that serves match data for a platform.
  pub fn regional_route(platform: &str) -> Option<&'static str> {
    let route = match platform {
      "na1" | "br1" | "la1" | "la2" | "oc1" | "americas" => "americas",
      "euw1" | "eun1" | "tr1" | "ru" | "me1" | "europe" => "europe",
      "kr" | "jp1" | "asia" => "asia",
      "ph2" | "sg2" | "th2" | "tw2" | "vn2" | "sea" => "sea",
      _ => return None,
    };
    Some(route)
  }

  /// Build the request descriptor for `resource`.
  pub fn descriptor(&self, resource: &Resource, credential: &str) -> Result<RequestDescriptor> {
    let mut url = match &self.api_host {
      Some(host) => host.clone(),
      None => {
        let host = match resource.routing() {
          Routing::Platform => self.platform.as_str(),
          Routing::Regional => Self::regional_route(&self.platform).ok_or_else(|| {
            Error::configuration(format!(
              "No regional route is known for region '{}'",
              self.platform
            ))
          })?,
        };
        Url::parse(&format!("https://{}.api.riotgames.com", host)).map_err(|e| {
          Error::configuration(format!("Invalid region '{}': {}", self.platform, e))
        })?
      }
    };

    url
      .path_segments_mut()
      .map_err(|_| Error::configuration("API host cannot be used as a base URL"))?
      .pop_if_empty()
      .extend(resource.segments());

    if let Resource::MatchIdsByPuuid {
      count: Some(count), ..
    } = resource
    {
      url
        .query_pairs_mut()
        .append_pair("count", &count.to_string());
    }

    Ok(RequestDescriptor::new(url, credential))
  }
}

pub(crate) fn validate_count(count: Option<u32>, method: &'static str) -> Result<Option<u32>> {
  match count {
    Some(0) => Err(Error::InvalidField {
      method,
      field: "count",
      reason: "must be at least 1".to_string(),
    }),
    other => Ok(other),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn routes() -> Routes {
    Routes::new("NA1").unwrap()
  }

  #[test]
  fn test_platform_resource_url() {
    let desc = routes()
      .descriptor(
        &Resource::SummonerByName {
          summoner_name: "Some Player".into(),
        },
        "RGAPI-key",
      )
      .unwrap();

    assert_eq!(
      desc.url.as_str(),
      "https://na1.api.riotgames.com/tft/summoner/v1/summoners/by-name/Some%20Player"
    );
    assert_eq!(desc.credential(), "RGAPI-key");
  }

  #[test]
  fn test_match_resources_use_regional_host() {
    let desc = Routes::new("euw1")
      .unwrap()
      .descriptor(
        &Resource::MatchIdsByPuuid {
          puuid: "p-1".into(),
          count: Some(10),
        },
        "k",
      )
      .unwrap();

    assert_eq!(
      desc.url.as_str(),
      "https://europe.api.riotgames.com/tft/match/v1/matches/by-puuid/p-1/ids?count=10"
    );

    let desc = routes()
      .descriptor(
        &Resource::MatchById {
          match_id: "NA1_42".into(),
        },
        "k",
      )
      .unwrap();
    assert_eq!(
      desc.url.as_str(),
      "https://americas.api.riotgames.com/tft/match/v1/matches/NA1_42"
    );
  }

  #[test]
  fn test_tier_and_division_uses_entries_endpoint() {
    let desc = routes()
      .descriptor(
        &Resource::LeagueEntries {
          tier: "DIAMOND".into(),
          division: "I".into(),
        },
        "k",
      )
      .unwrap();
    assert_eq!(desc.url.path(), "/tft/league/v1/entries/DIAMOND/I");
  }

  #[test]
  fn test_api_host_override() {
    let host = Url::parse("http://127.0.0.1:8080").unwrap();
    let desc = routes()
      .with_api_host(host)
      .descriptor(&Resource::ChallengerLeague, "k")
      .unwrap();
    assert_eq!(
      desc.url.as_str(),
      "http://127.0.0.1:8080/tft/league/v1/challenger"
    );
  }

  #[test]
  fn test_unknown_region_only_fails_regional_resources() {
    let routes = Routes::new("pbe1").unwrap();
    assert!(routes.descriptor(&Resource::MasterLeague, "k").is_ok());

    let err = routes
      .descriptor(
        &Resource::MatchById {
          match_id: "x".into(),
        },
        "k",
      )
      .unwrap_err();
    assert_eq!(err.kind(), crate::error::ErrorKind::Configuration);
  }

  #[test]
  fn test_empty_region_rejected() {
    assert!(Routes::new("  ").is_err());
  }

  #[test]
  fn test_debug_redacts_credential() {
    let desc = routes()
      .descriptor(&Resource::MasterLeague, "RGAPI-secret")
      .unwrap();
    let printed = format!("{:?}", desc);
    assert!(!printed.contains("RGAPI-secret"));
  }

  #[test]
  fn test_validate_rejects_blank_identifiers() {
    let err = Resource::SummonerByName {
      summoner_name: "".into(),
    }
    .validate()
    .unwrap_err();
    assert!(matches!(
      err,
      Error::MissingField {
        method: "summoner_by_name",
        field: "summoner_name"
      }
    ));

    let err = Resource::LeagueBySummonerId {
      summoner_id: "  ".into(),
    }
    .validate()
    .unwrap_err();
    assert!(matches!(
      err,
      Error::MissingField {
        method: "league_by_summoner_id",
        field: "summoner_id"
      }
    ));

    let err = Resource::LeagueEntries {
      tier: "GOLD".into(),
      division: "".into(),
    }
    .validate()
    .unwrap_err();
    assert!(matches!(err, Error::MissingField { field: "division", .. }));
  }

  #[test]
  fn test_validate_rejects_zero_count() {
    let err = Resource::MatchIdsByPuuid {
      puuid: "p-1".into(),
      count: Some(0),
    }
    .validate()
    .unwrap_err();
    assert!(matches!(err, Error::InvalidField { field: "count", .. }));
  }

  #[test]
  fn test_validate_accepts_complete_resources() {
    assert!(Resource::ChallengerLeague.validate().is_ok());
    assert!(Resource::MatchIdsByPuuid {
      puuid: "p-1".into(),
      count: Some(5),
    }
    .validate()
    .is_ok());
    assert!(Resource::MatchById {
      match_id: "NA1_1".into(),
    }
    .validate()
    .is_ok());
  }
}
