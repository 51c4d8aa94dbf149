//! Cache keys for TFT API resources.

use std::borrow::Cow;

use crate::cache::QueryKey;

use super::routes::Resource;

impl QueryKey for Resource {
  fn cache_key(&self) -> String {
    match self {
      Self::SummonerByName { summoner_name } => {
        format!("summoner-summonerByName-{}", summoner_name)
      }
      Self::SummonerByAccountId { account_id } => {
        format!("summoner-summonerByAccountId-{}", account_id)
      }
      Self::SummonerByPuuid { puuid } => format!("summoner-summonerByPuuid-{}", puuid),
      Self::SummonerById { summoner_id } => {
        format!("summoner-summonerBySummonerId-{}", summoner_id)
      }
      // The count changes the response, so it has to be part of the key
      Self::MatchIdsByPuuid { puuid, count } => match count {
        Some(count) => format!("match-matchByPuuid-{}-{}", key_part(puuid), count),
        None => format!("match-matchByPuuid-{}", key_part(puuid)),
      },
      Self::MatchById { match_id } => format!("match-matchByMatchId-{}", match_id),
      Self::ChallengerLeague => "league-challenger".to_string(),
      Self::GrandmasterLeague => "league-grandmaster".to_string(),
      Self::MasterLeague => "league-master".to_string(),
      Self::LeagueBySummonerId { summoner_id } => format!("league-bySummonerId-{}", summoner_id),
      Self::LeagueById { league_id } => format!("league-byLeagueId-{}", league_id),
      Self::LeagueEntries { tier, division } => {
        format!(
          "league-byTierAndDivision-{}-{}",
          key_part(tier),
          key_part(division)
        )
      }
    }
  }

  fn description(&self) -> String {
    match self {
      Self::SummonerByName { summoner_name } => format!("summoner named {}", summoner_name),
      Self::SummonerByAccountId { account_id } => format!("summoner with account {}", account_id),
      Self::SummonerByPuuid { puuid } => format!("summoner with puuid {}", puuid),
      Self::SummonerById { summoner_id } => format!("summoner {}", summoner_id),
      Self::MatchIdsByPuuid { puuid, count } => {
        if let Some(c) = count {
          format!("last {} match ids for {}", c, puuid)
        } else {
          format!("match ids for {}", puuid)
        }
      }
      Self::MatchById { match_id } => format!("match {}", match_id),
      Self::ChallengerLeague => "challenger league".to_string(),
      Self::GrandmasterLeague => "grandmaster league".to_string(),
      Self::MasterLeague => "master league".to_string(),
      Self::LeagueBySummonerId { summoner_id } => format!("league entries for {}", summoner_id),
      Self::LeagueById { league_id } => format!("league {}", league_id),
      Self::LeagueEntries { tier, division } => format!("{} {} entries", tier, division),
    }
  }
}

/// Escape a value that shares its key with another part.
///
/// `%` and `-` are percent-encoded, so `-` in the key only ever separates parts.
fn key_part(value: &str) -> Cow<'_, str> {
  if value.contains(['%', '-']) {
    Cow::Owned(value.replace('%', "%25").replace('-', "%2D"))
  } else {
    Cow::Borrowed(value)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_keys_follow_templates() {
    let by_name = Resource::SummonerByName {
      summoner_name: "Faker".into(),
    };
    assert_eq!(by_name.cache_key(), "summoner-summonerByName-Faker");
    assert_eq!(
      Resource::LeagueEntries {
        tier: "GOLD".into(),
        division: "II".into()
      }
      .cache_key(),
      "league-byTierAndDivision-GOLD-II"
    );
    assert_eq!(Resource::ChallengerLeague.cache_key(), "league-challenger");
  }

  #[test]
  fn test_same_request_same_key() {
    let a = Resource::MatchById {
      match_id: "NA1_1".into(),
    };
    assert_eq!(a.cache_key(), a.clone().cache_key());
  }

  #[test]
  fn test_distinct_requests_distinct_keys() {
    let resources = vec![
      Resource::SummonerByName {
        summoner_name: "x".into(),
      },
      Resource::SummonerByAccountId {
        account_id: "x".into(),
      },
      Resource::SummonerByPuuid { puuid: "x".into() },
      Resource::SummonerById {
        summoner_id: "x".into(),
      },
      Resource::MatchIdsByPuuid {
        puuid: "x".into(),
        count: None,
      },
      Resource::MatchIdsByPuuid {
        puuid: "x".into(),
        count: Some(5),
      },
      Resource::MatchById {
        match_id: "x".into(),
      },
      Resource::ChallengerLeague,
      Resource::GrandmasterLeague,
      Resource::MasterLeague,
      Resource::LeagueBySummonerId {
        summoner_id: "x".into(),
      },
      Resource::LeagueById {
        league_id: "x".into(),
      },
      Resource::LeagueEntries {
        tier: "x".into(),
        division: "x".into(),
      },
      Resource::MatchById {
        match_id: "y".into(),
      },
    ];

    let keys: std::collections::HashSet<String> =
      resources.iter().map(QueryKey::cache_key).collect();
    assert_eq!(keys.len(), resources.len());
  }

  #[test]
  fn test_dashes_in_values_cannot_collide() {
    let pairs = [
      (
        Resource::MatchIdsByPuuid {
          puuid: "abc-5".into(),
          count: None,
        },
        Resource::MatchIdsByPuuid {
          puuid: "abc".into(),
          count: Some(5),
        },
      ),
      (
        Resource::LeagueEntries {
          tier: "A-B".into(),
          division: "C".into(),
        },
        Resource::LeagueEntries {
          tier: "A".into(),
          division: "B-C".into(),
        },
      ),
      (
        Resource::MatchIdsByPuuid {
          puuid: "abc%2D5".into(),
          count: None,
        },
        Resource::MatchIdsByPuuid {
          puuid: "abc-5".into(),
          count: None,
        },
      ),
    ];

    for (a, b) in &pairs {
      assert_ne!(a.cache_key(), b.cache_key(), "{:?} vs {:?}", a, b);
    }
  }

  #[test]
  fn test_escaped_key_parts() {
    let key = Resource::MatchIdsByPuuid {
      puuid: "abc-5".into(),
      count: Some(20),
    }
    .cache_key();
    assert_eq!(key, "match-matchByPuuid-abc%2D5-20");
    assert_eq!(key_part("plain"), "plain");
  }
}
