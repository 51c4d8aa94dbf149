/// Available commands and how they map onto session resolvers
use clap::{Args, Subcommand};
use serde_json::{json, Value};
use tft_query::{Payload, QuerySession, Result};

#[derive(Subcommand, Debug)]
pub enum Command {
  /// Look up a summoner
  Summoner(SummonerArgs),
  /// List recent match ids for a player
  Matches {
    #[arg(long)]
    puuid: String,
    /// How many ids to return (API default: 20)
    #[arg(short = 'n', long)]
    count: Option<u32>,
  },
  /// Show one match
  Match { match_id: String },
  /// Show several matches, keyed game0, game1, ...
  Batch {
    #[arg(required = true)]
    match_ids: Vec<String>,
  },
  /// League standings and entries
  #[command(subcommand)]
  League(LeagueCommand),
  /// Summoner, primary rank and recent match details in one record
  AllInfo {
    summoner_name: String,
    /// How many recent matches to include
    #[arg(short = 'n', long)]
    count: Option<u32>,
  },
  /// Remove every cached response
  FlushCache,
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct SummonerArgs {
  #[arg(long)]
  name: Option<String>,
  #[arg(long)]
  account_id: Option<String>,
  #[arg(long)]
  puuid: Option<String>,
  #[arg(long)]
  summoner_id: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum LeagueCommand {
  Challenger,
  Grandmaster,
  Master,
  /// Ranked entries for a summoner
  BySummoner { summoner_id: String },
  /// A league by its id
  ById { league_id: String },
  /// Entries in a tier and division, e.g. DIAMOND I
  Entries { tier: String, division: String },
}

impl Command {
  /// Payload fields this command sets before it runs.
  pub fn payload(&self) -> Payload {
    match self {
      Self::Summoner(args) => Payload {
        summoner_name: args.name.clone(),
        account_id: args.account_id.clone(),
        puuid: args.puuid.clone(),
        summoner_id: args.summoner_id.clone(),
        ..Default::default()
      },
      Self::Matches { puuid, count } => Payload {
        puuid: Some(puuid.clone()),
        count: *count,
        ..Default::default()
      },
      Self::Match { match_id } => Payload {
        match_id: Some(match_id.clone()),
        ..Default::default()
      },
      Self::Batch { match_ids } => Payload {
        match_ids: Some(match_ids.clone()),
        ..Default::default()
      },
      Self::League(LeagueCommand::BySummoner { summoner_id }) => Payload {
        summoner_id: Some(summoner_id.clone()),
        ..Default::default()
      },
      Self::League(LeagueCommand::ById { league_id }) => Payload {
        league_id: Some(league_id.clone()),
        ..Default::default()
      },
      Self::League(LeagueCommand::Entries { tier, division }) => Payload {
        tier: Some(tier.to_uppercase()),
        division: Some(division.to_uppercase()),
        ..Default::default()
      },
      Self::AllInfo {
        summoner_name,
        count,
      } => Payload {
        summoner_name: Some(summoner_name.clone()),
        count: *count,
        ..Default::default()
      },
      Self::League(_) | Self::FlushCache => Payload::default(),
    }
  }
}

/// Run a command against the session and return what to print.
pub async fn run(session: &mut QuerySession, command: Command) -> Result<Value> {
  session.update_payload(command.payload());

  match command {
    Command::Summoner(args) => {
      if args.name.is_some() {
        session.summoner_by_name().await
      } else if args.account_id.is_some() {
        session.summoner_by_account_id().await
      } else if args.puuid.is_some() {
        session.summoner_by_puuid().await
      } else {
        session.summoner_by_summoner_id().await
      }
    }
    Command::Matches { .. } => session.match_ids_by_puuid().await,
    Command::Match { .. } => session.match_by_id().await,
    Command::Batch { .. } => session.batch_of_match_info().await.map(Value::Object),
    Command::League(league) => match league {
      LeagueCommand::Challenger => session.challenger_league().await,
      LeagueCommand::Grandmaster => session.grandmaster_league().await,
      LeagueCommand::Master => session.master_league().await,
      LeagueCommand::BySummoner { .. } => session.league_by_summoner_id().await,
      LeagueCommand::ById { .. } => session.league_by_league_id().await,
      LeagueCommand::Entries { .. } => session.league_by_tier_and_division().await,
    },
    Command::AllInfo { .. } => session
      .all_info_by_summoner_name()
      .await
      .map(Value::Object),
    Command::FlushCache => {
      session.flush_cache().await?;
      Ok(json!("OK"))
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use clap::Parser;

  #[derive(Parser)]
  struct Cli {
    #[command(subcommand)]
    command: Command,
  }

  fn parse(args: &[&str]) -> Command {
    Cli::try_parse_from(std::iter::once("tftq").chain(args.iter().copied()))
      .unwrap()
      .command
  }

  #[test]
  fn test_summoner_by_name_payload() {
    let payload = parse(&["summoner", "--name", "Some Player"]).payload();
    assert_eq!(payload.summoner_name.as_deref(), Some("Some Player"));
    assert_eq!(payload.puuid, None);
  }

  #[test]
  fn test_summoner_requires_exactly_one_identifier() {
    assert!(Cli::try_parse_from(["tftq", "summoner"]).is_err());
    assert!(Cli::try_parse_from(["tftq", "summoner", "--name", "a", "--puuid", "b"]).is_err());
  }

  #[test]
  fn test_batch_payload() {
    let payload = parse(&["batch", "NA1_1", "NA1_2"]).payload();
    assert_eq!(
      payload.match_ids,
      Some(vec!["NA1_1".to_string(), "NA1_2".to_string()])
    );
  }

  #[test]
  fn test_league_entries_uppercases() {
    let payload = parse(&["league", "entries", "diamond", "ii"]).payload();
    assert_eq!(payload.tier.as_deref(), Some("DIAMOND"));
    assert_eq!(payload.division.as_deref(), Some("II"));
  }

  #[test]
  fn test_all_info_count() {
    let payload = parse(&["all-info", "Someone", "-n", "5"]).payload();
    assert_eq!(payload.summoner_name.as_deref(), Some("Someone"));
    assert_eq!(payload.count, Some(5));
  }

  #[test]
  fn test_flush_cache_sets_nothing() {
    assert_eq!(parse(&["flush-cache"]).payload(), Payload::default());
  }
}
