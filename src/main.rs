mod commands;

use clap::Parser;
use color_eyre::{eyre::eyre, Result};
use std::path::{Path, PathBuf};
use tft_query::{CacheConfig, QuerySession, SessionConfig};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "tftq")]
#[command(about = "Query the Teamfight Tactics API with response caching")]
#[command(version)]
struct Args {
  /// Path to config file (default: ./tftq.yaml or $XDG_CONFIG_HOME/tftq/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Platform to query, e.g. na1 or euw1
  #[arg(short, long)]
  region: Option<String>,

  /// Cache responses in this SQLite database
  #[arg(long, conflicts_with = "no_cache")]
  cache_db: Option<PathBuf>,

  /// Disable the response cache
  #[arg(long)]
  no_cache: bool,

  /// Write logs to daily files in this directory instead of stderr
  #[arg(long)]
  log_dir: Option<PathBuf>,

  #[command(subcommand)]
  command: commands::Command,
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  // Load TFT_API_KEY / API_KEY from a .env file if present
  dotenvy::dotenv().ok();

  let args = Args::parse();
  let _log_guard = init_logging(args.log_dir.as_deref());

  let config = build_config(&args)?;
  tracing::debug!(region = %config.region, cache = config.use_cache, "starting session");

  let mut session = QuerySession::new(config)?;
  let output = commands::run(&mut session, args.command).await?;

  println!("{}", serde_json::to_string_pretty(&output)?);
  Ok(())
}

/// Merge the config file (if any) with command line overrides.
fn build_config(args: &Args) -> Result<SessionConfig> {
  let file_config = SessionConfig::load(args.config.as_deref())?;

  let mut config = match (file_config, &args.region) {
    (Some(config), Some(region)) => SessionConfig {
      region: region.clone(),
      ..config
    },
    (Some(config), None) => config,
    // Without a config file, cache to the default SQLite location
    (None, Some(region)) => {
      SessionConfig::new(region.clone()).with_cache(CacheConfig::Sqlite { path: None })
    }
    (None, None) => {
      return Err(eyre!(
        "No region given. Pass --region or create ~/.config/tftq/config.yaml"
      ))
    }
  };

  if let Some(path) = &args.cache_db {
    config = config.with_cache(CacheConfig::Sqlite {
      path: Some(path.clone()),
    });
  }
  if args.no_cache {
    config.use_cache = false;
  }

  Ok(config)
}

fn init_logging(log_dir: Option<&Path>) -> Option<WorkerGuard> {
  let filter = EnvFilter::try_from_env("TFTQ_LOG")
    .or_else(|_| EnvFilter::try_from_default_env())
    .unwrap_or_else(|_| EnvFilter::new("tft_query=info,tftq=info"));

  match log_dir {
    Some(dir) => {
      let appender = tracing_appender::rolling::daily(dir, "tftq.log");
      let (writer, guard) = tracing_appender::non_blocking(appender);
      tracing_subscriber::registry()
        .with(filter)
        .with(
          tracing_subscriber::fmt::layer()
            .with_writer(writer)
            .with_ansi(false),
        )
        .init();
      Some(guard)
    }
    None => {
      tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
      None
    }
  }
}
