//! Cache-aware client for the Teamfight Tactics API.
//!
//! A [`QuerySession`] holds a region, an API key, a request [`Payload`] and an
//! optional cache. Each resolver looks its response up in the cache first and
//! only calls the API on a miss. Aggregate views such as
//! [`QuerySession::all_info_by_summoner_name`] chain several resolvers.
//!
//! ```no_run
//! use tft_query::{CacheConfig, Payload, QuerySession, SessionConfig};
//!
//! # async fn run() -> tft_query::Result<()> {
//! let config = SessionConfig::new("na1").with_cache(CacheConfig::Memory);
//! let mut session = QuerySession::new(config)?;
//! session.update_payload(Payload {
//!   summoner_name: Some("Someone".into()),
//!   count: Some(5),
//!   ..Default::default()
//! });
//!
//! let record = session.all_info_by_summoner_name().await?;
//! println!("{}", serde_json::to_string_pretty(&record).unwrap_or_default());
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod riot;

pub use config::{CacheConfig, SessionConfig};
pub use error::{Error, ErrorKind, FetchError, Result};
pub use riot::{AggregateRecord, MatchBatch, Payload, QuerySession, Resource};
