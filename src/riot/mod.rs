//! Teamfight Tactics API: resources, transport, session and aggregate views.

pub mod aggregate;
pub mod api_types;
pub mod cache;
pub mod client;
pub mod routes;
pub mod session;
pub mod types;

pub use aggregate::{AggregateRecord, MatchBatch, ALL_MATCH_INFO_KEY, MATCH_IDS_KEY};
pub use client::{Fetcher, HttpFetcher};
pub use routes::{RequestDescriptor, Resource, Routes};
pub use session::QuerySession;
pub use types::Payload;
