//! HTTP transport behind the `Fetcher` port.

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use super::routes::RequestDescriptor;
use crate::error::{Error, FetchError, Result};

/// Header the API reads the credential from.
pub const TOKEN_HEADER: &str = "X-Riot-Token";

/// Transport boundary: performs one request and returns the parsed body.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Fetcher: Send + Sync {
  async fn fetch(&self, request: &RequestDescriptor) -> std::result::Result<Value, FetchError>;
}

/// reqwest-backed fetcher
#[derive(Clone)]
pub struct HttpFetcher {
  client: reqwest::Client,
}

impl HttpFetcher {
  pub fn new() -> Result<Self> {
    let client = reqwest::Client::builder()
      .user_agent(concat!("tft-query/", env!("CARGO_PKG_VERSION")))
      .timeout(Duration::from_secs(30))
      .build()
      .map_err(|e| Error::configuration(format!("Failed to create HTTP client: {}", e)))?;

    Ok(Self { client })
  }

  /// Use a preconfigured client (proxies, custom timeouts).
  pub fn with_client(client: reqwest::Client) -> Self {
    Self { client }
  }
}

#[async_trait]
impl Fetcher for HttpFetcher {
  async fn fetch(&self, request: &RequestDescriptor) -> std::result::Result<Value, FetchError> {
    debug!(url = %request.url, "GET");

    let response = self
      .client
      .get(request.url.clone())
      .header(TOKEN_HEADER, request.credential())
      .send()
      .await?;

    let status = response.status();
    if !status.is_success() {
      return Err(FetchError::Status {
        status: status.as_u16(),
        url: request.url.to_string(),
      });
    }

    let body = response.bytes().await?;
    serde_json::from_slice(&body).map_err(|e| FetchError::Decode(e.to_string()))
  }
}
