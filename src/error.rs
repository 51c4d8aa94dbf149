//! Error types for tft-query.

use thiserror::Error;

/// Result type for tft-query operations
pub type Result<T> = std::result::Result<T, Error>;

/// Broad category of an [`Error`], for callers that branch on kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  /// A required payload field was missing or malformed. Raised before any I/O.
  Validation,
  /// The remote call failed or returned something unusable.
  Transport,
  /// The cache backend failed.
  Cache,
  /// The session is not configured for the requested operation.
  Configuration,
}

/// Errors returned by a query session.
#[derive(Debug, Error)]
pub enum Error {
  #[error("{method} requires `{field}` in the payload")]
  MissingField {
    method: &'static str,
    field: &'static str,
  },

  #[error("{method} received an invalid `{field}`: {reason}")]
  InvalidField {
    method: &'static str,
    field: &'static str,
    reason: String,
  },

  #[error("{operation} failed: {source}")]
  Transport {
    operation: &'static str,
    #[source]
    source: FetchError,
  },

  #[error("cache {operation} failed: {message}")]
  Cache {
    operation: &'static str,
    message: String,
  },

  #[error("{0}")]
  Configuration(String),
}

impl Error {
  pub fn kind(&self) -> ErrorKind {
    match self {
      Self::MissingField { .. } | Self::InvalidField { .. } => ErrorKind::Validation,
      Self::Transport { .. } => ErrorKind::Transport,
      Self::Cache { .. } => ErrorKind::Cache,
      Self::Configuration(_) => ErrorKind::Configuration,
    }
  }

  /// Create a Cache error with operation context.
  pub fn cache(operation: &'static str, message: impl ToString) -> Self {
    Self::Cache {
      operation,
      message: message.to_string(),
    }
  }

  /// Create a Configuration error.
  pub fn configuration(message: impl ToString) -> Self {
    Self::Configuration(message.to_string())
  }
}

/// Failures at the transport boundary.
#[derive(Debug, Error)]
pub enum FetchError {
  #[error("{url} returned HTTP {status}")]
  Status { status: u16, url: String },

  #[error("network error: {0}")]
  Network(#[from] reqwest::Error),

  #[error("malformed response body: {0}")]
  Decode(String),

  #[error("unexpected response shape: {0}")]
  UnexpectedShape(String),
}

impl FetchError {
  /// HTTP status code, when the remote answered with one.
  pub fn status(&self) -> Option<u16> {
    match self {
      Self::Status { status, .. } => Some(*status),
      Self::Network(e) => e.status().map(|s| s.as_u16()),
      _ => None,
    }
  }
}
