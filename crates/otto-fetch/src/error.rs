//! Error types for otto-fetch

use thiserror::Error;

/// Result type alias for otto-fetch operations
pub type Result<T> = std::result::Result<T, Error>;

/// Transport-level errors.
///
/// A non-2xx HTTP status is *not* an error at this layer: callers receive the
/// status inside [`crate::FetchResponse`] and decide for themselves. Only
/// failures to complete a request at all (sockets, timeouts, redirect loops,
/// unparseable URLs) surface here.
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP request failed before a response was obtained
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid URL format
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a new generic error
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}
