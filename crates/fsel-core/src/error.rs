//! Error taxonomy for fsel.
//!
//! Nothing here is fatal to the process. A [`QueryError`] is recovered by the
//! search controller (notify, keep the last good list); a [`ConfigError`]
//! only surfaces while loading settings.

use thiserror::Error;

/// A failed call to the remote query service.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QueryError {
    /// The request never produced a response (connect, I/O, timeout).
    #[error("transport error: {0}")]
    Transport(String),
    /// The server answered with a non-success status.
    #[error("server responded {status}: {body}")]
    Status { status: u16, body: String },
    /// The response body was not a collection we could read.
    #[error("could not decode response: {0}")]
    Decode(String),
    #[error("invalid request url: {0}")]
    InvalidUrl(String),
}

impl From<serde_json::Error> for QueryError {
    fn from(err: serde_json::Error) -> Self {
        QueryError::Decode(err.to_string())
    }
}

/// Settings could not be loaded or contain an unusable value.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Source(#[from] config::ConfigError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("invalid setting `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}
