//! Error types for hubwire.

use thiserror::Error;

use crate::element::Element;

/// Main error type for hubwire operations.
#[derive(Error, Debug)]
pub enum Error {
    /// The API returned a response this client cannot interpret
    /// (unrecognized content type, unparseable link header). Usually a
    /// client/API version mismatch.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// The API explicitly reported failure via the HTTP status code.
    /// The payload carries the parsed error body for inspection.
    #[error("API error: status {status}")]
    Api { status: u16, payload: Element },

    /// Network-level failure from the HTTP client (DNS, timeout,
    /// connection reset, TLS). Propagated unchanged, never retried here.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Response body declared as JSON but failed to decode
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias for hubwire operations.
pub type Result<T> = std::result::Result<T, Error>;
