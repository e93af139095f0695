//! Typed error definitions for the TSE option data system.
//!
//! Every data source and view returns [`TseError`] so callers can tell a
//! transport hiccup from a malformed payload or a caller mistake. The runner
//! binary wraps these in `anyhow` at the top level.

use thiserror::Error;

/// Domain-specific errors for the TSE option data system.
#[derive(Debug, Error)]
pub enum TseError {
    /// Non-2xx HTTP status or connection failure. Never retried internally.
    #[error("transport error: {0}")]
    Transport(String),

    /// Response JSON is missing expected keys or has the wrong shape.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The streaming `start` call did not answer `"started"`.
    #[error("handshake failed: {0}")]
    HandshakeFailed(String),

    /// The update batch has no record tagged with the requested market.
    #[error("unknown market: {0}")]
    UnknownMarket(String),

    /// Nothing has been fetched yet (or the source returned no rows).
    #[error("no data: {0}")]
    EmptyData(String),

    /// Underlying-asset code is not present in the snapshot.
    #[error("invalid underlying: {0}")]
    InvalidUnderlying(String),

    /// Caller passed a code, market name or date outside the known set.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Session token failed validation at assignment time.
    #[error("invalid token: {0}")]
    InvalidToken(String),

    /// Configuration parsing or validation error.
    #[error("config error: {0}")]
    Config(String),
}

/// Convenience alias used across the workspace.
pub type Result<T> = std::result::Result<T, TseError>;

impl From<serde_json::Error> for TseError {
    fn from(e: serde_json::Error) -> Self {
        Self::MalformedResponse(e.to_string())
    }
}
