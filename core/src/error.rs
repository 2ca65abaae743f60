//! Error types for the shortener API client.
//!
//! # Design
//! "The service answered but had nothing for us" is not an error: it is an
//! `Ok` reply with no value. Only faults the caller may want to react to
//! differently (network trouble, unreadable bodies, bad configuration) are
//! `ApiError` variants.

use thiserror::Error;

/// Errors returned by `ShortenerClient` and its transports.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (DNS, connect, timeout, I/O).
    #[error("transport failed: {0}")]
    Transport(String),

    /// The server returned a non-2xx status and a body that is not JSON.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// A 2xx response body could not be decoded as JSON.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
