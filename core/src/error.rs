//! Error types for request resolution and execution.
//!
//! # Design
//! Failures never escape the fluent chain as panics or early returns; they
//! are recorded on the client and read back through accessors. `InvalidUri`
//! gets a dedicated variant because execution is skipped entirely for it,
//! while `Protocol` and `Io` mirror the two transport-level failure classes.

use std::fmt;
use std::io;

/// Errors recorded by `RestClient` when URI resolution or transport
/// execution fails.
#[derive(Debug)]
pub enum TransportError {
    /// The locator could not be parsed into a usable URI.
    InvalidUri(http::uri::InvalidUri),

    /// The transport rejected the request at the HTTP/protocol level.
    Protocol(String),

    /// An I/O failure occurred while connecting, sending or receiving.
    Io(io::Error),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::InvalidUri(e) => write!(f, "invalid URI: {e}"),
            TransportError::Protocol(msg) => write!(f, "protocol error: {msg}"),
            TransportError::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for TransportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TransportError::InvalidUri(e) => Some(e),
            TransportError::Io(e) => Some(e),
            TransportError::Protocol(_) => None,
        }
    }
}
