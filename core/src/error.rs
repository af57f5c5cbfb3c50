//! Error types for the todo API client.
//!
//! # Design
//! Callers only need to tell two failure families apart: the request never
//! produced a response (`Transport`), or it produced one outside the 2xx
//! range (`HttpStatus`). Body encoding and decoding failures are kept
//! separate so a misbehaving backend is not mistaken for an outage in logs.

use thiserror::Error;

/// Errors returned by `TodoClient` parse methods and `RemoteClient` calls.
#[derive(Debug, Error)]
pub enum RequestError {
    /// The HTTP round-trip could not complete (DNS, refused connection,
    /// timeout).
    #[error("transport failure: {0}")]
    Transport(String),

    /// The server answered with a status outside 2xx.
    #[error("HTTP error! status: {status}")]
    HttpStatus { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Decode(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Encode(String),
}

impl RequestError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}
