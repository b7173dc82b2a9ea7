//! Error types for the profile API client.
//!
//! # Design
//! Error bodies are decoded defensively. A JSON body with a string `message`
//! becomes `Http` with that message, any other JSON body gets the endpoint's
//! fallback message, and a body that is not JSON at all lands in `Unknown`
//! with the raw text kept for debugging.

use crate::http::TransportError;

/// Errors surfaced by the gateway, the client operations and the session.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The request never completed.
    #[error("network failure: {0}")]
    Transport(String),

    /// The server answered with a non-2xx status.
    #[error("{message}")]
    Http { status: u16, message: String },

    /// Non-2xx status whose body was not JSON.
    #[error("unexpected HTTP {status} response")]
    Unknown { status: u16, body: String },

    /// A 2xx response body could not be decoded into the expected type.
    #[error("decoding response failed: {0}")]
    Decode(String),

    /// The request payload could not be serialized to JSON.
    #[error("serializing request failed: {0}")]
    Serialize(String),

    /// An authenticated operation was attempted without a token.
    #[error("No token found. Please log in.")]
    MissingToken,

    /// The token store could not be read or written.
    #[error("token storage failed: {0}")]
    Storage(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } | ApiError::Unknown { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}

impl From<TransportError> for ApiError {
    fn from(err: TransportError) -> Self {
        ApiError::Transport(err.0)
    }
}
