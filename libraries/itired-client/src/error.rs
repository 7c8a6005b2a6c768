//! Error types for the itired API client.

use itired_playback::ResolutionError;
use thiserror::Error;

/// Errors that can occur when talking to the itired platform API.
#[derive(Error, Debug)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server returned an error response
    #[error("Server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    /// No session, or the session expired
    #[error("Authentication required")]
    AuthRequired,

    /// Track, playlist or route does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by server
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Invalid server URL
    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),

    /// Failed to parse server response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Server is offline or unreachable
    #[error("Server unreachable: {0}")]
    ServerUnreachable(String),
}

impl ClientError {
    /// Map a transport-level reqwest failure
    pub(crate) fn from_send(error: reqwest::Error) -> Self {
        if error.is_connect() || error.is_timeout() {
            ClientError::ServerUnreachable(error.to_string())
        } else {
            ClientError::Request(error)
        }
    }
}

impl From<ClientError> for ResolutionError {
    fn from(error: ClientError) -> Self {
        match error {
            ClientError::NotFound(message) => ResolutionError::NotFound(message),
            other => ResolutionError::Unavailable(other.to_string()),
        }
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
