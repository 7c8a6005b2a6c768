//! Error types for playback management

use thiserror::Error;

/// Track could not be turned into something playable
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    /// Service answered but gave no playable URL
    #[error("No playable URL for track")]
    NoPlayableUrl,

    /// Service does not know the track
    #[error("Track not found: {0}")]
    NotFound(String),

    /// Service could not be reached or refused the request
    #[error("Track service unavailable: {0}")]
    Unavailable(String),
}

/// Transport refused a command (broken media, codec or network error)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Transport error: {0}")]
pub struct TransportError(pub String);

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Persistence failures
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Player errors
#[derive(Debug, Error)]
pub enum PlayerError {
    /// Track resolution failed; nothing was changed
    #[error("Resolution failed: {0}")]
    Resolution(#[from] ResolutionError),

    /// Transport could not start playback; the track stays loaded
    #[error("Playback failed: {0}")]
    Playback(#[from] TransportError),

    /// A newer play request was issued before this one resolved
    #[error("Play request superseded by a newer one")]
    Superseded,

    /// Explicit index request outside the queue
    #[error("Index out of bounds: {0}")]
    IndexOutOfBounds(usize),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Result type for player operations
pub type Result<T> = std::result::Result<T, PlayerError>;
