/// CLI error types
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid command: {0}")]
    Command(String),

    #[error("No server configured (set server.url or ITIRED_SERVER__URL)")]
    Offline,

    #[error("Player error: {0}")]
    Player(#[from] itired_playback::PlayerError),

    #[error("Store error: {0}")]
    Store(#[from] itired_playback::StoreError),

    #[error("Client error: {0}")]
    Client(#[from] itired_client::ClientError),

    #[error("Catalogue error: {0}")]
    Catalog(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
