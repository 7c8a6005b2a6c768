//! itired Platform Client
//!
//! HTTP client library for the itired platform REST API.
//!
//! # Features
//!
//! - **Track resolution**: turn `service` + `track_id` into a playable URL,
//!   usable directly as the player's [`itired_playback::TrackResolver`]
//! - **Catalogue**: playlists, liked tracks, paginated listening history
//! - **Health**: platform liveness check
//!
//! # Example
//!
//! ```ignore
//! use itired_client::{ClientConfig, ItiredClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::with_session("https://itired.example.com", "session-cookie");
//!     let client = ItiredClient::new(config)?;
//!
//!     let health = client.health().await?;
//!     println!("Platform is {}", health.status);
//!
//!     let liked = client.catalog().liked().await?;
//!     println!("{} liked tracks", liked.len());
//!
//!     Ok(())
//! }
//! ```

mod catalog;
mod client;
mod error;
mod types;

// Re-export main types
pub use catalog::{CatalogClient, DEFAULT_HISTORY_PAGE_SIZE};
pub use client::ItiredClient;
pub use error::{ClientError, Result};
pub use types::{
    CatalogTrack, ClientConfig, HealthStatus, HistoryPage, HistoryTrackData, PlayResponse,
    Playlist, ServerHistoryEntry,
};
