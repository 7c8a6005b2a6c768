//! Catalogue operations: playlists, liked tracks, listening history.

use crate::client::ItiredClient;
use crate::error::Result;
use crate::types::{CatalogTrack, HistoryPage, Playlist};
use tracing::debug;

/// Default page size of `/api/history`.
pub const DEFAULT_HISTORY_PAGE_SIZE: u32 = 20;

/// Catalogue client borrowed from an [`ItiredClient`].
pub struct CatalogClient<'a> {
    client: &'a ItiredClient,
}

impl<'a> CatalogClient<'a> {
    pub(crate) fn new(client: &'a ItiredClient) -> Self {
        Self { client }
    }

    /// Get a playlist with its tracks.
    pub async fn playlist(&self, service: &str, playlist_id: &str) -> Result<Playlist> {
        let path = format!("/api/playlist/{}_{}", service, playlist_id);
        debug!(service = %service, playlist_id = %playlist_id, "Fetching playlist");

        let playlist: Playlist = self.client.get_json(&path, "playlist").await?;

        debug!(
            title = %playlist.title,
            tracks = playlist.tracks.len(),
            "Fetched playlist"
        );
        Ok(playlist)
    }

    /// Get the liked tracks of the configured music service.
    pub async fn liked(&self) -> Result<Vec<CatalogTrack>> {
        debug!("Fetching liked tracks");
        let tracks: Vec<CatalogTrack> = self.client.get_json("/api/liked", "liked").await?;
        debug!(tracks = tracks.len(), "Fetched liked tracks");
        Ok(tracks)
    }

    /// Get one page of the server-side listening history (pages start at 1).
    pub async fn history(&self, page: u32, per_page: u32) -> Result<HistoryPage> {
        let path = format!("/api/history?page={}&per_page={}", page.max(1), per_page);
        debug!(page, per_page, "Fetching listening history");
        self.client.get_json(&path, "history").await
    }
}
