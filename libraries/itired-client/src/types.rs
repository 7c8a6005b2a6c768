//! Types for itired platform API requests and responses.

use chrono::NaiveDateTime;
use itired_playback::{ResolvedTrack, TrackRef};
use serde::{Deserialize, Serialize};

/// Configuration for connecting to the itired platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the platform (e.g., "https://itired.example.com")
    pub url: String,
    /// Value of the `session` cookie of a logged-in browser session
    #[serde(default)]
    pub session_cookie: Option<String>,
}

impl ClientConfig {
    /// Create a new config with just the URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            session_cookie: None,
        }
    }

    /// Create a config reusing an existing session.
    pub fn with_session(url: impl Into<String>, session_cookie: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            session_cookie: Some(session_cookie.into()),
        }
    }
}

// =============================================================================
// Playback Types
// =============================================================================

/// Response from `/api/play/<service>_<id>`.
#[derive(Debug, Clone, Deserialize)]
pub struct PlayResponse {
    #[serde(default)]
    pub url: Option<String>,
    pub title: String,
    #[serde(default)]
    pub artists: Vec<String>,
    /// Duration in milliseconds
    #[serde(default)]
    pub duration: u64,
    #[serde(default)]
    pub cover_uri: Option<String>,
}

impl PlayResponse {
    /// Convert into a resolution result, `None` if there is nothing to play
    pub fn into_resolved(self) -> Option<ResolvedTrack> {
        let url = self.url.filter(|u| !u.trim().is_empty())?;
        Some(ResolvedTrack {
            url,
            title: self.title,
            artists: self.artists,
            cover_uri: self.cover_uri,
            duration_ms: self.duration,
        })
    }
}

// =============================================================================
// Catalogue Types
// =============================================================================

/// Track listed in a playlist or the liked list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogTrack {
    /// Composite id (`yandex_123`)
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub artists: Vec<String>,
    /// Duration in milliseconds
    #[serde(default)]
    pub duration: u64,
    #[serde(default)]
    pub cover_uri: Option<String>,
    #[serde(default)]
    pub service: Option<String>,
}

impl CatalogTrack {
    /// Reference for resolving this track, if its id is well formed
    pub fn reference(&self) -> Option<TrackRef> {
        TrackRef::parse(&self.id)
    }
}

/// Response from `/api/playlist/<service>_<id>`.
#[derive(Debug, Clone, Deserialize)]
pub struct Playlist {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub track_count: u32,
    #[serde(default)]
    pub cover_uri: Option<String>,
    #[serde(default)]
    pub tracks: Vec<CatalogTrack>,
    pub service: String,
}

impl Playlist {
    /// References of every well-formed track, in playlist order
    pub fn references(&self) -> Vec<TrackRef> {
        self.tracks.iter().filter_map(CatalogTrack::reference).collect()
    }
}

// =============================================================================
// History Types
// =============================================================================

/// Track metadata stored with a server-side history entry.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryTrackData {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub artists: Vec<String>,
    #[serde(default)]
    pub duration: Option<u64>,
    #[serde(default)]
    pub service: Option<String>,
}

/// One server-side listening history entry.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerHistoryEntry {
    pub id: i64,
    /// Composite id (`vk_456`)
    pub track_id: String,
    #[serde(default)]
    pub track_data: HistoryTrackData,
    /// Naive UTC timestamp
    #[serde(default)]
    pub played_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub service: Option<String>,
}

/// Response from `/api/history`.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryPage {
    pub history: Vec<ServerHistoryEntry>,
    pub total: u64,
    pub pages: u64,
    pub current_page: u64,
}

// =============================================================================
// Health
// =============================================================================

/// Response from `/health`.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub database: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

/// Error body returned by the platform.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn play_response_without_url_is_not_playable() {
        let body: PlayResponse = serde_json::from_str(
            r#"{"title": "Song", "artists": ["A"], "duration": 1000, "cover_uri": null}"#,
        )
        .unwrap();
        assert!(body.into_resolved().is_none());
    }

    #[test]
    fn play_response_converts_duration() {
        let body: PlayResponse = serde_json::from_str(
            r#"{"url": "https://cdn/x.mp3", "title": "Song", "artists": ["A", "B"], "duration": 215000}"#,
        )
        .unwrap();
        let resolved = body.into_resolved().unwrap();
        assert_eq!(resolved.duration_ms, 215_000);
        assert_eq!(resolved.artists, vec!["A", "B"]);
        assert_eq!(resolved.cover_uri, None);
    }

    #[test]
    fn playlist_skips_malformed_ids() {
        let playlist: Playlist = serde_json::from_str(
            r#"{
                "id": "vk_7", "title": "Mix", "track_count": 3, "service": "vk",
                "tracks": [
                    {"id": "vk_1_2", "title": "One", "artists": ["X"], "duration": 1000},
                    {"id": "broken", "title": "Two", "artists": [], "duration": 0},
                    {"id": "vk_3", "title": "Three", "artists": ["Y"], "duration": 3000}
                ]
            }"#,
        )
        .unwrap();

        let refs = playlist.references();
        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0], TrackRef::new("vk", "1_2"));
        assert_eq!(refs[1], TrackRef::new("vk", "3"));
    }

    #[test]
    fn history_entry_parses_naive_timestamp() {
        let entry: ServerHistoryEntry = serde_json::from_str(
            r#"{
                "id": 12, "track_id": "yandex_5",
                "track_data": {"title": "Five", "artists": ["Z"], "duration": 5000, "service": "yandex"},
                "played_at": "2024-03-01T10:15:30.123456", "service": "yandex"
            }"#,
        )
        .unwrap();

        assert_eq!(entry.track_data.title.as_deref(), Some("Five"));
        assert!(entry.played_at.is_some());
    }
}
