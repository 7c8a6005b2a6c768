//! Core types for playback management

use serde::{Deserialize, Serialize};
use std::fmt;

/// Composite track key: source service tag + service-local id
///
/// Rendered as `<service>_<track_id>`, the same form the platform API uses
/// in its URLs (`/api/play/yandex_123`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(String);

impl TrackId {
    /// Build the composite id for a track of `service`
    pub fn new(service: &str, source_track_id: &str) -> Self {
        Self(format!("{service}_{source_track_id}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reference to a track on a streaming service, before resolution
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrackRef {
    /// Service tag (`yandex`, `vk`, ...)
    pub service: String,

    /// Service-local track id
    pub track_id: String,
}

impl TrackRef {
    pub fn new(service: impl Into<String>, track_id: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            track_id: track_id.into(),
        }
    }

    /// Split a composite `<service>_<track_id>` id
    ///
    /// The service tag ends at the first underscore; the track id may
    /// contain more (VK ids look like `371745461_456289486`).
    pub fn parse(composite: &str) -> Option<Self> {
        let (service, track_id) = composite.split_once('_')?;
        if service.is_empty() || track_id.is_empty() {
            return None;
        }
        Some(Self::new(service, track_id))
    }

    /// Composite id the resolved track will carry
    pub fn id(&self) -> TrackId {
        TrackId::new(&self.service, &self.track_id)
    }
}

/// What the track-resolution service returns for a reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedTrack {
    /// Playable media URL
    pub url: String,
    pub title: String,
    pub artists: Vec<String>,
    pub cover_uri: Option<String>,
    pub duration_ms: u64,
}

/// A resolved, playable track
///
/// Immutable once built. `id` is unique within a queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub id: TrackId,

    /// Service tag the track was resolved from
    pub service: String,

    /// Service-local track id
    pub source_track_id: String,

    /// Playable media URL
    pub url: String,

    pub title: String,

    /// Ordered artist names
    pub artists: Vec<String>,

    pub cover_uri: Option<String>,

    pub duration_ms: u64,
}

impl Track {
    /// Combine a reference with its resolution result
    pub fn from_resolved(reference: &TrackRef, resolved: ResolvedTrack) -> Self {
        Self {
            id: reference.id(),
            service: reference.service.clone(),
            source_track_id: reference.track_id.clone(),
            url: resolved.url,
            title: resolved.title,
            artists: resolved.artists,
            cover_uri: resolved.cover_uri,
            duration_ms: resolved.duration_ms,
        }
    }

    /// Artists joined for display ("A, B")
    pub fn artist_line(&self) -> String {
        self.artists.join(", ")
    }
}

/// Clamp a fraction into `[0, 1]`; NaN maps to 0
pub fn clamp_unit(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Repeat mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RepeatMode {
    /// Stop at the end of the queue
    #[default]
    None,

    /// Replay the current track
    One,

    /// Wrap around the whole queue
    All,
}

impl RepeatMode {
    /// Next mode in the None -> One -> All -> None cycle
    pub fn cycle(self) -> Self {
        match self {
            RepeatMode::None => RepeatMode::One,
            RepeatMode::One => RepeatMode::All,
            RepeatMode::All => RepeatMode::None,
        }
    }
}

/// UI-facing transport state
///
/// Fields are observed from transport events, never polled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportState {
    pub is_playing: bool,
    pub position_ms: u64,
    pub duration_ms: u64,

    /// Linear volume in `[0.0, 1.0]`
    pub volume: f32,
    pub muted: bool,
    pub repeat_mode: RepeatMode,
    pub shuffled: bool,
}

impl TransportState {
    pub(crate) fn new(volume: f32) -> Self {
        Self {
            is_playing: false,
            position_ms: 0,
            duration_ms: 0,
            volume,
            muted: false,
            repeat_mode: RepeatMode::None,
            shuffled: false,
        }
    }
}

/// Read-only copy of everything the UI renders
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    /// Track loaded into the transport
    pub current_track: Option<Track>,

    /// Queue cursor (`None` when nothing is selected)
    pub current_index: Option<usize>,

    pub queue: Vec<Track>,
    pub transport: TransportState,
}

/// Configuration for the player controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Volume used when no preference is stored (default: 0.8)
    pub default_volume: f32,

    /// Recently-played entries kept by the stores (default: 50)
    pub history_limit: usize,

    /// Past this position, "previous" restarts the track (default: 3000)
    pub restart_threshold_ms: u64,

    /// Start playback after `play_track` resolves (default: true)
    pub auto_play: bool,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            default_volume: 0.8,
            history_limit: 50,
            restart_threshold_ms: 3000,
            auto_play: true,
        }
    }
}
