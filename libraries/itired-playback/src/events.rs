//! Player Events
//!
//! Event-based communication for UI synchronization. The controller queues
//! events as its state changes; the UI drains them with
//! `PlayerController::drain_events` and re-renders.

use crate::types::{RepeatMode, TrackId};
use serde::{Deserialize, Serialize};

/// Events emitted by the player controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlayerEvent {
    /// Playing / paused flag changed
    StateChanged {
        is_playing: bool,
    },

    /// A different track was loaded into the transport
    TrackChanged {
        /// ID of the new (current) track
        track_id: TrackId,
        /// ID of the previous track (if any)
        previous_track_id: Option<TrackId>,
    },

    /// Playhead moved
    PositionUpdate {
        position_ms: u64,
        duration_ms: u64,
    },

    /// Media duration became known
    DurationChanged {
        duration_ms: u64,
    },

    /// Volume or mute changed
    VolumeChanged {
        /// New volume level (0.0-1.0)
        volume: f32,
        /// Whether audio is muted
        muted: bool,
    },

    /// Queue changed (tracks added/removed/reordered/cleared)
    QueueChanged {
        /// New queue length
        length: usize,
        current_index: Option<usize>,
    },

    /// Repeat or shuffle toggled
    ModeChanged {
        repeat_mode: RepeatMode,
        shuffled: bool,
    },

    /// Current track finished playing naturally
    TrackFinished {
        track_id: TrackId,
    },

    /// User-visible failure notice (resolution or playback error)
    Notification {
        message: String,
    },
}
