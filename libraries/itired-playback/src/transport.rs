//! Platform-agnostic audio transport
//!
//! Abstracts the single media-playback primitive the controller drives
//! (an HTML media element, a native player, the simulated transport, ...).

use crate::error::TransportError;
use serde::{Deserialize, Serialize};

/// Lifecycle events a transport reports back to the controller
///
/// Delivered one at a time, in arrival order, to
/// `PlayerController::handle_transport_event`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransportEvent {
    /// Playback position moved
    PositionChanged { position_ms: u64 },

    /// Media metadata became available
    MetadataLoaded { duration_ms: u64 },

    /// Playback actually started
    Started,

    /// Playback paused (including the implicit pause at end of media)
    Paused,

    /// Media played to the end
    Ended,

    /// Asynchronous media failure (network, codec)
    Error { message: String },
}

/// Single underlying playback primitive
///
/// Implementors own no queue logic; the controller decides what to load
/// and when.
pub trait Transport: Send {
    /// Replace the current source, position back to 0, paused
    fn load(&mut self, url: &str);

    /// Start or resume playback of the loaded source
    ///
    /// # Returns
    /// * `Err(_)` - media cannot be played (missing source, broken media)
    fn play(&mut self) -> Result<(), TransportError>;

    /// Pause playback (no-op when already paused)
    fn pause(&mut self);

    /// Move the playhead
    fn seek(&mut self, position_ms: u64);

    /// Stop playback and drop the source
    fn clear(&mut self);

    /// Set linear volume in `[0, 1]`
    fn set_volume(&mut self, volume: f32);

    fn volume(&self) -> f32;

    fn set_muted(&mut self, muted: bool);

    fn is_muted(&self) -> bool;

    /// True unless actively playing
    fn is_paused(&self) -> bool;

    /// Whether a source is loaded
    fn has_source(&self) -> bool;

    /// Current playhead position
    fn position_ms(&self) -> u64;

    /// Duration of the loaded media, once known
    fn duration_ms(&self) -> Option<u64>;

    /// Events queued since the last call, oldest first
    ///
    /// Push-based platforms deliver events directly and can keep the
    /// default empty implementation.
    fn take_events(&mut self) -> Vec<TransportEvent> {
        Vec::new()
    }
}
