//! itired - Playback Queue & Transport Controller
//!
//! Platform-agnostic playback control for the itired music client.
//!
//! This crate provides:
//! - An ordered, duplicate-free play queue with a cursor
//! - Track resolution (`service` + `track_id` -> playable URL)
//! - Transport control (play/pause/seek/volume/mute)
//! - Repeat modes (None, One, All) and pinned shuffle
//! - Recently-played history and a persisted volume preference
//!
//! # Architecture
//!
//! `itired-playback` never touches audio or the network itself:
//! - Audio output sits behind the [`Transport`] trait
//! - Track lookup sits behind the [`TrackResolver`] trait
//! - Persistence sits behind the [`PlayerStore`] trait
//!
//! [`SimulatedTransport`], [`CatalogResolver`] and [`MemoryStore`] are the
//! in-process implementations used by tests and offline sessions.
//!
//! # Example: Basic Playback
//!
//! ```rust
//! use itired_playback::{
//!     CatalogResolver, MemoryStore, PlayerConfig, PlayerController, ResolvedTrack,
//!     SimulatedTransport, TrackRef,
//! };
//! use std::sync::Arc;
//!
//! let resolver = CatalogResolver::new().with_track(
//!     TrackRef::new("yandex", "42"),
//!     ResolvedTrack {
//!         url: "https://cdn.example.com/42.mp3".to_string(),
//!         title: "My Song".to_string(),
//!         artists: vec!["Artist Name".to_string()],
//!         cover_uri: None,
//!         duration_ms: 180_000,
//!     },
//! );
//!
//! let mut player = PlayerController::new(
//!     SimulatedTransport::new(),
//!     Arc::new(resolver),
//!     Box::new(MemoryStore::new(50)),
//!     PlayerConfig::default(),
//! );
//!
//! // Resolve outside the controller, then hand the result back
//! let ticket = player.begin_resolution("yandex", "42");
//! let resolved = ResolvedTrack {
//!     url: "https://cdn.example.com/42.mp3".to_string(),
//!     title: "My Song".to_string(),
//!     artists: vec!["Artist Name".to_string()],
//!     cover_uri: None,
//!     duration_ms: 180_000,
//! };
//! player.complete_resolution(ticket, Ok(resolved), true).unwrap();
//! player.pump_transport_events().unwrap();
//!
//! assert!(player.state().is_playing);
//! assert_eq!(player.current_index(), Some(0));
//! ```
//!
//! # Example: Shuffle and Repeat
//!
//! ```rust
//! use itired_playback::{
//!     CatalogResolver, MemoryStore, PlayerConfig, PlayerController, RepeatMode,
//!     SimulatedTransport,
//! };
//! use std::sync::Arc;
//!
//! let mut player = PlayerController::new(
//!     SimulatedTransport::new(),
//!     Arc::new(CatalogResolver::new()),
//!     Box::new(MemoryStore::new(50)),
//!     PlayerConfig::default(),
//! );
//!
//! assert!(player.toggle_shuffle());
//! player.set_repeat(RepeatMode::All);
//! assert_eq!(player.toggle_repeat(), RepeatMode::None);
//! ```

mod controller;
mod error;
mod events;
pub mod history;
mod queue;
mod resolver;
mod shuffle;
mod simulated;
mod store;
mod transport;
pub mod types;
mod volume;

// Public exports
pub use controller::{PlayerController, ResolutionTicket};
pub use error::{PlayerError, ResolutionError, Result, StoreError, TransportError};
pub use events::PlayerEvent;
pub use history::{HistoryEntry, RecentlyPlayed, DEFAULT_HISTORY_LIMIT};
pub use queue::{Queue, Step};
pub use resolver::{CatalogResolver, TrackResolver};
pub use shuffle::shuffle_pinned;
pub use simulated::{SimulatedTransport, DEFAULT_MEDIA_DURATION_MS};
pub use store::{JsonFileStore, MemoryStore, PlayerStore, StoreResult};
pub use transport::{Transport, TransportEvent};
pub use types::{
    PlayerConfig, PlayerSnapshot, RepeatMode, ResolvedTrack, Track, TrackId, TrackRef,
    TransportState,
};
pub use volume::Volume;
