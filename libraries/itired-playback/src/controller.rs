//! Player controller - core orchestration
//!
//! Owns the queue and the transport state, drives the single transport,
//! and applies the repeat/shuffle policy when tracks end.

use crate::{
    error::{PlayerError, ResolutionError, Result},
    events::PlayerEvent,
    history::HistoryEntry,
    queue::{Queue, Step},
    resolver::TrackResolver,
    store::PlayerStore,
    transport::{Transport, TransportEvent},
    types::{
        clamp_unit, PlayerConfig, PlayerSnapshot, RepeatMode, ResolvedTrack, Track, TrackRef,
        TransportState,
    },
    volume::Volume,
};
use chrono::Utc;
use rand::Rng;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Identifies one in-flight `play_track` resolution
///
/// Only the most recently issued ticket may complete; older ones are
/// superseded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionTicket {
    generation: u64,
    reference: TrackRef,
}

/// Playback queue and transport controller
///
/// Constructed once per session and handed to whatever issues commands.
/// Every operation takes `&mut self`, so each one is atomic with respect
/// to queue and state mutation.
///
/// Orchestrates:
/// - Queue management (ordered, duplicate-free, with a cursor)
/// - Transport commands (load/play/pause/seek/volume/mute)
/// - Repeat modes (None, One, All) and pinned shuffle
/// - Volume preference and recently-played history via the store
pub struct PlayerController<T: Transport> {
    config: PlayerConfig,

    // Queue and the track loaded into the transport
    queue: Queue,
    current_track: Option<Track>,

    // UI-facing state
    state: TransportState,
    volume: Volume,

    // Collaborators
    transport: T,
    resolver: Arc<dyn TrackResolver>,
    store: Box<dyn PlayerStore>,

    // Generation of the newest play request
    latest_request: u64,

    // Event queue for UI synchronization
    pending_events: Vec<PlayerEvent>,
}

impl<T: Transport> PlayerController<T> {
    /// Create the controller for a session
    ///
    /// Volume comes from the stored preference, falling back to
    /// `config.default_volume`.
    pub fn new(
        mut transport: T,
        resolver: Arc<dyn TrackResolver>,
        store: Box<dyn PlayerStore>,
        config: PlayerConfig,
    ) -> Self {
        let volume = Volume::new(
            store
                .volume_preference()
                .unwrap_or(config.default_volume),
        );

        transport.set_volume(volume.level());
        transport.set_muted(false);

        info!(volume = volume.level(), "Player controller created");

        Self {
            state: TransportState::new(volume.level()),
            config,
            queue: Queue::new(),
            current_track: None,
            volume,
            transport,
            resolver,
            store,
            latest_request: 0,
            pending_events: Vec::new(),
        }
    }

    /// End the session: stop playback and hand the transport back
    pub fn dispose(mut self) -> T {
        self.transport.clear();
        info!(queued = self.queue.len(), "Player controller disposed");
        self.transport
    }

    // ===== Track Resolution =====

    /// Resolve and load a track, starting playback if `auto_play` is configured
    pub async fn play_track(&mut self, service: &str, track_id: &str) -> Result<()> {
        let auto_play = self.config.auto_play;
        self.play_track_with(service, track_id, auto_play).await
    }

    /// Resolve and load a track
    ///
    /// Empty queue: the queue becomes `[track]` with index 0. Otherwise the
    /// track is appended unless already queued; the index does not move.
    /// The track is loaded into the transport and recorded in history.
    ///
    /// # Errors
    /// * `Resolution` - nothing changed
    /// * `Playback` - track is loaded and queued but would not start
    /// * `Superseded` - a newer request was issued meanwhile
    pub async fn play_track_with(
        &mut self,
        service: &str,
        track_id: &str,
        auto_play: bool,
    ) -> Result<()> {
        let ticket = self.begin_resolution(service, track_id);
        let resolver = Arc::clone(&self.resolver);
        let result = resolver.resolve(service, track_id).await;
        self.complete_resolution(ticket, result, auto_play)
    }

    /// First half of `play_track`: claim a ticket
    ///
    /// Any ticket issued earlier becomes stale.
    pub fn begin_resolution(&mut self, service: &str, track_id: &str) -> ResolutionTicket {
        self.latest_request += 1;
        let reference = TrackRef::new(service, track_id);
        debug!(
            generation = self.latest_request,
            track_id = %reference.id(),
            "Resolution started"
        );
        ResolutionTicket {
            generation: self.latest_request,
            reference,
        }
    }

    /// Second half of `play_track`: apply a resolution result
    pub fn complete_resolution(
        &mut self,
        ticket: ResolutionTicket,
        result: std::result::Result<ResolvedTrack, ResolutionError>,
        auto_play: bool,
    ) -> Result<()> {
        if ticket.generation != self.latest_request {
            debug!(
                generation = ticket.generation,
                latest = self.latest_request,
                track_id = %ticket.reference.id(),
                "Dropping superseded resolution"
            );
            return Err(PlayerError::Superseded);
        }

        let resolved = match result {
            Ok(resolved) if resolved.url.trim().is_empty() => {
                return Err(self.resolution_failed(&ticket.reference, ResolutionError::NoPlayableUrl))
            }
            Ok(resolved) => resolved,
            Err(e) => return Err(self.resolution_failed(&ticket.reference, e)),
        };

        let track = Track::from_resolved(&ticket.reference, resolved);

        if self.queue.is_empty() {
            self.queue.reset_to(track.clone());
            self.emit_queue_changed();
        } else if self.queue.push(track.clone()) {
            self.emit_queue_changed();
        }

        self.load(track);

        if auto_play {
            self.start_playback()?;
        }
        Ok(())
    }

    /// Resolve references and append every playable one
    ///
    /// Failures are reported and skipped. Returns how many tracks were added.
    pub async fn enqueue_resolved(&mut self, references: &[TrackRef]) -> usize {
        let resolver = Arc::clone(&self.resolver);
        let mut tracks = Vec::with_capacity(references.len());

        for reference in references {
            match resolver.resolve(&reference.service, &reference.track_id).await {
                Ok(resolved) if !resolved.url.trim().is_empty() => {
                    tracks.push(Track::from_resolved(reference, resolved));
                }
                Ok(_) => {
                    let _ = self.resolution_failed(reference, ResolutionError::NoPlayableUrl);
                }
                Err(e) => {
                    let _ = self.resolution_failed(reference, e);
                }
            }
        }

        self.add_to_queue(tracks)
    }

    // ===== Playback Control =====

    /// Pause if playing, play if paused; no-op with nothing loaded
    pub fn toggle_play(&mut self) -> Result<()> {
        if !self.transport.has_source() {
            return Ok(());
        }

        if self.transport.is_paused() {
            self.start_playback()
        } else {
            self.transport.pause();
            Ok(())
        }
    }

    /// Skip to next track
    ///
    /// Past the end: wraps with `RepeatMode::All`, otherwise stays on the
    /// last track and pauses.
    pub fn next_track(&mut self) -> Result<()> {
        let wrap = self.state.repeat_mode == RepeatMode::All;

        match self.queue.step_forward(wrap) {
            Step::Empty => Ok(()),
            Step::Clamped(index) => {
                debug!(index, "End of queue reached");
                self.transport.pause();
                Ok(())
            }
            Step::Moved(index) | Step::Wrapped(index) => self.load_and_play(index),
        }
    }

    /// Go to previous track
    ///
    /// More than `restart_threshold_ms` into the current track restarts it
    /// instead. Before the start: wraps with `RepeatMode::All`, otherwise
    /// stays on the first track without reloading.
    pub fn prev_track(&mut self) -> Result<()> {
        if self.queue.is_empty() {
            return Ok(());
        }

        if self.transport.has_source()
            && self.transport.position_ms() > self.config.restart_threshold_ms
        {
            debug!(
                position_ms = self.transport.position_ms(),
                "Restarting current track"
            );
            self.seek_transport(0);
            return Ok(());
        }

        let wrap = self.state.repeat_mode == RepeatMode::All;
        match self.queue.step_back(wrap) {
            Step::Empty | Step::Clamped(_) => Ok(()),
            Step::Moved(index) | Step::Wrapped(index) => self.load_and_play(index),
        }
    }

    /// Apply the repeat policy after the current track finished
    pub fn on_track_ended(&mut self) -> Result<()> {
        match self.state.repeat_mode {
            RepeatMode::One => {
                if !self.transport.has_source() {
                    return Ok(());
                }
                self.seek_transport(0);
                self.start_playback()
            }
            RepeatMode::All | RepeatMode::None => self.next_track(),
        }
    }

    /// Jump to a queue index and play it
    pub fn skip_to(&mut self, index: usize) -> Result<()> {
        if !self.queue.select(index) {
            return Err(PlayerError::IndexOutOfBounds(index));
        }
        self.emit_queue_changed();
        self.load_and_play(index)
    }

    // ===== Seek =====

    /// Seek within the loaded track, clamped to its duration
    pub fn seek_to(&mut self, position_ms: u64) {
        if !self.transport.has_source() {
            return;
        }
        let target = position_ms.min(self.effective_duration());
        self.seek_transport(target);
    }

    /// Seek to a fraction (0.0-1.0) of the loaded track
    pub fn seek_to_percent(&mut self, fraction: f32) {
        let fraction = clamp_unit(fraction);
        let target = (self.effective_duration() as f64 * f64::from(fraction)).round() as u64;
        self.seek_to(target);
    }

    // ===== Volume =====

    /// Set volume, clamped to `[0, 1]`, and persist it
    ///
    /// Returns the stored value.
    pub fn set_volume(&mut self, volume: f32) -> f32 {
        let level = self.volume.set_level(volume);
        self.transport.set_volume(level);
        self.state.volume = level;

        if let Err(e) = self.store.set_volume_preference(level) {
            warn!(error = %e, "Failed to persist volume preference");
        }

        self.emit_volume_changed();
        level
    }

    /// Flip mute without touching the volume level; returns the new state
    pub fn toggle_mute(&mut self) -> bool {
        let muted = self.volume.toggle_mute();
        self.transport.set_muted(muted);
        self.state.muted = muted;
        self.emit_volume_changed();
        muted
    }

    // ===== Shuffle & Repeat =====

    /// Flip shuffle
    ///
    /// Enabling shuffles every track except the current one, which moves to
    /// index 0. Disabling keeps the shuffled order.
    pub fn toggle_shuffle(&mut self) -> bool {
        self.toggle_shuffle_with(&mut rand::thread_rng())
    }

    /// `toggle_shuffle` with a caller-provided random source
    pub fn toggle_shuffle_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        self.state.shuffled = !self.state.shuffled;

        if self.state.shuffled && self.queue.len() > 1 {
            self.queue.shuffle_with(rng);
            debug!(len = self.queue.len(), "Queue shuffled");
            self.emit_queue_changed();
        }

        self.emit_mode_changed();
        self.state.shuffled
    }

    /// Cycle None -> One -> All -> None; returns the new mode
    pub fn toggle_repeat(&mut self) -> RepeatMode {
        self.set_repeat(self.state.repeat_mode.cycle());
        self.state.repeat_mode
    }

    /// Set repeat mode
    pub fn set_repeat(&mut self, mode: RepeatMode) {
        self.state.repeat_mode = mode;
        self.emit_mode_changed();
    }

    // ===== Queue Management =====

    /// Append tracks without touching the index or playback
    ///
    /// Tracks whose id is already queued are skipped. Returns how many were
    /// added.
    pub fn add_to_queue(&mut self, tracks: impl IntoIterator<Item = Track>) -> usize {
        let added = self.queue.extend(tracks);
        if added > 0 {
            self.emit_queue_changed();
        }
        added
    }

    /// Remove one track from the queue
    ///
    /// Removing the loaded track loads the track now under the cursor and
    /// keeps playing if playback was running; with nothing under the cursor
    /// (or nothing left) the transport is cleared.
    pub fn remove_from_queue(&mut self, index: usize) -> Result<Track> {
        let removed = self
            .queue
            .remove(index)
            .ok_or(PlayerError::IndexOutOfBounds(index))?;
        self.emit_queue_changed();

        let was_loaded = self
            .current_track
            .as_ref()
            .is_some_and(|t| t.id == removed.id);
        if !was_loaded {
            return Ok(removed);
        }

        let was_playing = !self.transport.is_paused();
        match self.queue.current().cloned() {
            Some(next) => {
                debug!(removed = %removed.id, next = %next.id, "Loaded track removed");
                self.load(next);
                if was_playing && self.start_playback().is_err() {
                    debug!("Playback did not resume after removal");
                }
            }
            None => self.reset_transport(),
        }

        Ok(removed)
    }

    /// Empty the queue and stop the transport
    pub fn clear_queue(&mut self) {
        self.queue.clear();
        self.reset_transport();
        self.emit_queue_changed();
    }

    // ===== Transport Events =====

    /// Apply one transport event
    ///
    /// Each call is one atomic state transition.
    pub fn handle_transport_event(&mut self, event: TransportEvent) -> Result<()> {
        match event {
            TransportEvent::PositionChanged { position_ms } => {
                self.state.position_ms = position_ms;
                self.emit_position_update();
            }
            TransportEvent::MetadataLoaded { duration_ms } => {
                self.state.duration_ms = duration_ms;
                self.pending_events
                    .push(PlayerEvent::DurationChanged { duration_ms });
            }
            TransportEvent::Started => self.set_playing(true),
            TransportEvent::Paused => self.set_playing(false),
            TransportEvent::Ended => {
                if let Some(ref track) = self.current_track {
                    let track_id = track.id.clone();
                    debug!(track_id = %track_id, "Track ended");
                    self.pending_events.push(PlayerEvent::TrackFinished { track_id });
                }
                self.set_playing(false);
                return self.on_track_ended();
            }
            TransportEvent::Error { message } => {
                warn!(error = %message, "Transport reported an error");
                self.set_playing(false);
                self.notify(format!("Playback error: {}", message));
            }
        }
        Ok(())
    }

    /// Drain the transport's queued events in arrival order
    ///
    /// Events produced while handling (a track end loading the next one)
    /// are processed in the same call. Returns the first error.
    pub fn pump_transport_events(&mut self) -> Result<()> {
        let mut first_error = None;

        loop {
            let events = self.transport.take_events();
            if events.is_empty() {
                break;
            }
            for event in events {
                if let Err(e) = self.handle_transport_event(event) {
                    first_error.get_or_insert(e);
                }
            }
        }

        first_error.map_or(Ok(()), Err)
    }

    /// Let the runtime act on the transport, then deliver its events
    pub fn drive_transport<R>(&mut self, f: impl FnOnce(&mut T) -> R) -> Result<R> {
        let value = f(&mut self.transport);
        self.pump_transport_events()?;
        Ok(value)
    }

    // ===== State Queries =====

    /// Track loaded into the transport
    pub fn current_track(&self) -> Option<&Track> {
        self.current_track.as_ref()
    }

    /// Queue cursor
    pub fn current_index(&self) -> Option<usize> {
        self.queue.current_index()
    }

    /// Copy of the queue
    pub fn queue(&self) -> Vec<Track> {
        self.queue.to_vec()
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn state(&self) -> &TransportState {
        &self.state
    }

    pub fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            current_track: self.current_track.clone(),
            current_index: self.queue.current_index(),
            queue: self.queue.to_vec(),
            transport: self.state.clone(),
        }
    }

    /// Recently played, most recent first
    pub fn history(&self) -> Vec<HistoryEntry> {
        self.store.history()
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Take all pending UI events
    pub fn drain_events(&mut self) -> Vec<PlayerEvent> {
        std::mem::take(&mut self.pending_events)
    }

    pub fn has_pending_events(&self) -> bool {
        !self.pending_events.is_empty()
    }

    // ===== Internal =====

    fn load_and_play(&mut self, index: usize) -> Result<()> {
        let Some(track) = self.queue.get(index).cloned() else {
            return Ok(());
        };
        self.load(track);
        self.start_playback()
    }

    /// Load `track` into the transport and record it in history
    fn load(&mut self, track: Track) {
        info!(track_id = %track.id, title = %track.title, "Loading track");

        self.transport.load(&track.url);
        self.state.position_ms = 0;
        // Provisional until the transport reports metadata
        self.state.duration_ms = track.duration_ms;

        let entry = HistoryEntry::from_track(&track, Utc::now());
        if let Err(e) = self.store.append_history(entry) {
            warn!(error = %e, track_id = %track.id, "Failed to record history");
        }

        let previous_track_id = self.current_track.as_ref().map(|t| t.id.clone());
        self.pending_events.push(PlayerEvent::TrackChanged {
            track_id: track.id.clone(),
            previous_track_id,
        });
        self.current_track = Some(track);
    }

    fn start_playback(&mut self) -> Result<()> {
        self.transport.play().map_err(|e| {
            warn!(error = %e, "Transport refused to start playback");
            self.notify(format!("Could not start playback: {}", e));
            PlayerError::Playback(e)
        })
    }

    fn seek_transport(&mut self, position_ms: u64) {
        self.transport.seek(position_ms);
        self.state.position_ms = position_ms;
        self.emit_position_update();
    }

    fn reset_transport(&mut self) {
        self.transport.clear();
        self.current_track = None;
        self.state.position_ms = 0;
        self.state.duration_ms = 0;
        self.set_playing(false);
    }

    fn effective_duration(&self) -> u64 {
        self.transport
            .duration_ms()
            .unwrap_or(self.state.duration_ms)
    }

    fn resolution_failed(&mut self, reference: &TrackRef, error: ResolutionError) -> PlayerError {
        warn!(track_id = %reference.id(), error = %error, "Track resolution failed");
        self.notify(format!("Could not play {}: {}", reference.id(), error));
        PlayerError::Resolution(error)
    }

    fn set_playing(&mut self, is_playing: bool) {
        if self.state.is_playing != is_playing {
            self.state.is_playing = is_playing;
            self.pending_events
                .push(PlayerEvent::StateChanged { is_playing });
        }
    }

    fn notify(&mut self, message: String) {
        self.pending_events.push(PlayerEvent::Notification { message });
    }

    fn emit_queue_changed(&mut self) {
        self.pending_events.push(PlayerEvent::QueueChanged {
            length: self.queue.len(),
            current_index: self.queue.current_index(),
        });
    }

    fn emit_volume_changed(&mut self) {
        self.pending_events.push(PlayerEvent::VolumeChanged {
            volume: self.state.volume,
            muted: self.state.muted,
        });
    }

    fn emit_mode_changed(&mut self) {
        self.pending_events.push(PlayerEvent::ModeChanged {
            repeat_mode: self.state.repeat_mode,
            shuffled: self.state.shuffled,
        });
    }

    fn emit_position_update(&mut self) {
        self.pending_events.push(PlayerEvent::PositionUpdate {
            position_ms: self.state.position_ms,
            duration_ms: self.state.duration_ms,
        });
    }
}
