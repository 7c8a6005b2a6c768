//! Clock-driven transport without audio output
//!
//! Behaves like a media element: loading resets the playhead and reports
//! metadata, reaching the end pauses and reports `Ended`. Time only moves
//! when [`SimulatedTransport::advance`] is called, which keeps tests and the
//! headless CLI deterministic.

use crate::error::TransportError;
use crate::transport::{Transport, TransportEvent};
use std::collections::{HashMap, HashSet};

/// Duration reported for media with no configured length (3 minutes)
pub const DEFAULT_MEDIA_DURATION_MS: u64 = 180_000;

/// Simulated transport
#[derive(Debug, Clone)]
pub struct SimulatedTransport {
    source: Option<String>,
    paused: bool,
    position_ms: u64,
    duration_ms: Option<u64>,
    volume: f32,
    muted: bool,

    /// Known media lengths by URL
    durations: HashMap<String, u64>,
    default_duration_ms: u64,

    /// URLs whose playback start fails
    broken: HashSet<String>,

    /// Every URL ever loaded, in order
    load_log: Vec<String>,

    events: Vec<TransportEvent>,
}

impl SimulatedTransport {
    pub fn new() -> Self {
        Self {
            source: None,
            paused: true,
            position_ms: 0,
            duration_ms: None,
            volume: 1.0,
            muted: false,
            durations: HashMap::new(),
            default_duration_ms: DEFAULT_MEDIA_DURATION_MS,
            broken: HashSet::new(),
            load_log: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Report `duration_ms` for media at `url`
    pub fn with_duration(mut self, url: impl Into<String>, duration_ms: u64) -> Self {
        self.durations.insert(url.into(), duration_ms);
        self
    }

    /// Length used for URLs without an explicit duration
    pub fn with_default_duration(mut self, duration_ms: u64) -> Self {
        self.default_duration_ms = duration_ms;
        self
    }

    /// Make playback of `url` fail, as a broken file would
    pub fn with_broken_media(mut self, url: impl Into<String>) -> Self {
        self.broken.insert(url.into());
        self
    }

    /// Let `elapsed_ms` of wall time pass
    ///
    /// While playing, the playhead moves and `PositionChanged` is queued.
    /// Reaching the end queues `Paused` followed by `Ended`.
    pub fn advance(&mut self, elapsed_ms: u64) {
        if self.paused || self.source.is_none() {
            return;
        }

        let duration = self.duration_ms.unwrap_or(self.default_duration_ms);
        self.position_ms = self.position_ms.saturating_add(elapsed_ms).min(duration);
        self.events.push(TransportEvent::PositionChanged {
            position_ms: self.position_ms,
        });

        if self.position_ms >= duration {
            self.paused = true;
            self.events.push(TransportEvent::Paused);
            self.events.push(TransportEvent::Ended);
        }
    }

    /// Queue an asynchronous media failure
    pub fn fail(&mut self, message: impl Into<String>) {
        self.paused = true;
        self.events.push(TransportEvent::Error {
            message: message.into(),
        });
    }

    /// URL of the loaded source
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Every URL loaded so far, oldest first
    pub fn load_log(&self) -> &[String] {
        &self.load_log
    }

    /// Number of queued, undelivered events
    pub fn pending_events(&self) -> usize {
        self.events.len()
    }
}

impl Default for SimulatedTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for SimulatedTransport {
    fn load(&mut self, url: &str) {
        if !self.paused {
            self.paused = true;
            self.events.push(TransportEvent::Paused);
        }

        let duration = self
            .durations
            .get(url)
            .copied()
            .unwrap_or(self.default_duration_ms);

        self.source = Some(url.to_string());
        self.position_ms = 0;
        self.duration_ms = Some(duration);
        self.load_log.push(url.to_string());
        self.events.push(TransportEvent::MetadataLoaded {
            duration_ms: duration,
        });
    }

    fn play(&mut self) -> Result<(), TransportError> {
        let Some(ref source) = self.source else {
            return Err(TransportError::new("No source loaded"));
        };

        if self.broken.contains(source) {
            return Err(TransportError::new(format!(
                "Media format not supported: {}",
                source
            )));
        }

        if self.paused {
            // Replaying finished media starts over
            if Some(self.position_ms) == self.duration_ms {
                self.position_ms = 0;
            }
            self.paused = false;
            self.events.push(TransportEvent::Started);
        }
        Ok(())
    }

    fn pause(&mut self) {
        if !self.paused {
            self.paused = true;
            self.events.push(TransportEvent::Paused);
        }
    }

    fn seek(&mut self, position_ms: u64) {
        if self.source.is_none() {
            return;
        }
        let duration = self.duration_ms.unwrap_or(self.default_duration_ms);
        self.position_ms = position_ms.min(duration);
        self.events.push(TransportEvent::PositionChanged {
            position_ms: self.position_ms,
        });
    }

    fn clear(&mut self) {
        self.pause();
        self.source = None;
        self.position_ms = 0;
        self.duration_ms = None;
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
    }

    fn volume(&self) -> f32 {
        self.volume
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn is_muted(&self) -> bool {
        self.muted
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn has_source(&self) -> bool {
        self.source.is_some()
    }

    fn position_ms(&self) -> u64 {
        self.position_ms
    }

    fn duration_ms(&self) -> Option<u64> {
        self.duration_ms
    }

    fn take_events(&mut self) -> Vec<TransportEvent> {
        std::mem::take(&mut self.events)
    }
}
