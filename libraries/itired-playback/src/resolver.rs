//! Track resolution
//!
//! Turns a `(service, track_id)` reference into a playable URL plus
//! metadata. The HTTP implementation lives in `itired-client`.

use crate::error::ResolutionError;
use crate::types::{ResolvedTrack, TrackRef};
use async_trait::async_trait;
use std::collections::HashMap;

/// Track-resolution service
#[async_trait]
pub trait TrackResolver: Send + Sync {
    /// Resolve one track
    ///
    /// # Errors
    /// `ResolutionError` when the track is unknown, the service is
    /// unreachable or no playable URL comes back.
    async fn resolve(
        &self,
        service: &str,
        track_id: &str,
    ) -> std::result::Result<ResolvedTrack, ResolutionError>;
}

/// Resolver backed by a fixed in-memory catalogue
///
/// Used for offline sessions and tests.
#[derive(Debug, Clone, Default)]
pub struct CatalogResolver {
    tracks: HashMap<TrackRef, ResolvedTrack>,
}

impl CatalogResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a catalogue entry
    pub fn insert(&mut self, reference: TrackRef, track: ResolvedTrack) {
        self.tracks.insert(reference, track);
    }

    pub fn with_track(mut self, reference: TrackRef, track: ResolvedTrack) -> Self {
        self.insert(reference, track);
        self
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

#[async_trait]
impl TrackResolver for CatalogResolver {
    async fn resolve(
        &self,
        service: &str,
        track_id: &str,
    ) -> std::result::Result<ResolvedTrack, ResolutionError> {
        let reference = TrackRef::new(service, track_id);
        let track = self
            .tracks
            .get(&reference)
            .ok_or_else(|| ResolutionError::NotFound(reference.id().to_string()))?;

        if track.url.trim().is_empty() {
            return Err(ResolutionError::NoPlayableUrl);
        }

        Ok(track.clone())
    }
}
