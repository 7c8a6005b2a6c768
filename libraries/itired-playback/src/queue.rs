//! Playback queue
//!
//! Ordered tracks plus a cursor. Invariants, upheld by every method:
//! - the cursor is `None` or a valid index
//! - no two tracks share an id

use crate::types::{Track, TrackId};

/// Outcome of moving the cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Cursor moved to a new index
    Moved(usize),

    /// Cursor ran off one end and wrapped to the other
    Wrapped(usize),

    /// Cursor stayed put at this index (end reached, no wrap)
    Clamped(usize),

    /// Queue is empty, nothing happened
    Empty,
}

impl Step {
    /// Index the cursor now points at, if it changed
    pub fn changed_to(self) -> Option<usize> {
        match self {
            Step::Moved(index) | Step::Wrapped(index) => Some(index),
            Step::Clamped(_) | Step::Empty => None,
        }
    }
}

/// Ordered track queue with a cursor
#[derive(Debug, Clone, Default)]
pub struct Queue {
    tracks: Vec<Track>,
    current: Option<usize>,
}

impl Queue {
    /// Create new empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a track unless its id is already queued
    ///
    /// Returns `true` if the track was added.
    pub fn push(&mut self, track: Track) -> bool {
        if self.contains(&track.id) {
            return false;
        }
        self.tracks.push(track);
        true
    }

    /// Append several tracks, skipping ids already queued
    ///
    /// Returns how many were added.
    pub fn extend(&mut self, tracks: impl IntoIterator<Item = Track>) -> usize {
        let mut added = 0;
        for track in tracks {
            if self.push(track) {
                added += 1;
            }
        }
        added
    }

    /// Replace the contents with a single selected track
    pub fn reset_to(&mut self, track: Track) {
        self.tracks = vec![track];
        self.current = Some(0);
    }

    pub fn contains(&self, id: &TrackId) -> bool {
        self.position_of(id).is_some()
    }

    pub fn position_of(&self, id: &TrackId) -> Option<usize> {
        self.tracks.iter().position(|t| &t.id == id)
    }

    /// Track under the cursor
    pub fn current(&self) -> Option<&Track> {
        self.current.and_then(|i| self.tracks.get(i))
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    /// Point the cursor at `index`; out-of-range requests are refused
    pub fn select(&mut self, index: usize) -> bool {
        if index < self.tracks.len() {
            self.current = Some(index);
            true
        } else {
            false
        }
    }

    /// Advance the cursor
    ///
    /// Past the end: wraps to 0 when `wrap`, otherwise stays on the last index.
    /// With no selection, the first track is selected.
    pub fn step_forward(&mut self, wrap: bool) -> Step {
        let len = self.tracks.len();
        if len == 0 {
            return Step::Empty;
        }

        let step = match self.current {
            None => Step::Moved(0),
            Some(i) if i + 1 < len => Step::Moved(i + 1),
            Some(_) if wrap => Step::Wrapped(0),
            Some(_) => Step::Clamped(len - 1),
        };
        self.apply(step);
        step
    }

    /// Move the cursor back
    ///
    /// Before the start: wraps to the last index when `wrap`, otherwise stays
    /// on index 0. With no selection the cursor counts as sitting before the
    /// start.
    pub fn step_back(&mut self, wrap: bool) -> Step {
        let len = self.tracks.len();
        if len == 0 {
            return Step::Empty;
        }

        let step = match self.current {
            Some(i) if i > 0 => Step::Moved(i - 1),
            _ if wrap => Step::Wrapped(len - 1),
            _ => Step::Clamped(0),
        };
        self.apply(step);
        step
    }

    fn apply(&mut self, step: Step) {
        match step {
            Step::Moved(i) | Step::Wrapped(i) | Step::Clamped(i) => self.current = Some(i),
            Step::Empty => {}
        }
    }

    /// Remove the track at `index`
    ///
    /// The cursor keeps pointing at the same track when it sat after the
    /// removed one. When the current track itself is removed the cursor
    /// stays on the same slot (now the following track), clamped to the new
    /// end, or becomes `None` if the queue emptied.
    pub fn remove(&mut self, index: usize) -> Option<Track> {
        if index >= self.tracks.len() {
            return None;
        }

        let track = self.tracks.remove(index);
        let len = self.tracks.len();

        self.current = match self.current {
            _ if len == 0 => None,
            Some(c) if c > index => Some(c - 1),
            Some(c) => Some(c.min(len - 1)),
            None => None,
        };

        Some(track)
    }

    /// Shuffle with the current track pinned at index 0
    pub fn shuffle_with<R: rand::Rng + ?Sized>(&mut self, rng: &mut R) {
        if self.tracks.len() <= 1 {
            return;
        }
        if let Some(index) = crate::shuffle::shuffle_pinned(&mut self.tracks, self.current, rng) {
            self.current = Some(index);
        }
    }

    /// Remove everything
    pub fn clear(&mut self) {
        self.tracks.clear();
        self.current = None;
    }

    /// Copy of all tracks in order
    pub fn to_vec(&self) -> Vec<Track> {
        self.tracks.clone()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Track> {
        self.tracks.iter()
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}
