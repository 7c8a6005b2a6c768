//! Recently-played history
//!
//! Bounded, most-recent-first, one entry per track id.

use crate::types::{Track, TrackId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Default number of entries kept
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// One recently-played record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub track_id: TrackId,
    pub title: String,
    pub artists: Vec<String>,
    pub cover_uri: Option<String>,
    pub played_at: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn from_track(track: &Track, played_at: DateTime<Utc>) -> Self {
        Self {
            track_id: track.id.clone(),
            title: track.title.clone(),
            artists: track.artists.clone(),
            cover_uri: track.cover_uri.clone(),
            played_at,
        }
    }
}

/// Recently-played list with bounded size
///
/// Re-adding a track moves it to the front instead of duplicating it.
/// When full, the oldest entry is discarded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentlyPlayed {
    /// Entries (most recent = front)
    entries: VecDeque<HistoryEntry>,

    /// Maximum history size
    max_size: usize,
}

impl RecentlyPlayed {
    /// Create new history with specified maximum size
    pub fn new(max_size: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(max_size.min(DEFAULT_HISTORY_LIMIT)),
            max_size,
        }
    }

    /// Rebuild from stored entries (most recent first), enforcing the invariants
    pub fn from_entries(entries: Vec<HistoryEntry>, max_size: usize) -> Self {
        let mut history = Self::new(max_size);
        // Oldest first so that the most recent ends up in front
        for entry in entries.into_iter().rev() {
            history.push(entry);
        }
        history
    }

    /// Record a play
    pub fn push(&mut self, entry: HistoryEntry) {
        if self.max_size == 0 {
            return;
        }

        self.entries.retain(|e| e.track_id != entry.track_id);
        self.entries.push_front(entry);
        self.entries.truncate(self.max_size);
    }

    /// Most recent entry
    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.front()
    }

    /// Copy of all entries, most recent first
    pub fn to_vec(&self) -> Vec<HistoryEntry> {
        self.entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }
}

impl Default for RecentlyPlayed {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn entry(id: &str, minute: u32) -> HistoryEntry {
        HistoryEntry {
            track_id: TrackId::new("yandex", id),
            title: format!("Track {}", id),
            artists: vec!["Test Artist".to_string()],
            cover_uri: None,
            played_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, minute, 0).unwrap(),
        }
    }

    #[test]
    fn most_recent_first() {
        let mut history = RecentlyPlayed::new(10);
        history.push(entry("1", 0));
        history.push(entry("2", 1));
        history.push(entry("3", 2));

        let ids: Vec<String> = history
            .to_vec()
            .iter()
            .map(|e| e.track_id.to_string())
            .collect();
        assert_eq!(ids, vec!["yandex_3", "yandex_2", "yandex_1"]);
    }

    #[test]
    fn readding_moves_to_front() {
        let mut history = RecentlyPlayed::new(10);
        history.push(entry("A", 0));
        history.push(entry("B", 1));
        history.push(entry("A", 2));

        assert_eq!(history.len(), 2);
        let latest = history.latest().unwrap();
        assert_eq!(latest.track_id, TrackId::new("yandex", "A"));
        assert_eq!(latest.played_at.format("%M").to_string(), "02");
    }

    #[test]
    fn history_bounded() {
        let mut history = RecentlyPlayed::new(3);
        for i in 1..=4 {
            history.push(entry(&i.to_string(), i));
        }

        assert_eq!(history.len(), 3);
        let all = history.to_vec();
        // Oldest (1) discarded
        assert_eq!(all[0].track_id, TrackId::new("yandex", "4"));
        assert_eq!(all[2].track_id, TrackId::new("yandex", "2"));
    }

    #[test]
    fn default_holds_fifty() {
        let mut history = RecentlyPlayed::default();
        assert_eq!(history.max_size(), 50);

        for i in 0..60 {
            history.push(entry(&i.to_string(), 0));
        }
        assert_eq!(history.len(), 50);
        assert_eq!(history.latest().unwrap().track_id, TrackId::new("yandex", "59"));
    }

    #[test]
    fn from_entries_keeps_order_and_dedups() {
        let stored = vec![entry("3", 2), entry("2", 1), entry("3", 0), entry("1", 0)];
        let history = RecentlyPlayed::from_entries(stored, 10);

        let ids: Vec<String> = history
            .to_vec()
            .iter()
            .map(|e| e.track_id.to_string())
            .collect();
        assert_eq!(ids, vec!["yandex_3", "yandex_2", "yandex_1"]);
    }

    #[test]
    fn zero_capacity_keeps_nothing() {
        let mut history = RecentlyPlayed::new(0);
        history.push(entry("1", 0));
        assert!(history.is_empty());
    }
}
