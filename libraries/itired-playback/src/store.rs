//! Persistence for the volume preference and recently-played history
//!
//! Only these two things outlive a session; queue and transport state
//! never touch the store.

use crate::error::StoreError;
use crate::history::{HistoryEntry, RecentlyPlayed};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Result type for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Persistence service
pub trait PlayerStore: Send {
    /// Stored volume, if any was saved
    fn volume_preference(&self) -> Option<f32>;

    fn set_volume_preference(&mut self, volume: f32) -> StoreResult<()>;

    /// Record a play (deduplicated by track id, bounded)
    fn append_history(&mut self, entry: HistoryEntry) -> StoreResult<()>;

    /// Recently played, most recent first
    fn history(&self) -> Vec<HistoryEntry>;
}

/// On-disk shape shared by the stores
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoredState {
    #[serde(default)]
    volume: Option<f32>,

    #[serde(default)]
    history: Vec<HistoryEntry>,
}

/// Store that lives only as long as the session
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    volume: Option<f32>,
    history: RecentlyPlayed,
}

impl MemoryStore {
    pub fn new(history_limit: usize) -> Self {
        Self {
            volume: None,
            history: RecentlyPlayed::new(history_limit),
        }
    }

    /// Start with a saved volume
    pub fn with_volume(mut self, volume: f32) -> Self {
        self.volume = Some(volume);
        self
    }
}

impl PlayerStore for MemoryStore {
    fn volume_preference(&self) -> Option<f32> {
        self.volume
    }

    fn set_volume_preference(&mut self, volume: f32) -> StoreResult<()> {
        self.volume = Some(volume);
        Ok(())
    }

    fn append_history(&mut self, entry: HistoryEntry) -> StoreResult<()> {
        self.history.push(entry);
        Ok(())
    }

    fn history(&self) -> Vec<HistoryEntry> {
        self.history.to_vec()
    }
}

/// Store persisted as a JSON document
///
/// Every change rewrites the file through a temporary sibling and a
/// rename, so a crash never leaves a half-written document behind.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    volume: Option<f32>,
    history: RecentlyPlayed,
}

impl JsonFileStore {
    /// Open `path`, starting empty if it does not exist yet
    pub fn open(path: impl AsRef<Path>, history_limit: usize) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();

        let state = if path.exists() {
            let content = fs::read_to_string(&path)?;
            serde_json::from_str::<StoredState>(&content)?
        } else {
            StoredState::default()
        };

        debug!(
            path = %path.display(),
            history = state.history.len(),
            has_volume = state.volume.is_some(),
            "Opened player store"
        );

        Ok(Self {
            path,
            volume: state.volume,
            history: RecentlyPlayed::from_entries(state.history, history_limit),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> StoreResult<()> {
        let state = StoredState {
            volume: self.volume,
            history: self.history.to_vec(),
        };
        let content = serde_json::to_string_pretty(&state)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, content)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl PlayerStore for JsonFileStore {
    fn volume_preference(&self) -> Option<f32> {
        self.volume
    }

    fn set_volume_preference(&mut self, volume: f32) -> StoreResult<()> {
        self.volume = Some(volume);
        self.save()
    }

    fn append_history(&mut self, entry: HistoryEntry) -> StoreResult<()> {
        self.history.push(entry);
        self.save()
    }

    fn history(&self) -> Vec<HistoryEntry> {
        self.history.to_vec()
    }
}
