//! Volume control
//!
//! Linear 0.0-1.0 level with a mute flag that leaves the level untouched.

use crate::types::clamp_unit;

/// Volume controller
#[derive(Debug, Clone)]
pub struct Volume {
    /// Volume level (0.0-1.0)
    level: f32,

    /// Mute state (preserves volume level)
    muted: bool,
}

impl Volume {
    /// Create new volume controller, clamping `level` into range
    pub fn new(level: f32) -> Self {
        Self {
            level: Self::clamp(level),
            muted: false,
        }
    }

    /// Set volume level, returns the stored (clamped) value
    pub fn set_level(&mut self, level: f32) -> f32 {
        self.level = Self::clamp(level);
        self.level
    }

    /// Get current volume level (0.0-1.0)
    pub fn level(&self) -> f32 {
        self.level
    }

    /// Level as a whole percentage, for display
    pub fn percent(&self) -> u8 {
        (self.level * 100.0).round() as u8
    }

    /// Toggle mute state, returns the new state
    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        self.muted
    }

    /// Check if muted
    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Clamp into `[0, 1]`; NaN counts as silence
    pub fn clamp(level: f32) -> f32 {
        clamp_unit(level)
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self::new(0.8)
    }
}
