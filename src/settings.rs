//! Game settings and tuning
//!
//! Persisted as JSON next to the binary (or wherever the host points).

use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Game settings/tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Viewport ===
    /// Window width in pixels
    pub viewport_width: f32,
    /// Window height in pixels
    pub viewport_height: f32,

    // === Rules ===
    /// Forward steps from start to finish line
    pub goal_moves: u32,
    /// Ticks per forward step on a fresh run
    pub base_move_time: u32,
    /// Move time a lost run falls back to before the level ramp
    pub restart_move_time: u32,
    /// Fastest allowed move time
    pub move_time_floor: u32,
    /// Enemies jump every N moves
    pub jump_interval: u32,
    /// Let enemies keep chasing when the forward step is blocked
    pub pursue_on_blocked_step: bool,

    // === Run ===
    /// Fixed seed for reproducible runs (random if unset)
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            viewport_width: DEFAULT_VIEWPORT_WIDTH,
            viewport_height: DEFAULT_VIEWPORT_HEIGHT,

            goal_moves: GOAL_MOVES,
            base_move_time: BASE_MOVE_TIME,
            restart_move_time: RESTART_MOVE_TIME,
            move_time_floor: MOVE_TIME_FLOOR,
            jump_interval: JUMP_INTERVAL,
            pursue_on_blocked_step: false,

            seed: None,
        }
    }
}

impl Settings {
    /// Copy with out-of-range values clamped to something playable
    pub fn sanitized(&self) -> Self {
        let defaults = Self::default();
        let mut s = self.clone();
        if !(s.viewport_width > 0.0) {
            s.viewport_width = defaults.viewport_width;
        }
        if !(s.viewport_height > 0.0) {
            s.viewport_height = defaults.viewport_height;
        }
        s.goal_moves = s.goal_moves.max(1);
        s.move_time_floor = s.move_time_floor.max(1);
        s.base_move_time = s.base_move_time.max(s.move_time_floor);
        s.restart_move_time = s.restart_move_time.max(s.move_time_floor);
        s.jump_interval = s.jump_interval.max(1);
        s
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str::<Settings>(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings.sanitized()
                }
                Err(e) => {
                    log::warn!("Ignoring malformed settings {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self).context("serializing settings")?;
        fs::write(path, json).with_context(|| format!("writing settings to {}", path.display()))?;
        log::info!("Settings saved");
        Ok(())
    }
}
