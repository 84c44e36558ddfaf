//! Game settings
//!
//! Read from a JSON file next to the game (`game_session_config.json` by
//! default), written by the surrounding application before launch.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::{FIELD_HEIGHT, FIELD_WIDTH, GAME_NAME, IDLE_TICK_RATE, TICK_RATE};
use crate::error::GameError;

/// Default settings file name
pub const DEFAULT_SETTINGS_FILE: &str = "game_session_config.json";

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Session identity ===
    /// Player the summary is recorded for
    pub user_id: u64,
    /// Game identifier reported in the summary
    pub game_name: String,

    // === Simulation ===
    /// Spawner seed; drawn from entropy when absent
    pub seed: Option<u64>,
    /// Ticks per second while playing
    pub tick_rate: u32,
    /// Ticks per second on the menu and summary screens
    pub idle_tick_rate: u32,
    /// Play-field size in screen pixels
    pub field_width: f32,
    pub field_height: f32,

    // === Input ===
    /// Cursor smoothing weight in (0, 1]; 1.0 follows the raw fingertip
    pub cursor_smoothing: f32,

    // === Output ===
    pub sound_enabled: bool,
    /// Append session summaries to this JSON-lines file
    pub telemetry_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            user_id: 1,
            game_name: GAME_NAME.to_string(),

            seed: None,
            tick_rate: TICK_RATE,
            idle_tick_rate: IDLE_TICK_RATE,
            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,

            cursor_smoothing: 0.4,

            sound_enabled: true,
            telemetry_path: None,
        }
    }
}

impl Settings {
    /// Load settings, falling back to defaults if the file is missing or invalid
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("No settings at {}, using defaults", path.display());
            return Self::default();
        }

        match Self::load_strict(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("{e}; using defaults");
                Self::default()
            }
        }
    }

    /// Load settings, failing on any read or parse error
    pub fn load_strict(path: impl AsRef<Path>) -> Result<Self, GameError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| GameError::SettingsRead {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Self =
            serde_json::from_str(&json).map_err(|source| GameError::SettingsParse {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(settings.validated())
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
    }

    /// Set the player and persist it, so later launches report the same
    /// user without being told again
    pub fn remember_user(&mut self, user_id: u64, path: impl AsRef<Path>) -> std::io::Result<()> {
        self.user_id = user_id;
        self.save(path)?;
        log::info!("Player set to user {user_id}");
        Ok(())
    }

    /// Replace nonsensical values with defaults
    pub fn validated(mut self) -> Self {
        let defaults = Self::default();
        if self.tick_rate == 0 {
            self.tick_rate = defaults.tick_rate;
        }
        if self.idle_tick_rate == 0 {
            self.idle_tick_rate = defaults.idle_tick_rate;
        }
        if !(self.field_width > 0.0 && self.field_height > 0.0) {
            self.field_width = defaults.field_width;
            self.field_height = defaults.field_height;
        }
        if !(self.cursor_smoothing > 0.0 && self.cursor_smoothing <= 1.0) {
            self.cursor_smoothing = defaults.cursor_smoothing;
        }
        self
    }

    /// Spawner seed, drawing one from entropy when not configured
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }
}
