//! Game settings and preferences
//!
//! Read from `grove-dash.json` in the working directory, or from the path in
//! `GROVE_DASH_SETTINGS`. A missing file means defaults; so does a broken
//! one, with a warning.

use std::fs;
use std::path::{Path, PathBuf};

use glam::UVec2;
use serde::{Deserialize, Serialize};

use crate::consts::{DISPLAY_HEIGHT, DISPLAY_WIDTH};

/// Default settings file name
pub const SETTINGS_FILE: &str = "grove-dash.json";
/// Environment variable overriding the settings path
pub const SETTINGS_ENV: &str = "GROVE_DASH_SETTINGS";

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Levels ===
    /// Directory holding `0.json`, `1.json`, ...
    pub maps_dir: PathBuf,
    /// Level index to start on
    pub start_level: usize,
    /// RNG seed; `None` seeds from the clock
    pub seed: Option<u64>,

    // === Display ===
    /// Integer upscale of the 320x240 framebuffer
    pub window_scale: u32,
    /// Screen shake on hits and deaths
    pub screen_shake: bool,
    /// Reduced motion (disables shake)
    pub reduced_motion: bool,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    pub muted: bool,

    /// Headless runs stop after this many frames
    pub max_frames: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            maps_dir: PathBuf::from("data/maps"),
            start_level: 0,
            seed: None,

            window_scale: 2,
            screen_shake: true,
            reduced_motion: false,

            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,
            muted: false,

            max_frames: Some(600),
        }
    }
}

impl Settings {
    /// Effective screen shake (respects reduced_motion)
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }

    /// Final output size after upscaling
    pub fn output_size(&self) -> UVec2 {
        UVec2::new(DISPLAY_WIDTH, DISPLAY_HEIGHT) * self.window_scale.max(1)
    }

    /// Settings path: the env override, else the default file name
    pub fn path() -> PathBuf {
        std::env::var_os(SETTINGS_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(SETTINGS_FILE))
    }

    /// Load settings from the default location
    pub fn load() -> Self {
        Self::load_from(Self::path())
    }

    /// Load settings from a file, falling back to defaults
    pub fn load_from(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No settings at {}, using defaults", path.display());
                return Self::default();
            }
            Err(e) => {
                log::warn!("Could not read settings {}: {e}", path.display());
                return Self::default();
            }
        };

        match serde_json::from_str(&json) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Malformed settings {}: {e}; using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path.as_ref(), json)?;
        log::info!("Settings saved");
        Ok(())
    }
}
