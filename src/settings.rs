//! Game settings
//!
//! Stored as JSON. Missing fields fall back to their defaults, so a file
//! only needs the values it changes.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Screen ===
    /// Playfield width
    pub width: f64,
    /// Playfield height
    pub height: f64,
    /// Thickness of the side and top walls
    pub border_size: f64,
    /// Strip above the top wall reserved for the score line
    pub score_bar_height: f64,

    // === Gameplay ===
    pub ball_radius: u32,
    /// Simulation ticks per second
    pub fps: u32,
    /// Points per block hit
    pub hit_score: i64,
    /// Points for clearing a level
    pub level_clear_bonus: i64,

    // === Headless runs ===
    /// A level that hasn't finished after this many ticks is abandoned
    pub max_ticks_per_level: u64,
    /// Let the paddle follow the balls on its own
    pub autopilot: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            // Screen
            width: SCREEN_WIDTH,
            height: SCREEN_HEIGHT,
            border_size: BORDER_SIZE,
            score_bar_height: SCORE_BAR_HEIGHT,

            // Gameplay
            ball_radius: BALL_RADIUS,
            fps: 60,
            hit_score: 5,
            level_clear_bonus: 100,

            // Headless
            max_ticks_per_level: 36_000,
            autopilot: true,
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load settings from a JSON file, or defaults when there is none
    ///
    /// An unreadable or malformed file is logged and ignored.
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            log::info!("Using default settings");
            return Self::default();
        };

        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Ignoring malformed settings file {}: {e}", path.display());
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Could not read settings file {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Write settings as pretty JSON
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let json = self.to_json().map_err(std::io::Error::other)?;
        std::fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }

    /// Simulated seconds for a number of ticks
    pub fn ticks_to_seconds(&self, ticks: u64) -> f64 {
        ticks as f64 / f64::from(self.fps.max(1))
    }
}
