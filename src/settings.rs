//! Player options
//!
//! Persisted separately from progress. A missing or unreadable file falls
//! back to defaults.

use std::fs;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::ANIM_RATE;

/// Game options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Gravity strength (world units/s²)
    pub gravity: f32,
    /// Ball restitution (0 = dead, 1 = perfectly elastic)
    pub bounce: f32,
    /// Fly-in/fly-out speed (alpha units per second)
    pub anim_rate: f32,
    /// Debug: the next solved (or played) level wins the whole game
    pub debug_win_entire_game: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            gravity: 98.0,
            bounce: 0.5,
            anim_rate: ANIM_RATE,
            debug_win_entire_game: false,
        }
    }
}

impl Options {
    /// Default options file name
    pub const FILE_NAME: &'static str = "options.json";

    /// Gravity pointing down the screen, used until a sensor reports
    pub fn default_gravity(&self) -> Vec2 {
        Vec2::new(0.0, -self.gravity)
    }

    /// Clamp values into their meaningful ranges
    pub fn sanitized(mut self) -> Self {
        self.gravity = self.gravity.max(0.0);
        self.bounce = self.bounce.clamp(0.0, 1.0);
        if !(self.anim_rate > 0.0) {
            self.anim_rate = ANIM_RATE;
        }
        self
    }

    /// Parse options JSON; absent keys take defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Options>(json).map(Options::sanitized)
    }

    /// Load from `path`, falling back to defaults
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path).map(|json| Self::from_json(&json)) {
            Ok(Ok(options)) => {
                log::info!("Loaded options from {}", path.display());
                options
            }
            Ok(Err(e)) => {
                log::warn!("Bad options file {}: {}; using defaults", path.display(), e);
                Self::default()
            }
            Err(_) => {
                log::info!("Using default options");
                Self::default()
            }
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path.as_ref(), json)?;
        log::info!("Options saved");
        Ok(())
    }
}
