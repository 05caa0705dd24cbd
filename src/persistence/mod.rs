//! Level progress persistence
//!
//! Progress is the triple the game needs to resume exactly where it left
//! off: the level, how many good blocks were already touched, and the seed
//! modifier that keeps each level's layout stable across restarts.

pub mod file;

pub use file::JsonFileStore;

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Saved campaign progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub level: u32,
    pub touches: u32,
    #[serde(rename = "seed_mod")]
    pub seed_modifier: i64,
}

impl Default for Progress {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Progress {
    /// Fresh campaign
    pub fn new(seed_modifier: i64) -> Self {
        Self {
            level: 0,
            touches: 0,
            seed_modifier,
        }
    }

    /// Back to level 0 with a new layout seed
    pub fn reset(&mut self, seed_modifier: i64) {
        *self = Self::new(seed_modifier);
    }

    /// Wall-clock seed so each new campaign gets new layouts
    pub fn fresh_seed_modifier() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or_default()
    }
}

#[derive(Debug, Error)]
pub enum ProgressError {
    #[error("progress i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed progress data: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("no saved progress")]
    Missing,
}

/// Where progress lives
pub trait ProgressStore {
    fn load(&mut self) -> Result<Progress, ProgressError>;
    fn save(&mut self, progress: &Progress) -> Result<(), ProgressError>;
}

/// In-memory store, for tests and embedding without a filesystem
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub stored: Option<Progress>,
    /// Number of successful saves
    pub saves: usize,
    /// Make every load fail (simulates corrupt storage)
    pub fail_loads: bool,
}

impl MemoryStore {
    pub fn with(progress: Progress) -> Self {
        Self {
            stored: Some(progress),
            ..Default::default()
        }
    }
}

impl ProgressStore for MemoryStore {
    fn load(&mut self) -> Result<Progress, ProgressError> {
        if self.fail_loads {
            return Err(ProgressError::Missing);
        }
        self.stored.ok_or(ProgressError::Missing)
    }

    fn save(&mut self, progress: &Progress) -> Result<(), ProgressError> {
        self.stored = Some(*progress);
        self.saves += 1;
        Ok(())
    }
}
