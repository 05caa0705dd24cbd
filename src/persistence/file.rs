//! JSON file backed progress

use std::fs;
use std::path::{Path, PathBuf};

use super::{Progress, ProgressError, ProgressStore};

/// Progress stored as `progress.json`-style file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub const DEFAULT_FILE: &'static str = "progress.json";

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `progress.json` inside `dir`
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(Self::DEFAULT_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ProgressStore for JsonFileStore {
    fn load(&mut self) -> Result<Progress, ProgressError> {
        let json = fs::read_to_string(&self.path)?;
        let progress = serde_json::from_str(&json)?;
        log::info!("Loaded progress from {}", self.path.display());
        Ok(progress)
    }

    fn save(&mut self, progress: &Progress) -> Result<(), ProgressError> {
        let json = serde_json::to_string_pretty(progress)?;
        // Temp file + rename: the file on disk is always complete
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        log::debug!("Progress saved (level {})", progress.level);
        Ok(())
    }
}
