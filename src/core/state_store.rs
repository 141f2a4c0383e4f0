use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::models::{StateFile, StateSnapshot};
use crate::utils::error::{AppError, Result};

/// Durable home of the per-commodity monitor state.
pub trait StateStore {
    /// A missing record yields the default snapshot; an unreadable one is an error.
    fn load(&self) -> Result<StateSnapshot>;

    /// Replaces the whole record in one step.
    fn save(&self, snapshot: &StateSnapshot) -> Result<()>;
}

/// Flat JSON file, replaced atomically through a sibling temp file.
pub struct JsonStateStore {
    path: PathBuf,
}

impl JsonStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonStateStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn corrupt(&self, source: serde_json::Error) -> AppError {
        AppError::StateCorrupt {
            path: self.path.display().to_string(),
            source,
        }
    }
}

impl StateStore for JsonStateStore {
    fn load(&self) -> Result<StateSnapshot> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("No state file at {}; starting armed", self.path.display());
                return Ok(StateSnapshot::default());
            }
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                return Err(self.corrupt(serde_json::Error::io(e)));
            }
            Err(e) => return Err(e.into()),
        };

        let file: StateFile = serde_json::from_str(&contents).map_err(|e| self.corrupt(e))?;
        debug!("Loaded state from {}", self.path.display());
        Ok(file.into())
    }

    fn save(&self, snapshot: &StateSnapshot) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        let mut tmp = NamedTempFile::new_in(&dir)?;
        serde_json::to_writer(&mut tmp, &StateFile::from(snapshot))?;
        tmp.flush()?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;

        debug!("Saved state to {}", self.path.display());
        Ok(())
    }
}
