//! Storage layout for dz
//!
//! All state lives in one data directory:
//!
//! ```text
//! <data dir>/
//!   dz.toml             # Configuration (optional)
//!   board.json          # Local board snapshot
//!   activity.jsonl      # Activity log entries
//!   identity            # Signed-in identity for the remote backend
//! ```
//!
//! The directory is resolved from `--data-dir`, the `DZ_DATA_DIR`
//! environment variable (handled by clap), or the platform data dir.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;

use crate::error::{Error, Result};

/// Storage manager for dz state
#[derive(Debug, Clone)]
pub struct Storage {
    root: PathBuf,
}

impl Storage {
    /// Use an explicit data directory.
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Resolve the data directory: the explicit override wins,
    /// otherwise the platform-specific application data directory.
    pub fn resolve(override_dir: Option<PathBuf>) -> Result<Self> {
        if let Some(dir) = override_dir {
            return Ok(Self::new(dir));
        }

        let dirs = ProjectDirs::from("", "", "dz").ok_or_else(|| {
            Error::InvalidArgument(
                "could not determine a data directory; pass --data-dir".to_string(),
            )
        })?;
        Ok(Self::new(dirs.data_dir().to_path_buf()))
    }

    /// Ensure the data directory exists.
    pub fn init(&self) -> Result<()> {
        fs::create_dir_all(&self.root)?;
        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path to the local board snapshot
    pub fn board_file(&self) -> PathBuf {
        self.root.join("board.json")
    }

    /// Path to the activity log (JSONL format)
    pub fn activity_file(&self) -> PathBuf {
        self.root.join("activity.jsonl")
    }

    /// Path to the persisted identity
    pub fn identity_file(&self) -> PathBuf {
        self.root.join("identity")
    }

    /// Path to the configuration file
    pub fn config_file(&self) -> PathBuf {
        self.root.join("dz.toml")
    }
}
