//! Storage layer for Questlog data.
//!
//! Goals and the score live in a single line-oriented text file, by default
//! `~/.local/share/questlog/goals.txt`. The `QL_DATA_DIR` environment variable
//! relocates the whole data directory (goal file and action log), which is
//! what the integration tests use for isolation.
//!
//! See [`backend`] for how the file itself is read and replaced.

pub mod backend;

pub use backend::{FileBackend, StorageBackend};

use crate::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "QL_DATA_DIR";

/// File name of the goal file inside the data directory.
pub const DATA_FILE_NAME: &str = "goals.txt";

/// Get the data directory.
///
/// `QL_DATA_DIR` wins if set and non-empty, otherwise `<data_dir>/questlog`.
pub fn get_data_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        if !dir.is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }

    let data_dir = dirs::data_dir()
        .ok_or_else(|| Error::Other("Could not determine data directory".to_string()))?;
    Ok(data_dir.join("questlog"))
}

/// Get the default goal file path inside the data directory.
pub fn default_data_file() -> Result<PathBuf> {
    Ok(get_data_dir()?.join(DATA_FILE_NAME))
}

/// Expand a leading `~` to the home directory.
pub fn expand_home(path: &Path) -> PathBuf {
    if let Ok(stripped) = path.strip_prefix("~") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    path.to_path_buf()
}

/// Create the parent directory of `path` if it does not exist yet.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
