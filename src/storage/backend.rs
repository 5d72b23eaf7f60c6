//! Storage backend trait and implementations.
//!
//! The goal manager only needs to read and overwrite a named, line-oriented
//! resource. This module provides:
//! - `StorageBackend` - The trait the manager saves to and loads from
//! - `FileBackend` - A plain file on disk, replaced atomically on write

use crate::{Error, Result};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Trait for backends that hold the persisted goal data.
pub trait StorageBackend {
    /// Read all lines of the resource as raw bytes, without line endings.
    ///
    /// Lines are decoded by the caller, one at a time, so a single bad line
    /// cannot hide the rest. Returns `Ok(None)` if the resource does not exist.
    fn read_lines(&self) -> Result<Option<Vec<Vec<u8>>>>;

    /// Replace the whole resource with the given lines.
    fn write_lines(&mut self, lines: &[String]) -> Result<()>;

    /// Get the storage location description (for display purposes).
    fn location(&self) -> String;
}

/// A goal file on the local filesystem.
#[derive(Debug, Clone)]
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StorageBackend for FileBackend {
    fn read_lines(&self) -> Result<Option<Vec<Vec<u8>>>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        Ok(Some(split_lines(&bytes)))
    }

    fn write_lines(&mut self, lines: &[String]) -> Result<()> {
        // Write next to the target so the final rename stays on one filesystem.
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut tmp = NamedTempFile::new_in(dir)?;
        for line in lines {
            writeln!(tmp, "{}", line)?;
        }
        // Temp files are created 0600; keep the mode of the file being replaced.
        if let Ok(metadata) = fs::metadata(&self.path) {
            tmp.as_file().set_permissions(metadata.permissions())?;
        }
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| Error::Io(e.error))?;
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// Split file contents on `\n`, stripping a trailing `\r` from each line.
///
/// A final newline does not produce an extra empty line.
fn split_lines(bytes: &[u8]) -> Vec<Vec<u8>> {
    if bytes.is_empty() {
        return Vec::new();
    }
    let body = bytes.strip_suffix(b"\n").unwrap_or(bytes);
    body.split(|&b| b == b'\n')
        .map(|line| line.strip_suffix(b"\r").unwrap_or(line).to_vec())
        .collect()
}
