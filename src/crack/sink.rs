//! Result sink
//!
//! The winning candidate is written as raw bytes to a temporary file next to
//! the output path and renamed into place, so the output path either holds
//! the complete result or is left untouched.

use crate::error::SinkError;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Destination for the winning candidate
pub trait ResultSink {
    /// Persist the winning candidate. Called at most once per run.
    fn write(&self, candidate: &[u8]) -> Result<(), SinkError>;
}

/// Writes the result as a single line to a file
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    /// Create a sink for an output path
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    /// Output path
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(format!(".{}.tmp", std::process::id()));
        self.path.with_file_name(name)
    }

    fn write_temp(&self, temp: &Path, candidate: &[u8]) -> std::io::Result<()> {
        let mut file = File::create(temp)?;
        file.write_all(candidate)?;
        file.write_all(b"\n")?;
        file.sync_all()
    }
}

impl ResultSink for FileSink {
    fn write(&self, candidate: &[u8]) -> Result<(), SinkError> {
        let temp = self.temp_path();

        if let Err(source) = self.write_temp(&temp, candidate) {
            let _ = fs::remove_file(&temp);
            return Err(SinkError::WriteFailed {
                path: self.path.clone(),
                source,
            });
        }

        if let Err(source) = fs::rename(&temp, &self.path) {
            let _ = fs::remove_file(&temp);
            return Err(SinkError::PersistFailed {
                path: self.path.clone(),
                source,
            });
        }

        debug!(path = %self.path.display(), "Result written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_write_creates_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("found.txt");

        FileSink::new(&path).write(b"w0rld").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "w0rld\n");
        // No temporary file left behind
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_write_overwrites_existing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("found.txt");
        fs::write(&path, "stale contents that are longer\n").unwrap();

        FileSink::new(&path).write(b"fresh").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "fresh\n");
    }

    #[test]
    fn test_write_keeps_raw_bytes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("found.txt");

        FileSink::new(&path).write(b"caf\xE9").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"caf\xE9\n");
    }

    #[test]
    fn test_write_to_missing_directory_fails_cleanly() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("found.txt");

        let err = FileSink::new(&path).write(b"x").unwrap_err();
        assert!(matches!(err, SinkError::WriteFailed { .. }));
        assert!(!path.exists());
    }
}
