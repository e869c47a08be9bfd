// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Temporary files for content that cannot travel as a single argument.

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::GitError;

/// Writes content to a fresh file and returns its path.
///
/// The content must be fully flushed before the path is returned.
pub trait TempWriter: Send + Sync {
    fn write(&self, content: &str, suggested_name: &str) -> Result<PathBuf, GitError>;
}

/// Writes into the system temporary directory.
///
/// The suggested name is kept as prefix and extension around a random
/// component, so `gitrel-commit.txt` becomes something like
/// `gitrel-commit.a1B2c3.txt`. Files are persisted; removing them is the
/// caller's job.
#[derive(Debug, Clone, Default)]
pub struct SystemTempWriter {
    dir: Option<PathBuf>,
}

impl SystemTempWriter {
    /// Write into `dir` instead of the system temporary directory.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: Some(dir.into()),
        }
    }
}

impl TempWriter for SystemTempWriter {
    fn write(&self, content: &str, suggested_name: &str) -> Result<PathBuf, GitError> {
        let to_error = |message: String| GitError::TempFile {
            name: suggested_name.to_string(),
            message,
        };

        let name = Path::new(suggested_name);
        let stem = name
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let suffix = name
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();
        let prefix = format!("{stem}.");

        let mut builder = tempfile::Builder::new();
        builder.prefix(&prefix).suffix(&suffix);
        let mut file = match &self.dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        }
        .map_err(|e| to_error(e.to_string()))?;

        file.write_all(content.as_bytes())
            .and_then(|_| file.flush())
            .map_err(|e| to_error(e.to_string()))?;

        let (_, path) = file.keep().map_err(|e| to_error(e.to_string()))?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_writes_content_before_returning() {
        let dir = TempDir::new().unwrap();
        let writer = SystemTempWriter::in_dir(dir.path());

        let path = writer.write("line one\nline two", "gitrel-commit.txt").unwrap();

        assert!(path.starts_with(dir.path()));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "line one\nline two");
    }

    #[test]
    fn test_keeps_name_shape() {
        let dir = TempDir::new().unwrap();
        let writer = SystemTempWriter::in_dir(dir.path());

        let path = writer.write("x", "gitrel-commit.txt").unwrap();
        let file_name = path.file_name().unwrap().to_string_lossy().into_owned();

        assert!(file_name.starts_with("gitrel-commit."));
        assert!(file_name.ends_with(".txt"));
    }

    #[test]
    fn test_each_write_gets_a_fresh_file() {
        let dir = TempDir::new().unwrap();
        let writer = SystemTempWriter::in_dir(dir.path());

        let first = writer.write("a", "msg.txt").unwrap();
        let second = writer.write("b", "msg.txt").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_missing_directory_is_temp_file_error() {
        let dir = TempDir::new().unwrap();
        let writer = SystemTempWriter::in_dir(dir.path().join("missing"));

        let err = writer.write("a", "msg.txt").unwrap_err();
        assert!(matches!(err, GitError::TempFile { .. }));
    }
}
