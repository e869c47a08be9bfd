// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Error types for gitrel.
//!
//! Failures of the external `git` tool, output that cannot be parsed, and
//! configuration problems are kept as separate categories so callers can
//! tell "git said no" apart from "git said something we did not expect".

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for gitrel operations.
#[derive(Error, Debug)]
pub enum GitrelError {
    // Git errors
    #[error("Git error: {0}")]
    Git(#[from] GitError),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Generic error with context
    #[error("{context}: {message}")]
    WithContext { context: String, message: String },
}

/// Git-related errors.
#[derive(Error, Debug)]
pub enum GitError {
    /// `git` ran and exited with a non-zero status.
    ///
    /// `exit_code` is `-1` when the process was terminated by a signal.
    #[error("Git command failed: {command} (exit code {exit_code}): {stderr}")]
    CommandFailed {
        command: String,
        exit_code: i32,
        stderr: String,
    },

    /// The process could not be started at all.
    #[error("Failed to run {command}: {message}")]
    Spawn { command: String, message: String },

    /// Output did not have the expected shape.
    #[error("Failed to parse git output {input:?}: {message}")]
    Parse { input: String, message: String },

    #[error("Failed to write temporary file '{name}': {message}")]
    TempFile { name: String, message: String },
}

impl GitError {
    /// Exit code of the failed command, if the failure came from git itself.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            GitError::CommandFailed { exit_code, .. } => Some(*exit_code),
            _ => None,
        }
    }

    /// Captured stderr of the failed command, if any.
    pub fn stderr(&self) -> Option<&str> {
        match self {
            GitError::CommandFailed { stderr, .. } => Some(stderr),
            _ => None,
        }
    }
}

/// Configuration-related errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Failed to parse configuration: {message}")]
    ParseError { message: String },

    #[error("Configuration file already exists: {path}. Use --force to overwrite.")]
    AlreadyExists { path: PathBuf },
}

/// Result type alias for gitrel operations.
pub type Result<T> = std::result::Result<T, GitrelError>;

/// Extension trait for adding context to errors.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T, E: std::error::Error + 'static> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| GitrelError::WithContext {
            context: context.into(),
            message: e.to_string(),
        })
    }
}
