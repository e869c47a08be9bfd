// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Invocation context shared by every git call.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// How the child's output streams are wired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StdioMode {
    /// Capture stdout and stderr so they can be returned or reported.
    #[default]
    Capture,
    /// Capture stdout, let stderr pass through to the parent process.
    InheritStderr,
}

/// Working directory and environment for a session of git calls.
///
/// Built once by the caller and passed by reference; gitrel never mutates it
/// and never falls back to the process's current directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationContext {
    cwd: PathBuf,
    env: BTreeMap<String, String>,
    stdio: StdioMode,
}

impl InvocationContext {
    /// Create a context rooted at `cwd`.
    ///
    /// A relative `cwd` is anchored once, here, so every later call sees an
    /// absolute working directory.
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self {
            cwd: anchored(cwd.into()),
            env: BTreeMap::new(),
            stdio: StdioMode::default(),
        }
    }

    /// Add an environment override.
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Add several environment overrides.
    pub fn with_envs<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.env
            .extend(vars.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn with_stdio(mut self, stdio: StdioMode) -> Self {
        self.stdio = stdio;
        self
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    pub fn env(&self) -> &BTreeMap<String, String> {
        &self.env
    }

    pub fn stdio(&self) -> StdioMode {
        self.stdio
    }
}

/// `path` made absolute without resolving symlinks.
pub(crate) fn anchored(path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        std::path::absolute(&path).unwrap_or(path)
    }
}
