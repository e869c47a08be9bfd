// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Configuration schema definitions.
//!
//! Defines all configuration structures that can be loaded from gitrel.toml.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::git::{InvocationContext, StdioMode};

/// The main configuration structure for gitrel.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct GitrelConfig {
    /// How git is invoked.
    pub git: GitConfig,

    /// Release workflow settings.
    pub release: ReleaseConfig,
}

impl GitrelConfig {
    /// Load configuration from a specific path.
    pub fn load_from(path: &std::path::Path) -> crate::error::Result<Self> {
        super::loader::load_config_from(path)
    }

    /// Build the invocation context for a session rooted at `cwd`.
    pub fn context(&self, cwd: impl Into<PathBuf>) -> InvocationContext {
        let stdio = if self.git.quiet {
            StdioMode::Capture
        } else {
            StdioMode::InheritStderr
        };
        InvocationContext::new(cwd)
            .with_envs(self.git.env.clone())
            .with_stdio(stdio)
    }
}

/// `[git]` section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GitConfig {
    /// Executable to run.
    pub program: String,

    /// Environment overrides applied to every invocation.
    pub env: BTreeMap<String, String>,

    /// Keep git's stderr out of the terminal.
    pub quiet: bool,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            program: "git".to_string(),
            env: BTreeMap::new(),
            quiet: true,
        }
    }
}

/// `[release]` section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReleaseConfig {
    /// Remote used by push and upstream checks.
    pub remote: String,

    /// Treat a failing tag listing as an error instead of "no tags".
    pub strict_tags: bool,

    /// Name suggested for the temporary multi-line commit message file.
    pub commit_message_file: String,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        Self {
            remote: "origin".to_string(),
            strict_tags: false,
            commit_message_file: crate::git::command::COMMIT_MESSAGE_FILE.to_string(),
        }
    }
}
