// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Configuration loading and merging.

use crate::error::{ConfigError, GitrelError, Result};
use std::path::{Path, PathBuf};

use super::schema::{GitConfig, GitrelConfig, ReleaseConfig};

/// Configuration file names to search for, in order of priority.
const CONFIG_FILES: &[&str] = &["gitrel.toml", ".gitrel.toml", ".config/gitrel.toml"];

/// Find the configuration file starting from a specific directory.
pub fn find_config_file_from(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        if let Some(found) = first_existing(&current) {
            return Some(found);
        }

        // Try parent directory
        if !current.pop() {
            break;
        }
    }

    if let Some(found) = dirs::home_dir().and_then(|home| first_existing(&home)) {
        return Some(found);
    }

    // XDG config directory
    dirs::config_dir()
        .map(|dir| dir.join("gitrel").join("config.toml"))
        .filter(|path| path.exists())
}

fn first_existing(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.exists())
}

/// Load configuration for a session rooted at `dir`.
pub fn load_config_for(dir: &Path) -> Result<GitrelConfig> {
    match find_config_file_from(dir) {
        Some(path) => load_config_from(&path),
        None => {
            tracing::debug!("No configuration file found above {:?}, using defaults", dir);
            Ok(GitrelConfig::default())
        }
    }
}

/// Load configuration from a specific path.
pub fn load_config_from(path: &Path) -> Result<GitrelConfig> {
    tracing::debug!("Loading configuration from: {:?}", path);

    if !path.exists() {
        return Err(GitrelError::Config(ConfigError::NotFound {
            path: path.to_path_buf(),
        }));
    }

    let content = std::fs::read_to_string(path).map_err(|e| {
        GitrelError::Config(ConfigError::ParseError {
            message: format!("Failed to read config file: {}", e),
        })
    })?;

    parse_config(&content)
}

/// Parse configuration from a TOML string.
pub fn parse_config(content: &str) -> Result<GitrelConfig> {
    toml::from_str(content).map_err(|e| {
        GitrelError::Config(ConfigError::ParseError {
            message: format!("Failed to parse TOML: {}", e),
        })
    })
}

/// Merge two configurations, with the overlay taking precedence.
///
/// Scalar fields from the overlay win when they differ from the default;
/// environment maps are merged key by key.
pub fn merge_configs(base: GitrelConfig, overlay: GitrelConfig) -> GitrelConfig {
    GitrelConfig {
        git: merge_git_config(base.git, overlay.git),
        release: merge_release_config(base.release, overlay.release),
    }
}

fn pick<T: PartialEq>(base: T, overlay: T, default: T) -> T {
    if overlay != default {
        overlay
    } else {
        base
    }
}

fn merge_git_config(base: GitConfig, overlay: GitConfig) -> GitConfig {
    let defaults = GitConfig::default();
    GitConfig {
        program: pick(base.program, overlay.program, defaults.program),
        env: {
            let mut merged = base.env;
            merged.extend(overlay.env);
            merged
        },
        quiet: pick(base.quiet, overlay.quiet, defaults.quiet),
    }
}

fn merge_release_config(base: ReleaseConfig, overlay: ReleaseConfig) -> ReleaseConfig {
    let defaults = ReleaseConfig::default();
    ReleaseConfig {
        remote: pick(base.remote, overlay.remote, defaults.remote),
        strict_tags: overlay.strict_tags || base.strict_tags,
        commit_message_file: pick(
            base.commit_message_file,
            overlay.commit_message_file,
            defaults.commit_message_file,
        ),
    }
}
