// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Observation hooks for the query façade.

use crate::error::GitError;

use super::command::GitCommand;

/// How loudly a swallowed failure should be reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwallowLevel {
    Quiet,
    Warn,
}

/// Receives every call the façade makes. Never affects control flow.
pub trait Observer: Send + Sync {
    /// A git command is about to run on behalf of `operation`.
    fn on_call(&self, operation: &str, command: &GitCommand);

    /// `operation` produced `value` (already rendered for display).
    fn on_success(&self, operation: &str, value: &str);

    /// `operation` failed and the error is being returned to the caller.
    fn on_failure(&self, operation: &str, error: &GitError);

    /// `operation` failed and the failure was turned into a negative answer.
    fn on_swallowed(&self, operation: &str, error: &GitError, level: SwallowLevel);
}

/// Forwards observations to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl Observer for TracingObserver {
    fn on_call(&self, operation: &str, command: &GitCommand) {
        tracing::trace!(operation, "git {}", command);
    }

    fn on_success(&self, operation: &str, value: &str) {
        tracing::debug!(operation, "{}", value);
    }

    fn on_failure(&self, operation: &str, error: &GitError) {
        tracing::debug!(operation, "failed: {}", error);
    }

    fn on_swallowed(&self, operation: &str, error: &GitError, level: SwallowLevel) {
        match level {
            SwallowLevel::Quiet => {
                tracing::debug!(operation, "swallowed error: {}", error);
            }
            SwallowLevel::Warn => {
                tracing::warn!(operation, "{}", swallow_warning(operation));
                tracing::debug!(operation, "swallowed error: {}", error);
            }
        }
    }
}

/// Human-facing warning for a swallowed failure.
pub fn swallow_warning(operation: &str) -> &'static str {
    match operation {
        "has_tags" => "No git tags were reachable from this branch!",
        _ => "git command failed; treating as false",
    }
}
