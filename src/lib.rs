// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! gitrel - typed git operations for release workflows
//!
//! A thin, explicit layer over the `git` command line for tools that cut
//! releases: committing, tagging, pushing, and asking the repository about
//! its branch, SHAs, tags, and changed files.
//!
//! # Features
//!
//! - **Explicit context**: every call runs against an [`InvocationContext`],
//!   never the process's current directory
//! - **Typed failures**: non-zero exits keep their exit code and stderr
//! - **Lenient predicates**: `is_initialized`, `has_commit` and `has_tags`
//!   answer `false` instead of failing
//! - **Sync and async**: queries block, mutations are `async` on tokio
//! - **Pluggable collaborators**: executor, temp-file writer and observer are
//!   traits
//!
//! # Example
//!
//! ```no_run
//! use gitrel::git::{Git, InvocationContext};
//!
//! let git = Git::new();
//! let ctx = InvocationContext::new("/path/to/repo");
//!
//! if git.has_tags(&ctx) {
//!     let tag = git.last_tag(&ctx).unwrap();
//!     let changed = git
//!         .diff_since_in(&tag, std::path::Path::new("/path/to/repo/packages/a"), &ctx)
//!         .unwrap();
//!     println!("{} file(s) changed since {}", changed.len(), tag);
//! }
//! ```

// Module declarations
pub mod cli;
pub mod config;
pub mod error;
pub mod git;

// Re-exports for convenience
pub use config::GitrelConfig;
pub use error::{GitError, GitrelError, Result};
pub use git::{Git, InvocationContext};

/// Version information embedded at compile time.
pub mod version {
    /// The current version of gitrel.
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");

    /// The git SHA at compile time (if available).
    pub const GIT_SHA: Option<&str> = option_env!("VERGEN_GIT_SHA");

    /// The git commit date at compile time (if available).
    pub const GIT_COMMIT_DATE: Option<&str> = option_env!("VERGEN_GIT_COMMIT_DATE");

    /// Get a formatted version string.
    pub fn version_string() -> String {
        match (GIT_SHA, GIT_COMMIT_DATE) {
            (Some(sha), Some(date)) => {
                format!("{} ({} {})", VERSION, &sha[..7.min(sha.len())], date)
            }
            (Some(sha), None) => {
                format!("{} ({})", VERSION, &sha[..7.min(sha.len())])
            }
            _ => VERSION.to_string(),
        }
    }

}
