// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// gitrel - typed git operations for release workflows
#[derive(Parser, Debug)]
#[command(name = "gitrel")]
#[command(author = "Eshan Roy")]
#[command(version)]
#[command(about = "Typed git operations for release workflows", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// The command to run
    #[command(subcommand)]
    pub command: Commands,

    /// Run against this directory instead of the current one
    #[arg(short = 'C', long, global = true, env = "GITREL_CWD")]
    pub cwd: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Output format for machine-readable output
    #[arg(long, global = true, value_enum)]
    pub format: Option<OutputFormat>,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

/// Output format for CI and scripting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Plain text output (default)
    #[default]
    Text,
    /// JSON output for machine parsing
    Json,
}

/// Available commands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Print the current branch ("HEAD" when detached)
    Branch,

    /// Report whether HEAD is detached
    Detached,

    /// Report repository state: initialized, has commits, has tags, detached
    Status,

    /// Print the SHA of HEAD
    Sha(ShaArgs),

    /// Print the top-level directory of the working tree
    Root,

    /// Print the nearest tag reachable from HEAD
    LastTag,

    /// Print the most recent commit reachable from any tag
    LastTaggedCommit,

    /// Print the root commit of HEAD
    FirstCommit,

    /// List files changed since a commit, optionally under a path
    DiffSince(DiffSinceArgs),

    /// Stage files
    Add(AddArgs),

    /// Commit staged changes without running hooks
    Commit(CommitArgs),

    /// Create an annotated tag
    Tag(TagArgs),

    /// Push the current branch, then the given tags
    Push(PushArgs),

    /// Restore files matching a glob to their committed state
    Checkout(CheckoutArgs),

    /// Create a repository in the working directory
    Init,

    /// Report whether the current branch is behind its upstream
    Behind(BehindArgs),

    /// Print version information
    Version,

    /// Write an example gitrel.toml
    InitConfig(InitConfigArgs),
}

/// Arguments for the sha command.
#[derive(Parser, Debug, Default, Clone)]
pub struct ShaArgs {
    /// Print the abbreviated SHA
    #[arg(short, long)]
    pub short: bool,
}

/// Arguments for the diff-since command.
#[derive(Parser, Debug, Clone)]
pub struct DiffSinceArgs {
    /// Commit, tag or other revision to diff against
    pub committish: String,

    /// Only list changes under this path
    pub path: Option<PathBuf>,
}

/// Arguments for the add command.
#[derive(Parser, Debug, Clone)]
pub struct AddArgs {
    /// Files to stage
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

/// Arguments for the commit command.
#[derive(Parser, Debug, Clone)]
pub struct CommitArgs {
    /// Commit message; repeat to add paragraphs
    #[arg(short, long, required = true)]
    pub message: Vec<String>,
}

impl CommitArgs {
    /// Paragraphs joined the way `git commit -m a -m b` joins them.
    pub fn full_message(&self) -> String {
        self.message.join("\n\n")
    }
}

/// Arguments for the tag command.
#[derive(Parser, Debug, Clone)]
pub struct TagArgs {
    /// Tag name, also used as the tag message
    pub name: String,
}

/// Arguments for the push command.
#[derive(Parser, Debug, Clone)]
pub struct PushArgs {
    /// Remote to push to (defaults to the configured remote)
    #[arg(short, long)]
    pub remote: Option<String>,

    /// Tags to push after the branch
    pub tags: Vec<String>,
}

/// Arguments for the checkout command.
#[derive(Parser, Debug, Clone)]
pub struct CheckoutArgs {
    /// Pathspec glob to restore
    pub glob: String,
}

/// Arguments for the behind command.
#[derive(Parser, Debug, Default, Clone)]
pub struct BehindArgs {
    /// Remote to compare against (defaults to the configured remote)
    #[arg(short, long)]
    pub remote: Option<String>,
}

/// Arguments for the init-config command.
#[derive(Parser, Debug, Default, Clone)]
pub struct InitConfigArgs {
    /// Overwrite an existing configuration file
    #[arg(short, long)]
    pub force: bool,
}

impl Cli {
    /// Selected output format, text unless asked otherwise.
    pub fn output_format(&self) -> OutputFormat {
        self.format.unwrap_or_default()
    }
}
