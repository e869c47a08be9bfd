// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Argument vectors for git invocations.
//!
//! Everything here is pure: builders turn a semantic operation into the exact
//! arguments passed to `git`, without running anything. The one exception is
//! [`commit`], which hands multi-line messages to a [`TempWriter`].

use std::fmt;
use std::path::{Component, Path, PathBuf};

use crate::error::GitError;

use super::context::{anchored, InvocationContext};
use super::temp::TempWriter;

/// Marker separating options from pathspecs.
pub const END_OF_OPTIONS: &str = "--";

/// Default name suggested to the temp writer for commit messages.
pub const COMMIT_MESSAGE_FILE: &str = "gitrel-commit.txt";

/// A git subcommand and its arguments, without the program name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitCommand {
    args: Vec<String>,
}

impl GitCommand {
    pub fn new(subcommand: &str) -> Self {
        Self {
            args: vec![subcommand.to_string()],
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Append `--` followed by the given paths.
    pub fn pathspecs<I, S>(self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.arg(END_OF_OPTIONS).args(paths)
    }

    pub fn as_args(&self) -> &[String] {
        &self.args
    }
}

impl fmt::Display for GitCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.args.join(" "))
    }
}

/// Fold `.` and `..` components without touching the filesystem.
fn fold(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            // `..` above the root stays at the root.
            Component::ParentDir => {
                if matches!(out.components().next_back(), Some(Component::Normal(_))) {
                    out.pop();
                } else if !out.has_root() {
                    out.push(component.as_os_str());
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Express `path` relative to the context's working directory, joined with
/// forward slashes on every platform.
///
/// Relative inputs are resolved against the working directory first. The
/// working directory itself becomes the empty string. A relative `cwd` is
/// anchored to an absolute path before comparing.
pub fn normalize_path(cwd: &Path, path: &Path) -> String {
    let cwd = anchored(cwd.to_path_buf());
    let base = fold(&cwd);
    let target = if path.is_absolute() {
        fold(path)
    } else {
        fold(&cwd.join(path))
    };

    let base_parts: Vec<Component<'_>> = base.components().collect();
    let target_parts: Vec<Component<'_>> = target.components().collect();
    let common = base_parts
        .iter()
        .zip(&target_parts)
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<String> = vec!["..".to_string(); base_parts.len() - common];
    parts.extend(
        target_parts[common..]
            .iter()
            .map(|c| c.as_os_str().to_string_lossy().into_owned()),
    );
    parts.join("/")
}

/// `git rev-parse`, which only succeeds inside a repository.
pub fn repository_probe() -> GitCommand {
    GitCommand::new("rev-parse")
}

pub fn current_branch() -> GitCommand {
    GitCommand::new("rev-parse").args(["--abbrev-ref", "HEAD"])
}

pub fn history() -> GitCommand {
    GitCommand::new("log")
}

pub fn list_tags() -> GitCommand {
    GitCommand::new("tag")
}

/// Stage files, each normalized against the context and placed after `--`.
pub fn add<P: AsRef<Path>>(ctx: &InvocationContext, files: &[P]) -> GitCommand {
    let paths = files
        .iter()
        .map(|file| normalize_path(ctx.cwd(), file.as_ref()));
    GitCommand::new("add").pathspecs(paths)
}

/// Build a hook-bypassing commit.
///
/// Returns the command and, for multi-line messages, the path of the file the
/// message was written to so the caller can remove it afterwards.
pub fn commit(
    message: &str,
    temp: &dyn TempWriter,
    file_name: &str,
) -> Result<(GitCommand, Option<PathBuf>), GitError> {
    let cmd = GitCommand::new("commit").arg("--no-verify");

    if message.contains(['\r', '\n']) {
        let path = temp.write(message, file_name)?;
        let cmd = cmd.arg("-F").arg(path.to_string_lossy());
        Ok((cmd, Some(path)))
    } else {
        Ok((cmd.arg("-m").arg(message), None))
    }
}

/// Annotated tag whose message is the tag name.
pub fn annotated_tag(tag: &str) -> GitCommand {
    GitCommand::new("tag").arg(tag).arg("-m").arg(tag)
}

pub fn push<I, S>(remote: &str, refs: I) -> GitCommand
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    GitCommand::new("push").arg(remote).args(refs)
}

pub fn last_tagged_commit() -> GitCommand {
    GitCommand::new("rev-list").args(["--tags", "--max-count=1"])
}

pub fn first_commit() -> GitCommand {
    GitCommand::new("rev-list").args(["--max-parents=0", "HEAD"])
}

pub fn last_tag() -> GitCommand {
    GitCommand::new("describe").args(["--tags", "--abbrev=0"])
}

pub fn current_sha() -> GitCommand {
    GitCommand::new("rev-parse").arg("HEAD")
}

pub fn short_sha() -> GitCommand {
    GitCommand::new("rev-parse").args(["--short", "HEAD"])
}

pub fn workspace_root() -> GitCommand {
    GitCommand::new("rev-parse").arg("--show-toplevel")
}

/// Names of files changed since `committish`, limited to `location` unless
/// it resolves to the working directory itself.
pub fn diff_since(ctx: &InvocationContext, committish: &str, location: &Path) -> GitCommand {
    let cmd = GitCommand::new("diff").arg("--name-only").arg(committish);
    let relative = normalize_path(ctx.cwd(), location);

    if relative.is_empty() {
        cmd
    } else {
        cmd.pathspecs([relative])
    }
}

pub fn checkout(file_glob: &str) -> GitCommand {
    GitCommand::new("checkout").pathspecs([file_glob])
}

pub fn init() -> GitCommand {
    GitCommand::new("init")
}

/// Fetch every remote.
pub fn remote_update() -> GitCommand {
    GitCommand::new("remote").arg("update")
}

/// Commits on `<remote>/<branch>` but not `<branch>` (left) and vice versa
/// (right).
pub fn left_right_count(remote: &str, branch: &str) -> GitCommand {
    GitCommand::new("rev-list").args([
        "--left-right".to_string(),
        "--count".to_string(),
        format!("{remote}/{branch}...{branch}"),
    ])
}
