// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Running the git executable.
//!
//! The [`Executor`] trait is the only place gitrel touches child processes.
//! [`ProcessExecutor`] spawns real processes: blocking through
//! `std::process`, non-blocking through `tokio::process`.

use std::process::{Output, Stdio};

use async_trait::async_trait;

use crate::error::GitError;

use super::context::{InvocationContext, StdioMode};

/// Runs a program and classifies the outcome by exit status.
#[async_trait]
pub trait Executor: Send + Sync {
    /// Run to completion on the calling thread.
    ///
    /// Returns stdout without trailing line terminators on exit code 0 and
    /// `GitError::CommandFailed` otherwise.
    fn run(
        &self,
        program: &str,
        args: &[String],
        ctx: &InvocationContext,
    ) -> Result<String, GitError>;

    /// Same contract as [`Executor::run`] without blocking the caller.
    async fn run_async(
        &self,
        program: &str,
        args: &[String],
        ctx: &InvocationContext,
    ) -> Result<String, GitError>;

    /// Run with stdout and stderr discarded; only the exit status counts.
    fn probe(
        &self,
        program: &str,
        args: &[String],
        ctx: &InvocationContext,
    ) -> Result<(), GitError>;
}

/// Spawns real child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessExecutor;

/// Strip trailing `\n` / `\r\n` from captured output.
pub fn trim_output(stdout: &str) -> &str {
    stdout.trim_end_matches(['\r', '\n'])
}

fn render(program: &str, args: &[String]) -> String {
    if args.is_empty() {
        program.to_string()
    } else {
        format!("{} {}", program, args.join(" "))
    }
}

fn spawn_error(command: String, err: std::io::Error) -> GitError {
    let message = if err.kind() == std::io::ErrorKind::NotFound {
        "executable not found. Is git installed?".to_string()
    } else {
        err.to_string()
    };
    GitError::Spawn { command, message }
}

fn classify(command: String, output: Output) -> Result<String, GitError> {
    if output.status.success() {
        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(trim_output(&stdout).to_string())
    } else {
        Err(GitError::CommandFailed {
            command,
            exit_code: output.status.code().unwrap_or(-1),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}

fn stderr_for(ctx: &InvocationContext) -> Stdio {
    match ctx.stdio() {
        StdioMode::Capture => Stdio::piped(),
        StdioMode::InheritStderr => Stdio::inherit(),
    }
}

fn std_command(program: &str, args: &[String], ctx: &InvocationContext) -> std::process::Command {
    let mut cmd = std::process::Command::new(program);
    cmd.args(args)
        .current_dir(ctx.cwd())
        .envs(ctx.env())
        .stdin(Stdio::null());
    cmd
}

#[async_trait]
impl Executor for ProcessExecutor {
    fn run(
        &self,
        program: &str,
        args: &[String],
        ctx: &InvocationContext,
    ) -> Result<String, GitError> {
        let command = render(program, args);
        let output = std_command(program, args, ctx)
            .stdout(Stdio::piped())
            .stderr(stderr_for(ctx))
            .output()
            .map_err(|e| spawn_error(command.clone(), e))?;

        classify(command, output)
    }

    async fn run_async(
        &self,
        program: &str,
        args: &[String],
        ctx: &InvocationContext,
    ) -> Result<String, GitError> {
        let command = render(program, args);
        let mut cmd = tokio::process::Command::new(program);
        cmd.args(args)
            .current_dir(ctx.cwd())
            .envs(ctx.env())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(stderr_for(ctx))
            .kill_on_drop(true);

        let output = cmd
            .output()
            .await
            .map_err(|e| spawn_error(command.clone(), e))?;

        classify(command, output)
    }

    fn probe(
        &self,
        program: &str,
        args: &[String],
        ctx: &InvocationContext,
    ) -> Result<(), GitError> {
        let command = render(program, args);
        let status = std_command(program, args, ctx)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| spawn_error(command.clone(), e))?;

        if status.success() {
            Ok(())
        } else {
            Err(GitError::CommandFailed {
                command,
                exit_code: status.code().unwrap_or(-1),
                stderr: String::new(),
            })
        }
    }
}
