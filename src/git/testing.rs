// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Scripted collaborators for unit tests.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::GitError;

use super::command::GitCommand;
use super::context::InvocationContext;
use super::exec::{trim_output, Executor};
use super::observe::{Observer, SwallowLevel};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Sync,
    Async,
    Probe,
}

/// One recorded invocation; `line` is the arguments joined by spaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub mode: Mode,
    pub line: String,
}

impl Call {
    pub fn sync(line: &str) -> Self {
        Self {
            mode: Mode::Sync,
            line: line.to_string(),
        }
    }

    pub fn asynchronous(line: &str) -> Self {
        Self {
            mode: Mode::Async,
            line: line.to_string(),
        }
    }

    pub fn probe(line: &str) -> Self {
        Self {
            mode: Mode::Probe,
            line: line.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
enum Scripted {
    Output(String),
    Failure { exit_code: i32, stderr: String },
}

#[derive(Debug, Default)]
struct FakeState {
    script: HashMap<String, Scripted>,
    calls: Vec<Call>,
    programs: Vec<String>,
}

/// Answers from a script keyed by argument line; unknown lines succeed with
/// empty output.
#[derive(Debug, Clone, Default)]
pub struct FakeExecutor {
    state: Arc<Mutex<FakeState>>,
}

impl FakeExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, line: &str, stdout: &str) -> Self {
        self.script(line, Scripted::Output(stdout.to_string()))
    }

    pub fn fail(self, line: &str, exit_code: i32, stderr: &str) -> Self {
        self.script(
            line,
            Scripted::Failure {
                exit_code,
                stderr: stderr.to_string(),
            },
        )
    }

    fn script(self, line: &str, answer: Scripted) -> Self {
        self.state
            .lock()
            .unwrap()
            .script
            .insert(line.to_string(), answer);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn programs(&self) -> Vec<String> {
        self.state.lock().unwrap().programs.clone()
    }

    fn answer(&self, mode: Mode, program: &str, args: &[String]) -> Result<String, GitError> {
        let line = args.join(" ");
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call {
            mode,
            line: line.clone(),
        });
        state.programs.push(program.to_string());

        match state.script.get(&line) {
            None => Ok(String::new()),
            Some(Scripted::Output(stdout)) => Ok(trim_output(stdout).to_string()),
            Some(Scripted::Failure { exit_code, stderr }) => Err(GitError::CommandFailed {
                command: format!("{program} {line}"),
                exit_code: *exit_code,
                stderr: stderr.clone(),
            }),
        }
    }
}

#[async_trait]
impl Executor for FakeExecutor {
    fn run(
        &self,
        program: &str,
        args: &[String],
        _ctx: &InvocationContext,
    ) -> Result<String, GitError> {
        self.answer(Mode::Sync, program, args)
    }

    async fn run_async(
        &self,
        program: &str,
        args: &[String],
        _ctx: &InvocationContext,
    ) -> Result<String, GitError> {
        self.answer(Mode::Async, program, args)
    }

    fn probe(
        &self,
        program: &str,
        args: &[String],
        _ctx: &InvocationContext,
    ) -> Result<(), GitError> {
        self.answer(Mode::Probe, program, args).map(drop)
    }
}

/// Remembers what would have been written and hands back fake paths.
#[derive(Debug, Clone, Default)]
pub struct RecordingTempWriter {
    writes: Arc<Mutex<Vec<(String, String)>>>,
}

impl RecordingTempWriter {
    /// `(content, suggested_name)` pairs in write order.
    pub fn writes(&self) -> Vec<(String, String)> {
        self.writes.lock().unwrap().clone()
    }
}

impl super::temp::TempWriter for RecordingTempWriter {
    fn write(&self, content: &str, suggested_name: &str) -> Result<PathBuf, GitError> {
        let mut writes = self.writes.lock().unwrap();
        writes.push((content.to_string(), suggested_name.to_string()));
        Ok(PathBuf::from(format!(
            "/tmp/gitrel-test-{}-{}",
            writes.len(),
            suggested_name
        )))
    }
}

#[derive(Debug, Default)]
struct Events {
    failures: Vec<String>,
    swallowed: Vec<(String, SwallowLevel)>,
}

#[derive(Debug, Clone, Default)]
pub struct RecordingObserver {
    events: Arc<Mutex<Events>>,
}

impl RecordingObserver {
    pub fn failures(&self) -> Vec<String> {
        self.events.lock().unwrap().failures.clone()
    }

    pub fn swallowed(&self) -> Vec<(String, SwallowLevel)> {
        self.events.lock().unwrap().swallowed.clone()
    }
}

impl Observer for RecordingObserver {
    fn on_call(&self, _operation: &str, _command: &GitCommand) {}

    fn on_success(&self, _operation: &str, _value: &str) {}

    fn on_failure(&self, operation: &str, _error: &GitError) {
        self.events.lock().unwrap().failures.push(operation.to_string());
    }

    fn on_swallowed(&self, operation: &str, _error: &GitError, level: SwallowLevel) {
        self.events
            .lock()
            .unwrap()
            .swallowed
            .push((operation.to_string(), level));
    }
}
