// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Parsing git's textual output.

use serde::Serialize;

use crate::error::GitError;

/// Commit counts between a local branch and its upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AheadBehind {
    /// Commits on the upstream that the local branch lacks.
    pub behind: u64,
    /// Commits on the local branch that the upstream lacks.
    pub ahead: u64,
}

impl AheadBehind {
    pub fn is_behind(&self) -> bool {
        self.behind > 0
    }
}

/// Parse `rev-list --left-right --count` output, `"<left>\t<right>"`.
///
/// The left side is the upstream, so it is the behind count.
pub fn parse_left_right_count(output: &str) -> Result<AheadBehind, GitError> {
    let parse_error = |message: String| GitError::Parse {
        input: output.to_string(),
        message,
    };

    let fields: Vec<&str> = output.trim().split('\t').collect();
    let [behind, ahead] = fields.as_slice() else {
        return Err(parse_error(format!(
            "expected two tab-separated counts, found {} field(s)",
            fields.len()
        )));
    };

    let count = |field: &str| {
        field
            .trim()
            .parse::<u64>()
            .map_err(|e| parse_error(format!("invalid count {field:?}: {e}")))
    };

    Ok(AheadBehind {
        behind: count(*behind)?,
        ahead: count(*ahead)?,
    })
}

/// One path per non-empty line, in git's order.
pub fn parse_path_list(output: &str) -> Vec<String> {
    output
        .lines()
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// What to do when the command behind a query fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Return the error to the caller.
    Propagate,
    /// The failure means "no"; report it quietly.
    Negative,
    /// The failure means "no"; report it as a warning.
    NegativeWithWarning,
}

/// Result of a query under a [`FailurePolicy`].
#[derive(Debug)]
pub enum Outcome<T> {
    /// The command succeeded.
    Value(T),
    /// The command failed and the failure is a valid negative answer.
    Negative(GitError),
    /// The command failed and the failure must reach the caller.
    Failed(GitError),
}

impl<T> Outcome<T> {
    pub fn from_result(result: Result<T, GitError>, policy: FailurePolicy) -> Self {
        match (result, policy) {
            (Ok(value), _) => Outcome::Value(value),
            (Err(err), FailurePolicy::Propagate) => Outcome::Failed(err),
            (Err(err), FailurePolicy::Negative | FailurePolicy::NegativeWithWarning) => {
                Outcome::Negative(err)
            }
        }
    }

    /// Hard failures become `Err`; values and negatives are both answers.
    pub fn into_result(self) -> Result<Option<T>, GitError> {
        match self {
            Outcome::Value(value) => Ok(Some(value)),
            Outcome::Negative(_) => Ok(None),
            Outcome::Failed(err) => Err(err),
        }
    }
}

impl Outcome<bool> {
    /// Collapse to a predicate answer; `Negative` reads as `false`.
    pub fn into_bool(self) -> Result<bool, GitError> {
        self.into_result().map(|answer| answer.unwrap_or(false))
    }
}
