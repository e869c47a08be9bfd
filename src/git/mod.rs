// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Git integration module.
//!
//! Layered strictly downward: the [`Git`] façade builds commands with
//! [`command`], runs them through an [`Executor`], and turns the output into
//! typed values with [`parse`].

pub mod command;
mod context;
pub mod exec;
pub mod observe;
mod ops;
pub mod parse;
pub mod temp;

#[cfg(test)]
pub(crate) mod testing;

pub use command::{normalize_path, GitCommand};
pub use context::{InvocationContext, StdioMode};
pub use exec::{Executor, ProcessExecutor};
pub use observe::{Observer, SwallowLevel, TracingObserver};
pub use ops::{Git, DETACHED_HEAD};
pub use parse::{AheadBehind, FailurePolicy, Outcome};
pub use temp::{SystemTempWriter, TempWriter};
