// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! The query façade: one method per git operation a release workflow needs.

use std::path::Path;
use std::sync::Arc;

use crate::config::GitrelConfig;
use crate::error::GitError;

use super::command::{self, GitCommand, COMMIT_MESSAGE_FILE};
use super::context::InvocationContext;
use super::exec::{Executor, ProcessExecutor};
use super::observe::{Observer, SwallowLevel, TracingObserver};
use super::parse::{
    parse_left_right_count, parse_path_list, AheadBehind, FailurePolicy, Outcome,
};
use super::temp::{SystemTempWriter, TempWriter};

/// Branch name `git rev-parse --abbrev-ref HEAD` reports when detached.
pub const DETACHED_HEAD: &str = "HEAD";

/// Typed access to the git command line.
///
/// Holds no repository state: every method takes the [`InvocationContext`]
/// to run against and reflects the repository as it is at call time.
/// Nothing is cached and nothing is serialized; callers must not run two
/// mutating operations against one working tree at the same time.
#[derive(Clone)]
pub struct Git {
    program: String,
    message_file: String,
    executor: Arc<dyn Executor>,
    temp: Arc<dyn TempWriter>,
    observer: Arc<dyn Observer>,
}

impl Default for Git {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Git {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Git")
            .field("program", &self.program)
            .field("message_file", &self.message_file)
            .finish_non_exhaustive()
    }
}

impl Git {
    /// `git` from `$PATH`, real processes, system temp dir, `tracing` output.
    pub fn new() -> Self {
        Self {
            program: "git".to_string(),
            message_file: COMMIT_MESSAGE_FILE.to_string(),
            executor: Arc::new(ProcessExecutor),
            temp: Arc::new(SystemTempWriter::default()),
            observer: Arc::new(TracingObserver),
        }
    }

    /// Build from the `[git]` and `[release]` configuration sections.
    pub fn from_config(config: &GitrelConfig) -> Self {
        Self::new()
            .with_program(config.git.program.clone())
            .with_message_file(config.release.commit_message_file.clone())
    }

    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Name suggested to the temp writer for multi-line commit messages.
    pub fn with_message_file(mut self, name: impl Into<String>) -> Self {
        self.message_file = name.into();
        self
    }

    pub fn with_executor(mut self, executor: impl Executor + 'static) -> Self {
        self.executor = Arc::new(executor);
        self
    }

    pub fn with_temp_writer(mut self, temp: impl TempWriter + 'static) -> Self {
        self.temp = Arc::new(temp);
        self
    }

    pub fn with_observer(mut self, observer: impl Observer + 'static) -> Self {
        self.observer = Arc::new(observer);
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    fn report<T>(
        &self,
        operation: &str,
        result: Result<T, GitError>,
        show: impl Fn(&T) -> String,
    ) -> Result<T, GitError> {
        match &result {
            Ok(value) => self.observer.on_success(operation, &show(value)),
            Err(err) => self.observer.on_failure(operation, err),
        }
        result
    }

    fn run(
        &self,
        operation: &str,
        cmd: GitCommand,
        ctx: &InvocationContext,
    ) -> Result<String, GitError> {
        self.observer.on_call(operation, &cmd);
        let result = self.executor.run(&self.program, cmd.as_args(), ctx);
        self.report(operation, result, String::clone)
    }

    async fn run_async(
        &self,
        operation: &str,
        cmd: GitCommand,
        ctx: &InvocationContext,
    ) -> Result<String, GitError> {
        self.observer.on_call(operation, &cmd);
        let result = self
            .executor
            .run_async(&self.program, cmd.as_args(), ctx)
            .await;
        self.report(operation, result, String::clone)
    }

    /// Resolve a predicate under `policy`, reporting swallowed failures.
    fn predicate(
        &self,
        operation: &str,
        result: Result<bool, GitError>,
        policy: FailurePolicy,
    ) -> Outcome<bool> {
        let outcome = Outcome::from_result(result, policy);
        match &outcome {
            Outcome::Value(answer) => self.observer.on_success(operation, &answer.to_string()),
            Outcome::Negative(err) => {
                let level = if policy == FailurePolicy::NegativeWithWarning {
                    SwallowLevel::Warn
                } else {
                    SwallowLevel::Quiet
                };
                self.observer.on_swallowed(operation, err, level);
            }
            Outcome::Failed(err) => self.observer.on_failure(operation, err),
        }
        outcome
    }

    /// Lenient predicates cannot fail; a `Failed` outcome never reaches here.
    fn lenient(outcome: Outcome<bool>) -> bool {
        outcome.into_bool().unwrap_or(false)
    }

    /// Current branch name, or [`DETACHED_HEAD`] when detached.
    pub fn current_branch(&self, ctx: &InvocationContext) -> Result<String, GitError> {
        self.run("current_branch", command::current_branch(), ctx)
    }

    pub fn is_detached_head(&self, ctx: &InvocationContext) -> Result<bool, GitError> {
        let detached = self.current_branch(ctx)? == DETACHED_HEAD;
        self.observer
            .on_success("is_detached_head", &detached.to_string());
        Ok(detached)
    }

    /// Whether the context's directory is inside a repository.
    pub fn is_initialized(&self, ctx: &InvocationContext) -> bool {
        let cmd = command::repository_probe();
        self.observer.on_call("is_initialized", &cmd);
        let result = self
            .executor
            .probe(&self.program, cmd.as_args(), ctx)
            .map(|()| true);
        Self::lenient(self.predicate("is_initialized", result, FailurePolicy::Negative))
    }

    /// Whether HEAD has any history.
    pub fn has_commit(&self, ctx: &InvocationContext) -> bool {
        let cmd = command::history();
        self.observer.on_call("has_commit", &cmd);
        let result = self
            .executor
            .probe(&self.program, cmd.as_args(), ctx)
            .map(|()| true);
        Self::lenient(self.predicate("has_commit", result, FailurePolicy::Negative))
    }

    fn tags_outcome(&self, ctx: &InvocationContext, policy: FailurePolicy) -> Outcome<bool> {
        let cmd = command::list_tags();
        self.observer.on_call("has_tags", &cmd);
        let result = self
            .executor
            .run(&self.program, cmd.as_args(), ctx)
            .map(|tags| !tags.is_empty());
        self.predicate("has_tags", result, policy)
    }

    /// Whether any tag exists. A failing listing reads as "no tags" and is
    /// reported as a warning.
    pub fn has_tags(&self, ctx: &InvocationContext) -> bool {
        Self::lenient(self.tags_outcome(ctx, FailurePolicy::NegativeWithWarning))
    }

    /// Like [`Git::has_tags`], but a failing listing is an error.
    pub fn has_tags_strict(&self, ctx: &InvocationContext) -> Result<bool, GitError> {
        self.tags_outcome(ctx, FailurePolicy::Propagate).into_bool()
    }

    /// Most recent commit reachable from any tag.
    pub fn last_tagged_commit(&self, ctx: &InvocationContext) -> Result<String, GitError> {
        self.run("last_tagged_commit", command::last_tagged_commit(), ctx)
    }

    /// Root commit(s) of HEAD, one per line.
    pub fn first_commit(&self, ctx: &InvocationContext) -> Result<String, GitError> {
        self.run("first_commit", command::first_commit(), ctx)
    }

    /// Nearest tag reachable from HEAD.
    pub fn last_tag(&self, ctx: &InvocationContext) -> Result<String, GitError> {
        self.run("last_tag", command::last_tag(), ctx)
    }

    pub fn current_sha(&self, ctx: &InvocationContext) -> Result<String, GitError> {
        self.run("current_sha", command::current_sha(), ctx)
    }

    pub fn short_sha(&self, ctx: &InvocationContext) -> Result<String, GitError> {
        self.run("short_sha", command::short_sha(), ctx)
    }

    /// Top-level directory of the working tree, as git prints it.
    pub fn workspace_root(&self, ctx: &InvocationContext) -> Result<String, GitError> {
        self.run("workspace_root", command::workspace_root(), ctx)
    }

    /// Files changed since `committish`, limited to `location` unless it is
    /// the working directory itself.
    pub fn diff_since_in(
        &self,
        committish: &str,
        location: &Path,
        ctx: &InvocationContext,
    ) -> Result<Vec<String>, GitError> {
        let cmd = command::diff_since(ctx, committish, location);
        self.run("diff_since_in", cmd, ctx)
            .map(|out| parse_path_list(&out))
    }

    /// Refresh every remote, then count commits between `<remote>/<branch>`
    /// and the current branch.
    pub fn upstream_counts(
        &self,
        remote: &str,
        ctx: &InvocationContext,
    ) -> Result<AheadBehind, GitError> {
        self.run("remote_update", command::remote_update(), ctx)?;

        let branch = self.current_branch(ctx)?;
        let output = self.run(
            "upstream_counts",
            command::left_right_count(remote, &branch),
            ctx,
        )?;

        let counts = parse_left_right_count(&output);
        self.report("upstream_counts", counts, |c| {
            format!(
                "{branch} is behind {remote}/{branch} by {} commit(s) and ahead by {}",
                c.behind, c.ahead
            )
        })
    }

    pub fn is_behind_upstream(
        &self,
        remote: &str,
        ctx: &InvocationContext,
    ) -> Result<bool, GitError> {
        Ok(self.upstream_counts(remote, ctx)?.is_behind())
    }

    /// Create a repository in the context's directory.
    pub fn init(&self, ctx: &InvocationContext) -> Result<(), GitError> {
        self.run("init", command::init(), ctx).map(drop)
    }

    /// Stage `files`, given relative to the context or as absolute paths.
    pub async fn add_files<P: AsRef<Path>>(
        &self,
        files: &[P],
        ctx: &InvocationContext,
    ) -> Result<(), GitError> {
        let cmd = command::add(ctx, files);
        self.run_async("add_files", cmd, ctx).await.map(drop)
    }

    /// Commit what is staged without running hooks.
    ///
    /// Multi-line messages are passed through a temporary file, which is
    /// removed once git has finished with it.
    pub async fn commit(&self, message: &str, ctx: &InvocationContext) -> Result<(), GitError> {
        let (cmd, message_file) =
            match command::commit(message, self.temp.as_ref(), &self.message_file) {
                Ok(prepared) => prepared,
                Err(err) => {
                    self.observer.on_failure("commit", &err);
                    return Err(err);
                }
            };

        let result = self.run_async("commit", cmd, ctx).await;
        if let Some(path) = message_file {
            // Best effort; the commit result is what gets returned.
            let _ = std::fs::remove_file(path);
        }
        result.map(drop)
    }

    /// Create an annotated tag whose message is the tag name.
    pub async fn add_tag(&self, tag: &str, ctx: &InvocationContext) -> Result<(), GitError> {
        self.run_async("add_tag", command::annotated_tag(tag), ctx)
            .await
            .map(drop)
    }

    /// Push the current branch to `remote`, then push `tags`.
    ///
    /// The two pushes run strictly in order; if the branch push fails the
    /// tags are not pushed.
    pub async fn push_with_tags<S: AsRef<str>>(
        &self,
        remote: &str,
        tags: &[S],
        ctx: &InvocationContext,
    ) -> Result<(), GitError> {
        let branch = self
            .run_async("current_branch", command::current_branch(), ctx)
            .await?;

        self.run_async("push_with_tags", command::push(remote, [branch]), ctx)
            .await?;

        let tags: Vec<String> = tags.iter().map(|t| t.as_ref().to_string()).collect();
        self.run_async("push_with_tags", command::push(remote, tags), ctx)
            .await
            .map(drop)
    }

    /// Restore working-tree files matching `file_glob` to their committed
    /// state.
    pub async fn checkout_changes(
        &self,
        file_glob: &str,
        ctx: &InvocationContext,
    ) -> Result<(), GitError> {
        self.run_async("checkout_changes", command::checkout(file_glob), ctx)
            .await
            .map(drop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::testing::{Call, FakeExecutor, RecordingObserver, RecordingTempWriter};

    fn ctx() -> InvocationContext {
        InvocationContext::new("/work/repo")
    }

    fn git(executor: &FakeExecutor) -> Git {
        Git::new()
            .with_executor(executor.clone())
            .with_temp_writer(RecordingTempWriter::default())
    }

    #[test]
    fn test_current_branch_and_detached_agree() {
        let exec = FakeExecutor::new().respond("rev-parse --abbrev-ref HEAD", "main\n");
        let git = git(&exec);
        assert_eq!(git.current_branch(&ctx()).unwrap(), "main");
        assert!(!git.is_detached_head(&ctx()).unwrap());

        let exec = FakeExecutor::new().respond("rev-parse --abbrev-ref HEAD", "HEAD");
        let git = self::git(&exec);
        assert_eq!(git.current_branch(&ctx()).unwrap(), DETACHED_HEAD);
        assert!(git.is_detached_head(&ctx()).unwrap());
    }

    #[test]
    fn test_detached_head_propagates_branch_failure() {
        let exec = FakeExecutor::new().fail(
            "rev-parse --abbrev-ref HEAD",
            128,
            "fatal: not a git repository",
        );
        let err = git(&exec).is_detached_head(&ctx()).unwrap_err();
        assert_eq!(err.exit_code(), Some(128));
    }

    #[test]
    fn test_is_initialized_uses_probe_and_swallows_failure() {
        let exec = FakeExecutor::new();
        assert!(git(&exec).is_initialized(&ctx()));
        assert_eq!(exec.calls(), [Call::probe("rev-parse")]);

        let exec = FakeExecutor::new().fail("rev-parse", 128, "fatal: not a git repository");
        let observer = RecordingObserver::default();
        let git = git(&exec).with_observer(observer.clone());
        assert!(!git.is_initialized(&ctx()));
        assert_eq!(
            observer.swallowed(),
            [("is_initialized".to_string(), SwallowLevel::Quiet)]
        );
    }

    #[test]
    fn test_has_commit_swallows_failure() {
        let exec = FakeExecutor::new().respond("log", "commit abc\n");
        assert!(git(&exec).has_commit(&ctx()));
        assert_eq!(exec.calls(), [Call::probe("log")]);

        let exec = FakeExecutor::new().fail("log", 128, "fatal: bad default revision 'HEAD'");
        assert!(!git(&exec).has_commit(&ctx()));
    }

    #[test]
    fn test_has_tags_inspects_output() {
        let exec = FakeExecutor::new().respond("tag", "v1.0.0\nv1.1.0");
        assert!(git(&exec).has_tags(&ctx()));

        let exec = FakeExecutor::new().respond("tag", "");
        let observer = RecordingObserver::default();
        assert!(!git(&exec).with_observer(observer.clone()).has_tags(&ctx()));
        assert!(observer.swallowed().is_empty());
    }

    #[test]
    fn test_has_tags_failure_warns() {
        let exec = FakeExecutor::new().fail("tag", 128, "fatal: not a git repository");
        let observer = RecordingObserver::default();
        let git = git(&exec).with_observer(observer.clone());

        assert!(!git.has_tags(&ctx()));
        assert_eq!(observer.swallowed(), [("has_tags".to_string(), SwallowLevel::Warn)]);

        let err = git.has_tags_strict(&ctx()).unwrap_err();
        assert_eq!(err.exit_code(), Some(128));
    }

    #[test]
    fn test_single_shot_queries_are_verbatim() {
        let exec = FakeExecutor::new()
            .respond("rev-list --tags --max-count=1", "abc123\n")
            .respond("rev-list --max-parents=0 HEAD", "0000aaa\n")
            .respond("describe --tags --abbrev=0", "v1.2.3\n")
            .respond("rev-parse HEAD", "deadbeefcafe\n")
            .respond("rev-parse --short HEAD", "deadbee\n")
            .respond("rev-parse --show-toplevel", "/work/repo\n");
        let git = git(&exec);
        let ctx = ctx();

        assert_eq!(git.last_tagged_commit(&ctx).unwrap(), "abc123");
        assert_eq!(git.first_commit(&ctx).unwrap(), "0000aaa");
        assert_eq!(git.last_tag(&ctx).unwrap(), "v1.2.3");
        assert_eq!(git.current_sha(&ctx).unwrap(), "deadbeefcafe");
        assert_eq!(git.short_sha(&ctx).unwrap(), "deadbee");
        assert_eq!(git.workspace_root(&ctx).unwrap(), "/work/repo");
    }

    #[test]
    fn test_query_failure_is_propagated_with_details() {
        let exec =
            FakeExecutor::new().fail("describe --tags --abbrev=0", 128, "fatal: No names found");
        let observer = RecordingObserver::default();
        let err = git(&exec)
            .with_observer(observer.clone())
            .last_tag(&ctx())
            .unwrap_err();

        assert_eq!(err.exit_code(), Some(128));
        assert_eq!(err.stderr(), Some("fatal: No names found"));
        assert_eq!(observer.failures(), ["last_tag"]);
    }

    #[test]
    fn test_diff_since_in_parses_paths() {
        let exec = FakeExecutor::new().respond(
            "diff --name-only v1.0.0 -- packages/a",
            "packages/a/index.js\npackages/a/package.json\n",
        );
        let files = git(&exec)
            .diff_since_in("v1.0.0", Path::new("/work/repo/packages/a"), &ctx())
            .unwrap();
        assert_eq!(files, ["packages/a/index.js", "packages/a/package.json"]);
    }

    #[test]
    fn test_diff_since_in_same_directory_omits_pathspec() {
        let exec = FakeExecutor::new();
        git(&exec)
            .diff_since_in("v1.0.0", Path::new("/work/repo"), &ctx())
            .unwrap();
        assert_eq!(exec.calls(), [Call::sync("diff --name-only v1.0.0")]);
    }

    #[test]
    fn test_is_behind_upstream() {
        let exec = FakeExecutor::new()
            .respond("rev-parse --abbrev-ref HEAD", "main")
            .respond("rev-list --left-right --count origin/main...main", "2\t3");
        let git = git(&exec);
        assert!(git.is_behind_upstream("origin", &ctx()).unwrap());
        assert_eq!(
            exec.calls(),
            [
                Call::sync("remote update"),
                Call::sync("rev-parse --abbrev-ref HEAD"),
                Call::sync("rev-list --left-right --count origin/main...main"),
            ]
        );

        let exec = FakeExecutor::new()
            .respond("rev-parse --abbrev-ref HEAD", "main")
            .respond("rev-list --left-right --count origin/main...main", "0\t3");
        let counts = self::git(&exec).upstream_counts("origin", &ctx()).unwrap();
        assert_eq!(counts, AheadBehind { behind: 0, ahead: 3 });
        assert!(!self::git(&exec).is_behind_upstream("origin", &ctx()).unwrap());
    }

    #[test]
    fn test_is_behind_upstream_refresh_failure_stops() {
        let exec = FakeExecutor::new().fail("remote update", 1, "fatal: unable to access remote");
        let err = git(&exec).is_behind_upstream("origin", &ctx()).unwrap_err();
        assert_eq!(err.exit_code(), Some(1));
        assert_eq!(exec.calls(), [Call::sync("remote update")]);
    }

    #[test]
    fn test_is_behind_upstream_parse_failure_is_distinct() {
        let exec = FakeExecutor::new()
            .respond("rev-parse --abbrev-ref HEAD", "main")
            .respond("rev-list --left-right --count origin/main...main", "garbage");
        let err = git(&exec).is_behind_upstream("origin", &ctx()).unwrap_err();
        assert!(matches!(err, GitError::Parse { .. }));
    }

    #[test]
    fn test_init() {
        let exec = FakeExecutor::new();
        git(&exec).init(&ctx()).unwrap();
        assert_eq!(exec.calls(), [Call::sync("init")]);
    }

    #[tokio::test]
    async fn test_add_files_normalizes_paths() {
        let exec = FakeExecutor::new();
        git(&exec)
            .add_files(&["/work/repo/packages/a/package.json", "lerna.json"], &ctx())
            .await
            .unwrap();
        assert_eq!(
            exec.calls(),
            [Call::asynchronous("add -- packages/a/package.json lerna.json")]
        );
    }

    #[tokio::test]
    async fn test_commit_single_line_is_inline() {
        let exec = FakeExecutor::new();
        let temp = RecordingTempWriter::default();
        let git = git(&exec).with_temp_writer(temp.clone());

        git.commit("Publish", &ctx()).await.unwrap();

        assert!(temp.writes().is_empty());
        assert_eq!(exec.calls(), [Call::asynchronous("commit --no-verify -m Publish")]);
    }

    #[tokio::test]
    async fn test_commit_multi_line_goes_through_temp_file() {
        let exec = FakeExecutor::new();
        let temp = RecordingTempWriter::default();
        let git = git(&exec)
            .with_temp_writer(temp.clone())
            .with_message_file("release-message.txt");

        git.commit("Publish\n\n - a@1.0.0", &ctx()).await.unwrap();

        let writes = temp.writes();
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].1, "release-message.txt");
        let calls = exec.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].line.starts_with("commit --no-verify -F "));
    }

    #[tokio::test]
    async fn test_commit_failure_propagates() {
        let exec =
            FakeExecutor::new().fail("commit --no-verify -m Publish", 1, "nothing to commit");
        let err = git(&exec).commit("Publish", &ctx()).await.unwrap_err();
        assert_eq!(err.stderr(), Some("nothing to commit"));
    }

    #[tokio::test]
    async fn test_add_tag_is_annotated() {
        let exec = FakeExecutor::new();
        git(&exec).add_tag("v1.0.0", &ctx()).await.unwrap();
        assert_eq!(exec.calls(), [Call::asynchronous("tag v1.0.0 -m v1.0.0")]);
    }

    #[tokio::test]
    async fn test_push_with_tags_is_sequential() {
        let exec = FakeExecutor::new().respond("rev-parse --abbrev-ref HEAD", "main");
        git(&exec)
            .push_with_tags("origin", &["a@1.0.0", "b@2.0.0"], &ctx())
            .await
            .unwrap();

        assert_eq!(
            exec.calls(),
            [
                Call::asynchronous("rev-parse --abbrev-ref HEAD"),
                Call::asynchronous("push origin main"),
                Call::asynchronous("push origin a@1.0.0 b@2.0.0"),
            ]
        );
    }

    #[tokio::test]
    async fn test_push_with_tags_stops_after_branch_failure() {
        let exec = FakeExecutor::new()
            .respond("rev-parse --abbrev-ref HEAD", "main")
            .fail("push origin main", 1, "! [rejected] main -> main (fetch first)");
        let err = git(&exec)
            .push_with_tags("origin", &["v1.0.0"], &ctx())
            .await
            .unwrap_err();

        assert_eq!(err.exit_code(), Some(1));
        let pushes: Vec<_> = exec
            .calls()
            .into_iter()
            .filter(|c| c.line.starts_with("push"))
            .collect();
        assert_eq!(pushes, [Call::asynchronous("push origin main")]);
    }

    #[tokio::test]
    async fn test_checkout_changes() {
        let exec = FakeExecutor::new();
        git(&exec)
            .checkout_changes("packages/*/package.json", &ctx())
            .await
            .unwrap();
        assert_eq!(
            exec.calls(),
            [Call::asynchronous("checkout -- packages/*/package.json")]
        );
    }

    #[test]
    fn test_from_config_uses_program() {
        let mut config = GitrelConfig::default();
        config.git.program = "/usr/local/bin/git".to_string();
        let exec = FakeExecutor::new();
        let git = Git::from_config(&config).with_executor(exec.clone());

        git.short_sha(&ctx()).unwrap();
        assert_eq!(git.program(), "/usr/local/bin/git");
        assert_eq!(exec.programs(), ["/usr/local/bin/git"]);
    }
}
