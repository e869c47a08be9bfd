// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Command dispatch and execution.

use std::future::Future;
use std::path::{Path, PathBuf};

use console::style;
use serde_json::json;

use crate::config::{load_config_for, merge_configs, GitrelConfig};
use crate::error::{ConfigError, GitrelError, Result, ResultExt};
use crate::git::{Git, InvocationContext};

use super::args::{Cli, Commands, OutputFormat};

/// Run the CLI with the given arguments.
pub fn run(cli: Cli) -> Result<()> {
    let cwd = resolve_cwd(cli.cwd.as_deref())?;

    // Load configuration; an explicit file is layered over the discovered one
    let discovered = load_config_for(&cwd)?;
    let config = match &cli.config {
        Some(config_path) => merge_configs(discovered, GitrelConfig::load_from(config_path)?),
        None => discovered,
    };

    let git = Git::from_config(&config);
    let ctx = config.context(&cwd);
    let out = Printer {
        format: cli.output_format(),
    };

    tracing::debug!("Running {:?} in {:?}", cli.command, cwd);

    match cli.command {
        Commands::Branch => {
            let branch = git.current_branch(&ctx)?;
            out.value("branch", &branch);
        }
        Commands::Detached => out.flag("detached", git.is_detached_head(&ctx)?),
        Commands::Status => run_status(&git, &config, &ctx, &out)?,
        Commands::Sha(args) => {
            let sha = if args.short {
                git.short_sha(&ctx)?
            } else {
                git.current_sha(&ctx)?
            };
            out.value("sha", &sha);
        }
        Commands::Root => out.value("root", &git.workspace_root(&ctx)?),
        Commands::LastTag => out.value("tag", &git.last_tag(&ctx)?),
        Commands::LastTaggedCommit => out.value("commit", &git.last_tagged_commit(&ctx)?),
        Commands::FirstCommit => out.value("commit", &git.first_commit(&ctx)?),
        Commands::DiffSince(args) => {
            let location = args.path.unwrap_or_else(|| cwd.clone());
            let files = git.diff_since_in(&args.committish, &location, &ctx)?;
            out.list("files", &files);
        }
        Commands::Add(args) => {
            block_on(git.add_files(&args.files, &ctx))??;
            out.done(&format!("Staged {} file(s)", args.files.len()));
        }
        Commands::Commit(args) => {
            block_on(git.commit(&args.full_message(), &ctx))??;
            out.done("Committed");
        }
        Commands::Tag(args) => {
            block_on(git.add_tag(&args.name, &ctx))??;
            out.done(&format!("Tagged {}", args.name));
        }
        Commands::Push(args) => {
            let remote = args.remote.unwrap_or_else(|| config.release.remote.clone());
            block_on(git.push_with_tags(&remote, &args.tags, &ctx))??;
            out.done(&format!("Pushed to {}", remote));
        }
        Commands::Checkout(args) => {
            block_on(git.checkout_changes(&args.glob, &ctx))??;
            out.done(&format!("Restored {}", args.glob));
        }
        Commands::Init => {
            git.init(&ctx)?;
            out.done(&format!("Initialized repository in {}", cwd.display()));
        }
        Commands::Behind(args) => {
            let remote = args.remote.unwrap_or_else(|| config.release.remote.clone());
            run_behind(&git, &remote, &ctx, &out)?;
        }
        Commands::Version => run_version(),
        Commands::InitConfig(args) => run_init_config(&cwd, args.force)?,
    }

    Ok(())
}

/// Absolute working directory for the session.
fn resolve_cwd(requested: Option<&Path>) -> Result<PathBuf> {
    let current = std::env::current_dir()?;
    Ok(match requested {
        Some(path) if path.is_absolute() => path.to_path_buf(),
        Some(path) => current.join(path),
        None => current,
    })
}

/// Drive one future to completion on a fresh runtime.
fn block_on<F: Future>(future: F) -> Result<F::Output> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("tokio runtime")?;
    Ok(runtime.block_on(future))
}

/// Run the status command.
fn run_status(
    git: &Git,
    config: &GitrelConfig,
    ctx: &InvocationContext,
    out: &Printer,
) -> Result<()> {
    let initialized = git.is_initialized(ctx);
    let has_commit = git.has_commit(ctx);
    let has_tags = if config.release.strict_tags {
        git.has_tags_strict(ctx)?
    } else {
        git.has_tags(ctx)
    };
    // A repository without commits has no branch to be detached from.
    let detached = if has_commit {
        Some(git.is_detached_head(ctx)?)
    } else {
        None
    };

    match out.format {
        OutputFormat::Json => out.json(json!({
            "initialized": initialized,
            "has_commit": has_commit,
            "has_tags": has_tags,
            "detached": detached,
        })),
        OutputFormat::Text => {
            println!("{} initialized", mark(initialized));
            println!("{} has commits", mark(has_commit));
            println!("{} has tags", mark(has_tags));
            if let Some(detached) = detached {
                println!("{} detached HEAD", mark(detached));
            }
        }
    }
    Ok(())
}

/// Run the behind command.
fn run_behind(git: &Git, remote: &str, ctx: &InvocationContext, out: &Printer) -> Result<()> {
    let counts = git.upstream_counts(remote, ctx)?;

    match out.format {
        OutputFormat::Json => out.json(json!({
            "remote": remote,
            "behind": counts.behind,
            "ahead": counts.ahead,
            "is_behind": counts.is_behind(),
        })),
        OutputFormat::Text => {
            if counts.is_behind() {
                println!(
                    "{} behind {} by {} commit(s), ahead by {}",
                    style("✗").red().bold(),
                    remote,
                    counts.behind,
                    counts.ahead
                );
            } else {
                println!(
                    "{} up to date with {} (ahead by {})",
                    style("✓").green().bold(),
                    remote,
                    counts.ahead
                );
            }
        }
    }
    Ok(())
}

/// Run the version command.
fn run_version() {
    println!("gitrel {}", crate::version::version_string());

    if let Some(sha) = crate::version::GIT_SHA {
        println!("git commit: {}", sha);
    }
    if let Some(date) = crate::version::GIT_COMMIT_DATE {
        println!("commit date: {}", date);
    }
}

/// Run the init-config command.
fn run_init_config(cwd: &Path, force: bool) -> Result<()> {
    use crate::config::default::example_config;

    let config_path = cwd.join("gitrel.toml");

    if config_path.exists() && !force {
        return Err(GitrelError::Config(ConfigError::AlreadyExists { path: config_path }));
    }

    std::fs::write(&config_path, example_config()).context("init-config")?;

    println!("✓ Created {}", config_path.display());

    Ok(())
}

fn mark(ok: bool) -> console::StyledObject<&'static str> {
    if ok {
        style("✓").green().bold()
    } else {
        style("✗").red().bold()
    }
}

/// Renders results as plain text or JSON.
struct Printer {
    format: OutputFormat,
}

impl Printer {
    fn json(&self, value: serde_json::Value) {
        println!("{}", serde_json::to_string_pretty(&value).unwrap_or_default());
    }

    fn value(&self, key: &str, value: &str) {
        match self.format {
            OutputFormat::Text => println!("{}", value),
            OutputFormat::Json => self.json(json!({ key: value })),
        }
    }

    fn flag(&self, key: &str, value: bool) {
        match self.format {
            OutputFormat::Text => println!("{}", value),
            OutputFormat::Json => self.json(json!({ key: value })),
        }
    }

    fn list(&self, key: &str, values: &[String]) {
        match self.format {
            OutputFormat::Text => values.iter().for_each(|v| println!("{}", v)),
            OutputFormat::Json => self.json(json!({ key: values })),
        }
    }

    fn done(&self, message: &str) {
        match self.format {
            OutputFormat::Text => println!("{} {}", style("✓").green().bold(), message),
            OutputFormat::Json => self.json(json!({ "ok": true, "message": message })),
        }
    }
}
