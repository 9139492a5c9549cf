//! Per-repository git operations

use std::path::Path;

use tracing::debug;

use super::status::{clean_branch_name, count_changes, parse_ahead_behind};
use crate::core::RepositoryState;
use crate::process::{CommandRunner, ProcessError, ProcessOptions, Result};

const GIT: &str = "git";

// Git command arguments
const GIT_BRANCH_ARGS: &[&str] = &["rev-parse", "--abbrev-ref", "HEAD"];
const GIT_STATUS_BRANCH_ARGS: &[&str] = &["status", "--porcelain", "--branch"];
const GIT_STATUS_SHORT_ARGS: &[&str] = &["status", "-s"];
const GIT_FETCH_ARGS: &[&str] = &["fetch"];
const GIT_PULL_ARGS: &[&str] = &["pull"];
const GIT_REBASE_ARGS: &[&str] = &["pull", "--rebase"];
const GIT_CHECKOUT_ARGS: &[&str] = &["checkout"];

/// Characters never accepted in a branch argument
const DENIED_BRANCH_CHARACTERS: &[char] = &[
    ';', '&', '|', '$', '`', '<', '>', '(', ')', '{', '}', '[', ']', '*', '?', '!', '\\', '"',
    '\'', ' ', '\t', '\n', '\r', '~', '^', ':',
];

/// The operation to run against every repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitCommand {
    Status,
    Fetch,
    Pull,
    Rebase,
    Checkout(String),
}

impl GitCommand {
    /// Short verb used in log lines
    pub fn label(&self) -> &str {
        match self {
            GitCommand::Status => "status",
            GitCommand::Fetch => "fetch",
            GitCommand::Pull => "pull",
            GitCommand::Rebase => "rebase",
            GitCommand::Checkout(_) => "checkout",
        }
    }
}

/// Rejects branch arguments carrying shell metacharacters, whitespace or a leading dash
///
/// No shell is ever involved, but the same string could be reused by callers
/// that do, and a leading dash would be read by git as an option.
pub fn validate_branch_name(branch: &str) -> Result<()> {
    if branch.is_empty() {
        return Err(ProcessError::ExecutionFailed(
            "branch name is empty".to_string(),
        ));
    }
    if branch.starts_with('-') || branch.contains(DENIED_BRANCH_CHARACTERS) {
        return Err(ProcessError::ExecutionFailed(format!(
            "invalid branch name '{}'",
            branch.escape_debug()
        )));
    }
    Ok(())
}

fn git_args(path: &Path, subcommand: &[&str]) -> Vec<String> {
    let mut args = Vec::with_capacity(subcommand.len() + 3);
    args.push(GIT.to_string());
    args.push("-C".to_string());
    args.push(path.to_string_lossy().into_owned());
    args.extend(subcommand.iter().map(|arg| (*arg).to_string()));
    args
}

/// Runs `git -C <path> <subcommand>` and treats a non-zero exit as failure
async fn run_git(
    runner: &dyn CommandRunner,
    path: &Path,
    subcommand: &[&str],
    options: &ProcessOptions,
) -> Result<String> {
    let args = git_args(path, subcommand);
    let output = runner.run(&args, options).await?;
    if !output.success() {
        let detail = output.output.lines().next().unwrap_or_default();
        return Err(ProcessError::ExecutionFailed(format!(
            "'{}' exited with status {}: {}",
            args.join(" "),
            output.status,
            detail
        )));
    }
    Ok(output.output)
}

/// Re-reads branch, ahead/behind and pending-change count
///
/// Any of the three queries failing fails the whole refresh.
pub async fn refresh_status(
    repo: &mut RepositoryState,
    runner: &dyn CommandRunner,
    options: &ProcessOptions,
) -> Result<()> {
    repo.reset_counts();

    let branch = run_git(runner, repo.path(), GIT_BRANCH_ARGS, options).await?;
    repo.branch = clean_branch_name(branch.lines().next().unwrap_or_default());

    let porcelain = run_git(runner, repo.path(), GIT_STATUS_BRANCH_ARGS, options).await?;
    let (ahead, behind) = parse_ahead_behind(&porcelain);
    repo.ahead = ahead;
    repo.behind = behind;

    let short_status = run_git(runner, repo.path(), GIT_STATUS_SHORT_ARGS, options).await?;
    repo.changes = count_changes(&short_status);

    repo.fresh = true;
    debug!(
        repo = repo.name(),
        branch = %repo.branch,
        ahead,
        behind,
        changes = repo.changes,
        "status refreshed"
    );
    Ok(())
}

/// Runs `command` against one repository, refreshing its status afterwards
///
/// A failed step stops the sequence; no refresh follows a failed fetch, pull,
/// rebase or checkout.
pub async fn run_command(
    repo: &mut RepositoryState,
    command: &GitCommand,
    runner: &dyn CommandRunner,
    options: &ProcessOptions,
) -> Result<()> {
    match command {
        GitCommand::Status => {}
        GitCommand::Fetch => {
            run_git(runner, repo.path(), GIT_FETCH_ARGS, options).await?;
        }
        GitCommand::Pull => {
            run_git(runner, repo.path(), GIT_PULL_ARGS, options).await?;
        }
        GitCommand::Rebase => {
            run_git(runner, repo.path(), GIT_REBASE_ARGS, options).await?;
        }
        GitCommand::Checkout(branch) => {
            validate_branch_name(branch)?;
            let mut args = GIT_CHECKOUT_ARGS.to_vec();
            args.push(branch.as_str());
            run_git(runner, repo.path(), &args, options).await?;
        }
    }
    refresh_status(repo, runner, options).await
}
