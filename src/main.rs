//! gitgulf: run one git operation across every repository in a directory
//! and watch the results land in a live table.

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use tokio::sync::watch;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use gitgulf::commands::handle_command;
use gitgulf::core::{RunConfig, UserConfig};
use gitgulf::git::GitCommand;

/// Concurrent git status, fetch, pull, rebase and checkout across a directory of repositories
#[derive(Parser, Debug)]
#[command(name = "gitgulf")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Check out BRANCH in every repository
    #[arg(short, long, value_name = "BRANCH")]
    branch: Option<String>,

    /// Directory whose immediate children are scanned (defaults to the current directory)
    #[arg(short = 'C', long, global = true, value_name = "DIR")]
    root: Option<PathBuf>,

    /// Per-command timeout in seconds; 0 disables it
    #[arg(long, global = true, value_name = "SECS")]
    timeout: Option<u64>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Verb>,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum Verb {
    /// Refresh and show the status of every repository
    Status,
    /// Run `git fetch` everywhere
    Fetch,
    /// Run `git pull` everywhere
    Pull,
    /// Run `git pull --rebase` everywhere
    Rebase,
    /// Check out `development` everywhere
    Development,
    /// Check out `master` everywhere
    Master,
    /// Check out `main` everywhere
    Main,
}

impl Cli {
    fn git_command(&self) -> Option<GitCommand> {
        if let Some(branch) = &self.branch {
            return Some(GitCommand::Checkout(branch.clone()));
        }
        let command = match self.command? {
            Verb::Status => GitCommand::Status,
            Verb::Fetch => GitCommand::Fetch,
            Verb::Pull => GitCommand::Pull,
            Verb::Rebase => GitCommand::Rebase,
            Verb::Development => GitCommand::Checkout("development".to_string()),
            Verb::Master => GitCommand::Checkout("master".to_string()),
            Verb::Main => GitCommand::Checkout("main".to_string()),
        };
        Some(command)
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Flips the interrupt flag on the first Ctrl-C so in-flight commands are killed
fn spawn_interrupt_listener() -> watch::Receiver<bool> {
    let (tx, rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::debug!("interrupt received");
            let _ = tx.send(true);
        }
    });
    rx
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.branch.is_some() && cli.command.is_some() {
        Cli::command()
            .error(
                ErrorKind::ArgumentConflict,
                "--branch cannot be combined with a verb",
            )
            .exit();
    }
    let Some(command) = cli.git_command() else {
        Cli::command()
            .error(
                ErrorKind::MissingSubcommand,
                "a verb (status, fetch, pull, rebase, development, master, main) or --branch is required",
            )
            .exit();
    };

    let root = match cli.root {
        Some(root) => root,
        None => std::env::current_dir().context("Failed to determine current directory")?,
    };

    let process = UserConfig::load()
        .process_options(cli.timeout)
        .with_interrupt(spawn_interrupt_listener());
    let config = RunConfig::from_environment(root, process, cli.no_color);
    tracing::debug!(root = %config.root.display(), width = config.width, color = config.color, "run configured");

    handle_command(command, &config).await
}
