//! Fleet command implementation
//!
//! Prints the banner, discovers repositories under the root, draws the live
//! table while the command runs, and reports the elapsed time.

use anyhow::{Context, Result};
use std::io::{self, Write};
use std::sync::Arc;

use crate::core::{
    create_spinner, discover, Fleet, FleetOrchestrator, FramePresenter, RunConfig, TableRenderer,
    NO_REPOS_MESSAGE, SCANNING_MESSAGE,
};
use crate::git::GitCommand;
use crate::process::{CommandRunner, SystemRunner};

const APP_NAME: &str = "GitGulf";

/// Human title of an operation, shared by the banner and the summary
fn operation_title(command: &GitCommand) -> String {
    match command {
        GitCommand::Status => "Status check".to_string(),
        GitCommand::Fetch => "Fetch operation".to_string(),
        GitCommand::Pull => "Pull operation".to_string(),
        GitCommand::Rebase => "Pull --rebase operation".to_string(),
        GitCommand::Checkout(branch) => format!("Switching to branch {branch}"),
    }
}

/// First line printed for a run, e.g. `GitGulf: Fetch operation:`
pub fn banner(command: &GitCommand) -> String {
    match command {
        GitCommand::Checkout(branch) => format!("{APP_NAME}: Switched to branch {branch}:"),
        other => format!("{APP_NAME}: {}:", operation_title(other)),
    }
}

/// Closing line with the wall-clock time of the whole run
pub fn summary_line(command: &GitCommand, elapsed_secs: f64) -> String {
    format!(
        "{} took {elapsed_secs:.2} seconds to complete.",
        operation_title(command)
    )
}

/// Handles one fleet command on stdout with the system git
pub async fn handle_command(command: GitCommand, config: &RunConfig) -> Result<()> {
    let runner: Arc<dyn CommandRunner> = Arc::new(SystemRunner);
    run_fleet_command(&command, config, runner, io::stdout()).await?;
    Ok(())
}

/// Discovers the fleet, runs `command` across it and writes everything to `out`
///
/// Returns the final fleet. Only an unreadable root or a failed write is an
/// error; per-repository failures never are.
pub async fn run_fleet_command<W: Write>(
    command: &GitCommand,
    config: &RunConfig,
    runner: Arc<dyn CommandRunner>,
    mut out: W,
) -> Result<Fleet> {
    writeln!(out, "{}", banner(command))?;
    out.flush()?;

    let spinner = create_spinner(SCANNING_MESSAGE)?;
    let discovered = discover(&config.root, Arc::clone(&runner), &config.process).await;
    spinner.finish_and_clear();
    let mut fleet = discovered
        .with_context(|| format!("Failed to read directory {}", config.root.display()))?;

    if fleet.is_empty() {
        writeln!(out, "{NO_REPOS_MESSAGE}")?;
    } else {
        let renderer = TableRenderer::new(Some(config.width), config.color);
        let presenter = FramePresenter::new(&mut out, config.interactive, config.color);
        let mut orchestrator =
            FleetOrchestrator::new(runner, config.process.clone(), renderer, presenter);

        orchestrator.show(&fleet)?;
        orchestrator.run(&mut fleet, command).await?;
    }

    writeln!(out, "{}", summary_line(command, config.elapsed_secs()))?;
    out.flush()?;
    Ok(fleet)
}
