//! Runs one git command across the whole fleet.
//!
//! Every repository gets its own task working on a copy of its record. The
//! orchestrator is the only owner of the fleet: it collects results as they
//! land, applies them, and renders and presents a frame after each one, so
//! frames never interleave.

use futures::stream::{FuturesUnordered, StreamExt};
use futures::FutureExt;
use std::io::{self, Write};
use std::sync::Arc;
use tokio::task::AbortHandle;
use tracing::{debug, warn};

use super::presenter::FramePresenter;
use super::renderer::TableRenderer;
use crate::core::repository::Fleet;
use crate::git::{run_command, GitCommand};
use crate::process::{CommandRunner, ProcessOptions};

/// Per-repository outcome counts for one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub succeeded: usize,
    pub failed: usize,
}

pub struct FleetOrchestrator<W: Write> {
    runner: Arc<dyn CommandRunner>,
    options: ProcessOptions,
    renderer: TableRenderer,
    presenter: FramePresenter<W>,
}

impl<W: Write> FleetOrchestrator<W> {
    pub fn new(
        runner: Arc<dyn CommandRunner>,
        options: ProcessOptions,
        renderer: TableRenderer,
        presenter: FramePresenter<W>,
    ) -> Self {
        Self {
            runner,
            options,
            renderer,
            presenter,
        }
    }

    /// Presents the current state as a non-final frame
    pub fn show(&mut self, fleet: &Fleet) -> io::Result<()> {
        self.present(fleet, false)
    }

    fn present(&mut self, fleet: &Fleet, is_final: bool) -> io::Result<()> {
        let frame = self.renderer.render(fleet);
        self.presenter.present(&frame, is_final)
    }

    /// Runs `command` against every member concurrently and redraws as each finishes
    ///
    /// A failed repository keeps its previous record. Either way the record
    /// is marked fresh once its attempt is over. Ends with a final frame.
    pub async fn run(&mut self, fleet: &mut Fleet, command: &GitCommand) -> io::Result<RunSummary> {
        let mut pending = FuturesUnordered::new();
        let mut handles = Vec::with_capacity(fleet.len());
        for repo in fleet.iter() {
            let mut repo = repo.clone();
            let name = repo.name().to_string();
            let runner = Arc::clone(&self.runner);
            let options = self.options.clone();
            let command = command.clone();

            let task = tokio::spawn(async move {
                run_command(&mut repo, &command, runner.as_ref(), &options)
                    .await
                    .map(|()| repo)
            });
            handles.push(task.abort_handle());
            pending.push(task.map(move |joined| (name, joined)));
        }

        let mut summary = RunSummary::default();
        while let Some((name, joined)) = pending.next().await {
            match joined {
                Ok(Ok(repo)) => {
                    fleet.update(repo);
                    summary.succeeded += 1;
                }
                Ok(Err(e)) => {
                    debug!(repo = %name, command = command.label(), error = %e, "command failed");
                    summary.failed += 1;
                }
                Err(e) => {
                    warn!(repo = %name, error = %e, "repository task aborted");
                    summary.failed += 1;
                }
            }
            if let Some(repo) = fleet.get_mut(&name) {
                repo.fresh = true;
            }
            if let Err(e) = self.present(fleet, false) {
                // Dropping a task's future kills its subprocess
                handles.iter().for_each(AbortHandle::abort);
                return Err(e);
            }
        }

        self.present(fleet, true)?;
        debug!(
            command = command.label(),
            succeeded = summary.succeeded,
            failed = summary.failed,
            "fleet run finished"
        );
        Ok(summary)
    }

    pub fn into_presenter(self) -> FramePresenter<W> {
        self.presenter
    }
}
