//! External command execution

pub mod error;
pub mod supervisor;

use async_trait::async_trait;

pub use error::{ProcessError, Result};
pub use supervisor::{execute, ProcessOptions, ProcessOutput};

/// Seam between repository operations and the operating system
///
/// Production code uses [`SystemRunner`]; tests substitute scripted runners
/// to exercise failure isolation without real subprocesses.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Runs one command and returns its combined output and exit code
    async fn run(&self, args: &[String], options: &ProcessOptions) -> Result<ProcessOutput>;
}

/// Runs commands through the process supervisor
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

#[async_trait]
impl CommandRunner for SystemRunner {
    async fn run(&self, args: &[String], options: &ProcessOptions) -> Result<ProcessOutput> {
        execute(args, options).await
    }
}
