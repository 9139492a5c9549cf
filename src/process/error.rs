//! Error types for subprocess execution

use thiserror::Error;

/// Result type alias for subprocess operations
pub type Result<T> = std::result::Result<T, ProcessError>;

/// Everything that can go wrong while running one external command
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProcessError {
    /// The command ran but its result is unusable (non-zero exit, undecodable output, rejected input)
    #[error("execution failed: {0}")]
    ExecutionFailed(String),

    /// The command did not finish within the configured timeout
    #[error("'{command}' timed out after {seconds}s")]
    Timeout { command: String, seconds: u64 },

    /// The operator interrupted the run while the command was in flight
    #[error("'{command}' was interrupted")]
    Interrupted { command: String },

    /// Combined stdout and stderr grew past the configured ceiling
    #[error("output exceeded {limit} bytes")]
    OutputTooLarge { limit: usize },

    /// The requested working directory does not exist
    #[error("working directory does not exist: {path}")]
    InvalidWorkingDirectory { path: String },

    /// The process could not be configured or started
    #[error("process setup failed: {0}")]
    ProcessSetupError(String),
}
