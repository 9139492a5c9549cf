pub mod config;
pub mod discovery;
pub mod progress;
pub mod repository;
pub mod sync;

// Re-export key items at module level for convenience
pub use config::{
    RunConfig, UserConfig, DEFAULT_MAX_OUTPUT_BYTES, DEFAULT_TIMEOUT_SECS, FALLBACK_WIDTH,
    NO_REPOS_MESSAGE, SCANNING_MESSAGE,
};
pub use discovery::{discover, find_candidates};
pub use progress::create_spinner;
pub use repository::{Fleet, RepositoryState};
pub use sync::{render, FleetOrchestrator, FramePresenter, RunSummary, TableRenderer};
