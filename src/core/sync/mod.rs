//! Fleet orchestration, table rendering and frame presentation.

pub mod coordinator;
pub mod presenter;
pub mod renderer;

pub use coordinator::{FleetOrchestrator, RunSummary};
pub use presenter::FramePresenter;
pub use renderer::{render, TableRenderer};
