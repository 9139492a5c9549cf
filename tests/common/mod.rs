//! Common test utilities and helpers
#![allow(dead_code, unused_imports)]

pub mod fixtures;
pub mod git;

pub use self::fixtures::{push_upstream_commit, TestWorkspace, TestWorkspaceBuilder};
pub use self::git::{create_multiple_repos, git, is_git_available, setup_git_repo};

use gitgulf::core::RunConfig;
use gitgulf::process::ProcessOptions;
use std::path::Path;
use std::time::Duration;

/// Plain, fixed-width run settings with a short timeout for tests
pub fn test_config(root: &Path) -> RunConfig {
    RunConfig::new(root).with_process_options(
        ProcessOptions::new()
            .with_timeout(Duration::from_secs(30))
            .with_max_output_bytes(1024 * 1024),
    )
}
