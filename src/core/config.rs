//! Configuration constants and run settings

use serde::Deserialize;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::process::ProcessOptions;
use crate::utils::{detect_width, stdout_is_interactive};

// Process supervision defaults
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_MAX_OUTPUT_BYTES: usize = 10 * 1024 * 1024;

// Terminal fallback when neither the device nor COLUMNS report a width
pub const FALLBACK_WIDTH: usize = 80;

// UI Constants
pub const NO_REPOS_MESSAGE: &str = "No git repositories found in the target directory.";
pub const SCANNING_MESSAGE: &str = "Scanning for git repositories...";
pub const SPINNER_TEMPLATE: &str = "{spinner} {msg}";
pub const SPINNER_TICK_MILLIS: u64 = 80;

// User config file location under the platform config dir
pub const CONFIG_DIR_NAME: &str = "gitgulf";
pub const CONFIG_FILE_NAME: &str = "config.toml";

// Discovery
pub const GIT_MARKER: &str = ".git";
pub const ESTIMATED_REPO_COUNT: usize = 50; // Pre-allocation hint for collections

/// Optional settings read from `config.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UserConfig {
    /// Per-command timeout in seconds; `0` disables the timeout
    pub timeout_secs: Option<u64>,
    /// Ceiling on combined stdout and stderr of one command
    pub max_output_bytes: Option<usize>,
}

impl UserConfig {
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Loads the user config file, falling back to defaults when it is missing or malformed
    pub fn load() -> Self {
        let Some(path) = Self::default_path() else {
            return Self::default();
        };
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Self::default(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "cannot read config file");
                return Self::default();
            }
        };
        match Self::from_toml(&content) {
            Ok(config) => {
                debug!(path = %path.display(), ?config, "loaded config file");
                config
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring malformed config file");
                Self::default()
            }
        }
    }

    /// Builds the per-command process options; `timeout_override` wins over the file
    pub fn process_options(&self, timeout_override: Option<u64>) -> ProcessOptions {
        let timeout_secs = timeout_override
            .or(self.timeout_secs)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        let mut options = ProcessOptions::new()
            .with_max_output_bytes(self.max_output_bytes.unwrap_or(DEFAULT_MAX_OUTPUT_BYTES));
        if timeout_secs > 0 {
            options = options.with_timeout(Duration::from_secs(timeout_secs));
        }
        options
    }
}

/// Whether the table should carry color codes
pub fn color_enabled(interactive: bool, no_color_env: bool, no_color_flag: bool) -> bool {
    interactive && !no_color_env && !no_color_flag
}

/// Settings constructed once at program start and threaded into every component
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub root: PathBuf,
    pub start: Instant,
    pub interactive: bool,
    pub color: bool,
    pub width: usize,
    pub process: ProcessOptions,
}

impl RunConfig {
    /// Non-interactive, colorless settings with default process limits
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            start: Instant::now(),
            interactive: false,
            color: false,
            width: FALLBACK_WIDTH,
            process: UserConfig::default().process_options(None),
        }
    }

    /// Settings resolved from the attached terminal and environment
    pub fn from_environment(root: impl Into<PathBuf>, process: ProcessOptions, no_color: bool) -> Self {
        let interactive = stdout_is_interactive();
        let no_color_env = std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty());
        Self {
            root: root.into(),
            start: Instant::now(),
            interactive,
            color: color_enabled(interactive, no_color_env, no_color),
            width: detect_width(FALLBACK_WIDTH),
            process,
        }
    }

    pub fn with_process_options(mut self, process: ProcessOptions) -> Self {
        self.process = process;
        self
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}
