//! Spinner shown on stderr while the root is scanned

use anyhow::Result;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::Duration;

use super::config::{SPINNER_TEMPLATE, SPINNER_TICK_MILLIS};

/// Creates a ticking spinner with `message`
///
/// Draws to stderr, so it never mixes with the table on stdout; indicatif
/// hides it when stderr is not a terminal.
pub fn create_spinner(message: &str) -> Result<ProgressBar> {
    let spinner = ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr());
    spinner.set_style(create_spinner_style()?);
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(SPINNER_TICK_MILLIS));
    Ok(spinner)
}

/// Creates a spinner style configuration
pub(crate) fn create_spinner_style() -> Result<ProgressStyle> {
    Ok(ProgressStyle::default_spinner().template(SPINNER_TEMPLATE)?)
}
