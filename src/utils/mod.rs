pub mod ansi;
pub mod terminal;

// Public API - utilities used by the renderer, presenter and commands
pub use ansi::{fit_to_width, strip_ansi, truncate_visible, visible_width};
pub use terminal::{cursor_up, detect_width, stdout_is_interactive, RESET_FORMATTING};
