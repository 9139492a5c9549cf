//! Terminal utilities for cursor control and size detection

use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

/// Resets all text attributes
pub const RESET_FORMATTING: &str = "\x1b[0m";

/// Escape sequence that moves the cursor up `lines` rows
pub fn cursor_up(lines: usize) -> String {
    format!("\x1b[{lines}A")
}

/// True when stdout is attached to a terminal
pub fn stdout_is_interactive() -> bool {
    std::io::stdout().is_terminal()
}

/// Output width: terminal size, then `COLUMNS`, then `fallback`
pub fn detect_width(fallback: usize) -> usize {
    let terminal = terminal_size().map(|(Width(w), _)| w);
    let columns = std::env::var("COLUMNS").ok();
    resolve_width(terminal, columns.as_deref(), fallback)
}

pub(crate) fn resolve_width(terminal: Option<u16>, columns: Option<&str>, fallback: usize) -> usize {
    if let Some(width) = terminal.filter(|w| *w > 0) {
        return usize::from(width);
    }
    columns
        .and_then(|value| value.trim().parse::<usize>().ok())
        .filter(|w| *w > 0)
        .unwrap_or(fallback)
}
