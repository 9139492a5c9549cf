//! ANSI-aware string measurement

use regex::Regex;
use std::sync::LazyLock;

static ANSI_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\x1b\[[0-?]*[ -/]*[@-~]").expect("ANSI escape pattern is valid")
});

/// Removes CSI escape sequences (colors, cursor movement)
pub fn strip_ansi(text: &str) -> String {
    ANSI_PATTERN.replace_all(text, "").into_owned()
}

/// Number of visible characters once escape sequences are removed
pub fn visible_width(text: &str) -> usize {
    let mut width = 0;
    let mut last = 0;
    for m in ANSI_PATTERN.find_iter(text) {
        width += text[last..m.start()].chars().count();
        last = m.end();
    }
    width + text[last..].chars().count()
}

/// Cuts `text` after `max` visible characters, keeping every escape sequence intact
pub fn truncate_visible(text: &str, max: usize) -> String {
    let mut out = String::with_capacity(text.len());
    let mut visible = 0;
    let mut last = 0;
    for m in ANSI_PATTERN.find_iter(text) {
        visible = push_visible(&mut out, &text[last..m.start()], visible, max);
        out.push_str(m.as_str());
        last = m.end();
    }
    push_visible(&mut out, &text[last..], visible, max);
    out
}

fn push_visible(out: &mut String, segment: &str, mut visible: usize, max: usize) -> usize {
    for ch in segment.chars() {
        if visible >= max {
            break;
        }
        out.push(ch);
        visible += 1;
    }
    visible
}

/// Clips or right-pads `line` with spaces so exactly `width` characters are visible
pub fn fit_to_width(line: &str, width: usize) -> String {
    let current = visible_width(line);
    if current > width {
        let mut clipped = truncate_visible(line, width);
        let clipped_width = visible_width(&clipped);
        clipped.push_str(&" ".repeat(width - clipped_width));
        clipped
    } else {
        format!("{line}{}", " ".repeat(width - current))
    }
}
