//! Column-aligned table renderer for the fleet.
//!
//! Every frame is a header row, a divider row and one row per repository in
//! case-insensitive name order. With a target width every line is clipped or
//! padded to exactly that many visible characters, so the presenter can draw
//! a frame over the previous one without leftovers.

use std::fmt::Write;

use crate::core::repository::{sort_by_name, Fleet, RepositoryState};
use crate::utils::fit_to_width;

const HEADERS: [&str; 5] = ["Repository Name", "Branch", "Ahead", "Behind", "Changes"];

const FILLER: char = '…';
const HORIZONTAL: char = '═';
const VERTICAL: char = '│';
const INTERSECTION: char = '╪';

const SEPARATOR_WIDTH: usize = 3;

// Shrink floors
const MIN_NAME_WIDTH: usize = 8;
const MIN_BRANCH_WIDTH: usize = 6;
const MIN_NUMERIC_WIDTH: usize = 3;

const NAME: usize = 0;
const BRANCH: usize = 1;
const NUMERIC: [usize; 3] = [2, 3, 4];

/// Escape codes for one frame; all empty when color is off
#[derive(Debug, Clone, Copy)]
struct Palette {
    red: &'static str,
    purple: &'static str,
    cyan: &'static str,
    grey: &'static str,
    green: &'static str,
    white: &'static str,
}

impl Palette {
    fn new(color: bool) -> Self {
        if color {
            Self {
                red: "\x1b[31m",
                purple: "\x1b[35m",
                cyan: "\x1b[36m",
                grey: "\x1b[90m",
                green: "\x1b[92m",
                white: "\x1b[97m",
            }
        } else {
            Self {
                red: "",
                purple: "",
                cyan: "",
                grey: "",
                green: "",
                white: "",
            }
        }
    }

    fn branch_color(&self, repo: &RepositoryState) -> &'static str {
        if !repo.fresh {
            self.grey
        } else if repo.ahead > 0 {
            self.purple
        } else if repo.behind > 0 {
            self.red
        } else if repo.changes > 0 {
            self.cyan
        } else {
            self.green
        }
    }
}

/// Renders fleet snapshots at a fixed width and color mode
#[derive(Debug, Clone, Copy)]
pub struct TableRenderer {
    width: Option<usize>,
    color: bool,
}

impl TableRenderer {
    pub fn new(width: Option<usize>, color: bool) -> Self {
        Self { width, color }
    }

    pub fn render(&self, fleet: &Fleet) -> String {
        render(&fleet.sorted(), self.width, self.color)
    }
}

/// Lays out `repos` as a complete frame; every line ends with `\n`
pub fn render(repos: &[&RepositoryState], width: Option<usize>, color: bool) -> String {
    let palette = Palette::new(color);
    let mut sorted = repos.to_vec();
    sort_by_name(&mut sorted);

    let widths = column_widths(&sorted, width);
    let mut frame = String::new();

    push_line(&mut frame, &header_line(&widths, &palette), width);
    push_line(&mut frame, &divider_line(&widths, &palette), width);
    for repo in sorted {
        push_line(&mut frame, &data_line(repo, &widths, &palette), width);
    }
    frame
}

fn push_line(frame: &mut String, line: &str, width: Option<usize>) {
    match width {
        Some(width) => frame.push_str(&fit_to_width(line, width)),
        None => frame.push_str(line),
    }
    frame.push('\n');
}

fn numeric_values(repo: &RepositoryState) -> [u32; 3] {
    [repo.ahead, repo.behind, repo.changes]
}

fn digits(value: u32) -> usize {
    value.to_string().len()
}

/// Natural column widths, shrunk toward the floors when they exceed `width`
///
/// Numeric columns give up space first, one character at a time in turn,
/// but never below their longest value. Branch goes next, name last.
pub(crate) fn column_widths(repos: &[&RepositoryState], width: Option<usize>) -> [usize; 5] {
    let mut widths = HEADERS.map(|header| header.chars().count());
    let mut value_floor = [0usize; 3];
    for repo in repos {
        widths[NAME] = widths[NAME].max(repo.name().chars().count());
        widths[BRANCH] = widths[BRANCH].max(repo.branch.chars().count());
        for (slot, value) in numeric_values(repo).into_iter().enumerate() {
            value_floor[slot] = value_floor[slot].max(digits(value));
            widths[NUMERIC[slot]] = widths[NUMERIC[slot]].max(digits(value));
        }
    }

    let Some(target) = width else {
        return widths;
    };
    let total = widths.iter().sum::<usize>() + SEPARATOR_WIDTH * (widths.len() - 1);
    let mut excess = total.saturating_sub(target);

    while excess > 0 {
        let mut shrunk = false;
        for (slot, &column) in NUMERIC.iter().enumerate() {
            let floor = MIN_NUMERIC_WIDTH.max(value_floor[slot]);
            if excess > 0 && widths[column] > floor {
                widths[column] -= 1;
                excess -= 1;
                shrunk = true;
            }
        }
        if !shrunk {
            break;
        }
    }

    for (column, floor) in [(BRANCH, MIN_BRANCH_WIDTH), (NAME, MIN_NAME_WIDTH)] {
        let available = widths[column].saturating_sub(floor);
        let cut = available.min(excess);
        widths[column] -= cut;
        excess -= cut;
    }

    widths
}

/// Shortens `text` to `width` characters, marking the cut with a filler glyph
fn shorten(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut short: String = text.chars().take(width - 1).collect();
    short.push(FILLER);
    short
}

fn separator(palette: &Palette) -> String {
    format!("{} {VERTICAL} {}", palette.white, palette.grey)
}

fn header_line(widths: &[usize; 5], palette: &Palette) -> String {
    let cells: Vec<String> = HEADERS
        .iter()
        .zip(widths)
        .map(|(header, &width)| {
            format!(
                "{}{:<width$}{}",
                palette.white,
                shorten(header, width),
                palette.grey
            )
        })
        .collect();
    cells.join(separator(palette).as_str())
}

fn divider_line(widths: &[usize; 5], palette: &Palette) -> String {
    let sections: Vec<String> = widths
        .iter()
        .map(|&width| HORIZONTAL.to_string().repeat(width))
        .collect();
    let joint = format!("{HORIZONTAL}{INTERSECTION}{HORIZONTAL}");
    format!("{}{}{}", palette.white, sections.join(joint.as_str()), palette.grey)
}

/// Text cell: value, one space, then filler glyphs up to `width`
fn text_cell(text: &str, width: usize, color: &str, palette: &Palette) -> String {
    let shown = shorten(text, width);
    let len = shown.chars().count();
    let mut cell = format!("{color}{shown}{}", palette.grey);
    if len < width {
        cell.push(' ');
        cell.extend(std::iter::repeat_n(FILLER, width - len - 1));
    }
    cell
}

/// Numeric cell: zero is all filler, anything else is right-aligned after filler
fn numeric_cell(value: u32, width: usize, color: &str, palette: &Palette) -> String {
    let mut cell = palette.grey.to_string();
    if value == 0 {
        cell.extend(std::iter::repeat_n(FILLER, width));
        return cell;
    }
    let text = value.to_string();
    if text.len() < width {
        cell.extend(std::iter::repeat_n(FILLER, width - text.len() - 1));
        cell.push(' ');
    }
    let _ = write!(cell, "{color}{text}{}", palette.grey);
    cell
}

fn data_line(repo: &RepositoryState, widths: &[usize; 5], palette: &Palette) -> String {
    let (name_color, numeric_colors) = if repo.fresh {
        (palette.white, [palette.purple, palette.red, palette.cyan])
    } else {
        (palette.grey, [palette.grey; 3])
    };

    let mut cells = vec![
        text_cell(repo.name(), widths[NAME], name_color, palette),
        text_cell(&repo.branch, widths[BRANCH], palette.branch_color(repo), palette),
    ];
    for (slot, value) in numeric_values(repo).into_iter().enumerate() {
        cells.push(numeric_cell(
            value,
            widths[NUMERIC[slot]],
            numeric_colors[slot],
            palette,
        ));
    }
    cells.join(separator(palette).as_str())
}
