//! Parsing of git's status output

use regex::Regex;
use std::sync::LazyLock;

/// Ref namespaces stripped from `rev-parse --abbrev-ref` output, applied in order
const BRANCH_PREFIXES: &[&str] = &["refs/", "heads/", "remotes/", "origin/", "tags/"];

static AHEAD_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"ahead (\d+)").expect("ahead pattern is valid"));
static BEHIND_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"behind (\d+)").expect("behind pattern is valid"));

/// Strips known ref-namespace prefixes from a branch name
pub fn clean_branch_name(raw: &str) -> String {
    let mut branch = raw.trim();
    for prefix in BRANCH_PREFIXES {
        if let Some(rest) = branch.strip_prefix(prefix) {
            branch = rest;
        }
    }
    branch.to_string()
}

/// Ahead/behind counts from `git status --porcelain --branch`
///
/// Only the `## ...` branch line is inspected so file names cannot be
/// mistaken for tracking information. Missing tokens count as zero.
pub fn parse_ahead_behind(porcelain: &str) -> (u32, u32) {
    let Some(branch_line) = porcelain.lines().find(|line| line.starts_with("##")) else {
        return (0, 0);
    };
    (
        capture_count(&AHEAD_PATTERN, branch_line),
        capture_count(&BEHIND_PATTERN, branch_line),
    )
}

fn capture_count(pattern: &Regex, line: &str) -> u32 {
    pattern
        .captures(line)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

/// Number of pending changes in `git status -s` output
pub fn count_changes(short_status: &str) -> u32 {
    let count = short_status
        .lines()
        .filter(|line| !line.trim().is_empty())
        .count();
    u32::try_from(count).unwrap_or(u32::MAX)
}
