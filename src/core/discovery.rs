//! Repository discovery
//!
//! Only the immediate children of the root are considered. Hidden entries,
//! symlinks, plain files and directories without a `.git` directory are
//! skipped; every survivor is seeded with a status refresh and dropped if
//! that refresh fails.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

use super::config::{ESTIMATED_REPO_COUNT, GIT_MARKER};
use super::repository::{Fleet, RepositoryState};
use crate::git::refresh_status;
use crate::process::{CommandRunner, ProcessOptions};

/// Lists `(name, path)` for every direct child of `root` that looks like a working copy
pub fn find_candidates(root: &Path) -> io::Result<Vec<(String, PathBuf)>> {
    let mut candidates = Vec::with_capacity(ESTIMATED_REPO_COUNT);
    for entry in fs::read_dir(root)? {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                debug!(root = %root.display(), error = %e, "skipping unreadable entry");
                continue;
            }
        };
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }
        // file_type() does not follow symlinks
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        if file_type.is_symlink() || !file_type.is_dir() {
            continue;
        }
        let path = entry.path();
        if !has_git_dir(&path) {
            continue;
        }
        candidates.push((name, path));
    }
    Ok(candidates)
}

fn has_git_dir(path: &Path) -> bool {
    fs::symlink_metadata(path.join(GIT_MARKER)).is_ok_and(|meta| meta.is_dir())
}

/// Scans `root` once and returns the seeded fleet
///
/// Candidates are refreshed concurrently with one task each. Records come
/// back with `fresh = false` so the first frame renders neutral.
pub async fn discover(
    root: &Path,
    runner: Arc<dyn CommandRunner>,
    options: &ProcessOptions,
) -> io::Result<Fleet> {
    let candidates = find_candidates(root)?;
    debug!(root = %root.display(), count = candidates.len(), "found candidates");

    let repos = Arc::new(DashMap::with_capacity(candidates.len()));
    let mut handles = Vec::with_capacity(candidates.len());

    for (name, path) in candidates {
        let repos = Arc::clone(&repos);
        let runner = Arc::clone(&runner);
        let options = options.clone();
        handles.push(tokio::spawn(async move {
            let mut repo = RepositoryState::new(name.clone(), path);
            if let Err(e) = refresh_status(&mut repo, runner.as_ref(), &options).await {
                debug!(repo = %name, error = %e, "excluded after failed refresh");
                return;
            }
            // Names are directory names, so a clash means the same entry was seen twice
            if let Entry::Vacant(slot) = repos.entry(name) {
                slot.insert(repo);
            }
        }));
    }

    for result in futures::future::join_all(handles).await {
        if let Err(e) = result {
            warn!(error = %e, "discovery task failed");
        }
    }

    let mut fleet: Fleet = match Arc::try_unwrap(repos) {
        Ok(map) => map.into_iter().map(|(_, repo)| repo).collect(),
        Err(shared) => shared.iter().map(|r| r.value().clone()).collect(),
    };
    fleet.set_all_fresh(false);
    Ok(fleet)
}
