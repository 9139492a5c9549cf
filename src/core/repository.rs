//! Repository records and the fleet that owns them

use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

/// Last known state of one working copy
///
/// Identity is the directory name alone: two records with the same name are
/// the same repository regardless of the path they were found under.
#[derive(Debug, Clone)]
pub struct RepositoryState {
    name: String,
    path: PathBuf,
    pub branch: String,
    pub ahead: u32,
    pub behind: u32,
    pub changes: u32,
    /// Set once this record reflects a completed refresh (or, during a run, a completed attempt)
    pub fresh: bool,
}

impl RepositoryState {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            branch: String::new(),
            ahead: 0,
            behind: 0,
            changes: 0,
            fresh: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Clears the counters ahead of a status refresh
    pub fn reset_counts(&mut self) {
        self.ahead = 0;
        self.behind = 0;
        self.changes = 0;
    }

    pub fn is_clean(&self) -> bool {
        self.ahead == 0 && self.behind == 0 && self.changes == 0
    }
}

impl PartialEq for RepositoryState {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for RepositoryState {}

impl Hash for RepositoryState {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

/// All repositories discovered for one program run, keyed by name
#[derive(Debug, Clone, Default)]
pub struct Fleet {
    repos: HashMap<String, RepositoryState>,
}

impl Fleet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a repository; returns false if one with the same name is already present
    pub fn insert(&mut self, repo: RepositoryState) -> bool {
        match self.repos.entry(repo.name.clone()) {
            std::collections::hash_map::Entry::Occupied(_) => false,
            std::collections::hash_map::Entry::Vacant(slot) => {
                slot.insert(repo);
                true
            }
        }
    }

    /// Replaces the stored record for `repo.name()` if it is a member
    pub fn update(&mut self, repo: RepositoryState) {
        if let Some(existing) = self.repos.get_mut(repo.name()) {
            *existing = repo;
        }
    }

    pub fn get(&self, name: &str) -> Option<&RepositoryState> {
        self.repos.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut RepositoryState> {
        self.repos.get_mut(name)
    }

    pub fn len(&self) -> usize {
        self.repos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.repos.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RepositoryState> {
        self.repos.values()
    }

    /// Members sorted case-insensitively by name, as the table shows them
    pub fn sorted(&self) -> Vec<&RepositoryState> {
        let mut repos: Vec<_> = self.repos.values().collect();
        sort_by_name(&mut repos);
        repos
    }

    pub fn set_all_fresh(&mut self, fresh: bool) {
        for repo in self.repos.values_mut() {
            repo.fresh = fresh;
        }
    }
}

impl FromIterator<RepositoryState> for Fleet {
    fn from_iter<I: IntoIterator<Item = RepositoryState>>(iter: I) -> Self {
        let mut fleet = Fleet::new();
        for repo in iter {
            fleet.insert(repo);
        }
        fleet
    }
}

impl IntoIterator for Fleet {
    type Item = RepositoryState;
    type IntoIter = std::collections::hash_map::IntoValues<String, RepositoryState>;

    fn into_iter(self) -> Self::IntoIter {
        self.repos.into_values()
    }
}

/// Case-insensitive name order, with the exact name as tie-breaker so frames are stable
pub fn sort_by_name(repos: &mut [&RepositoryState]) {
    repos.sort_by(|a, b| {
        a.name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.name.cmp(&b.name))
    });
}
