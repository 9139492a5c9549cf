//! Test fixtures and builders

use anyhow::Result;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use super::git::{clone_repo, create_test_commit, git, setup_git_repo};

/// A directory of working copies with automatic cleanup
pub struct TestWorkspace {
    pub temp_dir: TempDir,
}

impl TestWorkspace {
    /// Directory that gets scanned
    pub fn root(&self) -> PathBuf {
        self.temp_dir.path().join("workspace")
    }

    /// Scratch directory outside the scanned root (bare remotes, helper clones)
    pub fn scratch(&self) -> PathBuf {
        self.temp_dir.path().join("scratch")
    }

    pub fn repo_path(&self, name: &str) -> PathBuf {
        self.root().join(name)
    }

    /// Create a new file in one of the repositories
    pub fn create_file(&self, repo: &str, name: &str, content: &str) -> Result<PathBuf> {
        let file_path = self.repo_path(repo).join(name);
        std::fs::write(&file_path, content)?;
        Ok(file_path)
    }
}

/// Builder for workspaces mixing repositories with entries discovery must skip
pub struct TestWorkspaceBuilder {
    repos: Vec<String>,
    hidden_repos: Vec<String>,
    empty_repos: Vec<String>,
    plain_dirs: Vec<String>,
    files: Vec<String>,
    tracked_repos: Vec<String>,
}

impl TestWorkspaceBuilder {
    pub fn new() -> Self {
        Self {
            repos: Vec::new(),
            hidden_repos: Vec::new(),
            empty_repos: Vec::new(),
            plain_dirs: Vec::new(),
            files: Vec::new(),
            tracked_repos: Vec::new(),
        }
    }

    /// A repository with one commit on `main`
    pub fn repo(mut self, name: &str) -> Self {
        self.repos.push(name.to_string());
        self
    }

    /// A clone of a bare remote kept under scratch, tracking `origin/main`
    pub fn tracked_repo(mut self, name: &str) -> Self {
        self.tracked_repos.push(name.to_string());
        self
    }

    pub fn hidden_repo(mut self, name: &str) -> Self {
        self.hidden_repos.push(name.to_string());
        self
    }

    /// `git init` without any commit, so HEAD cannot be resolved
    pub fn empty_repo(mut self, name: &str) -> Self {
        self.empty_repos.push(name.to_string());
        self
    }

    pub fn plain_dir(mut self, name: &str) -> Self {
        self.plain_dirs.push(name.to_string());
        self
    }

    pub fn file(mut self, name: &str) -> Self {
        self.files.push(name.to_string());
        self
    }

    pub fn build(self) -> Result<TestWorkspace> {
        let workspace = TestWorkspace {
            temp_dir: TempDir::new()?,
        };
        let root = workspace.root();
        std::fs::create_dir(&root)?;
        std::fs::create_dir(workspace.scratch())?;

        for name in self.repos.iter().chain(&self.hidden_repos) {
            init_committed(&root.join(name), name)?;
        }
        for name in &self.empty_repos {
            let path = root.join(name);
            std::fs::create_dir(&path)?;
            setup_git_repo(&path)?;
        }
        for name in &self.plain_dirs {
            std::fs::create_dir(root.join(name))?;
        }
        for name in &self.files {
            std::fs::write(root.join(name), "not a repository")?;
        }
        for name in &self.tracked_repos {
            let seed = workspace.scratch().join(format!("{name}-seed"));
            let bare = bare_remote_path(&workspace, name);
            init_committed(&seed, name)?;
            git(
                &workspace.scratch(),
                &["clone", "--quiet", "--bare", path_str(&seed)?, path_str(&bare)?],
            )?;
            clone_repo(&bare, &root.join(name))?;
        }

        Ok(workspace)
    }
}

impl Default for TestWorkspaceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Location of the bare remote behind a tracked repository
pub fn bare_remote_path(workspace: &TestWorkspace, name: &str) -> PathBuf {
    workspace.scratch().join(format!("{name}.git"))
}

/// Pushes one new commit to the bare remote of `name` from a throwaway clone
pub fn push_upstream_commit(workspace: &TestWorkspace, name: &str, file: &str) -> Result<()> {
    let helper = workspace.scratch().join(format!("{name}-helper-{file}"));
    clone_repo(&bare_remote_path(workspace, name), &helper)?;
    create_test_commit(&helper, file, "upstream", "Upstream change")?;
    git(&helper, &["push", "--quiet", "origin", "main"])?;
    Ok(())
}

fn init_committed(path: &Path, name: &str) -> Result<()> {
    std::fs::create_dir(path)?;
    setup_git_repo(path)?;
    create_test_commit(path, "README.md", &format!("# {name}"), "Initial commit")
}

fn path_str(path: &Path) -> Result<&str> {
    path.to_str()
        .ok_or_else(|| anyhow::anyhow!("non UTF-8 path {}", path.display()))
}
