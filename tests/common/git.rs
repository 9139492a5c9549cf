//! Git testing utilities

use anyhow::Result;
use std::path::Path;
use std::process::Command;

/// Runs git in `path` and fails with its stderr on a non-zero exit
pub fn git(path: &Path, args: &[&str]) -> Result<String> {
    let output = Command::new("git").args(args).current_dir(path).output()?;
    if !output.status.success() {
        anyhow::bail!(
            "git {} failed: {}",
            args.join(" "),
            String::from_utf8_lossy(&output.stderr)
        );
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Sets user config and disables signing so commits work on any machine
pub fn configure_identity(path: &Path) -> Result<()> {
    git(path, &["config", "user.name", "Test User"])?;
    git(path, &["config", "user.email", "test@example.com"])?;
    git(path, &["config", "commit.gpgsign", "false"])?;
    Ok(())
}

/// Sets up a git repository on branch `main` with user config
pub fn setup_git_repo(path: &Path) -> Result<()> {
    let init_result = Command::new("git")
        .args(["init", "--quiet"])
        .current_dir(path)
        .output()?;

    if !init_result.status.success() {
        anyhow::bail!("Git not available - skipping test");
    }

    // Independent of init.defaultBranch on the host
    git(path, &["symbolic-ref", "HEAD", "refs/heads/main"])?;
    configure_identity(path)
}

/// Creates a test commit in the repository
pub fn create_test_commit(path: &Path, file_name: &str, content: &str, message: &str) -> Result<()> {
    std::fs::write(path.join(file_name), content)?;
    git(path, &["add", file_name])?;
    git(path, &["commit", "--quiet", "-m", message])?;
    Ok(())
}

/// Creates `count` committed repositories named `test-repo-N` in a parent directory
pub fn create_multiple_repos(parent_dir: &Path, count: usize) -> Result<Vec<String>> {
    let mut repo_names = Vec::new();

    for i in 0..count {
        let repo_name = format!("test-repo-{}", i + 1);
        let repo_path = parent_dir.join(&repo_name);
        std::fs::create_dir(&repo_path)?;

        setup_git_repo(&repo_path)?;
        create_test_commit(
            &repo_path,
            "README.md",
            &format!("# Repo {}", i + 1),
            "Initial commit",
        )?;

        repo_names.push(repo_name);
    }

    Ok(repo_names)
}

/// Adds a git remote to a repository
pub fn add_git_remote(path: &Path, remote_name: &str, url: &str) -> Result<()> {
    git(path, &["remote", "add", remote_name, url])?;
    Ok(())
}

/// Clones `origin` into `dest` and configures the clone for commits
pub fn clone_repo(origin: &Path, dest: &Path) -> Result<()> {
    let parent = dest.parent().unwrap_or(dest);
    let output = Command::new("git")
        .args(["clone", "--quiet"])
        .arg(origin)
        .arg(dest)
        .current_dir(parent)
        .output()?;
    if !output.status.success() {
        anyhow::bail!("clone failed: {}", String::from_utf8_lossy(&output.stderr));
    }
    configure_identity(dest)
}

/// Checks if git is available in the system
pub fn is_git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}
