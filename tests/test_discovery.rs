//! Integration tests for repository discovery against real git repositories

mod common;

use common::{create_multiple_repos, is_git_available, test_config, TestWorkspaceBuilder};
use gitgulf::core::discover;
use gitgulf::process::SystemRunner;
use std::sync::Arc;
use tempfile::TempDir;

fn sorted_names(fleet: &gitgulf::core::Fleet) -> Vec<String> {
    fleet.sorted().iter().map(|repo| repo.name().to_string()).collect()
}

#[tokio::test]
async fn test_discovers_committed_repos_only() -> anyhow::Result<()> {
    if !is_git_available() {
        eprintln!("Git not available, skipping test");
        return Ok(());
    }

    let workspace = TestWorkspaceBuilder::new()
        .repo("alpha")
        .repo("Beta")
        .hidden_repo(".secret")
        .empty_repo("fresh-init")
        .plain_dir("docs")
        .file("notes.txt")
        .build()?;
    let config = test_config(&workspace.root());

    let fleet = discover(&workspace.root(), Arc::new(SystemRunner), &config.process).await?;

    assert_eq!(sorted_names(&fleet), vec!["alpha", "Beta"]);
    for repo in fleet.iter() {
        assert_eq!(repo.branch, "main");
        assert!(!repo.fresh, "{} should start neutral", repo.name());
        assert!(repo.is_clean());
    }
    Ok(())
}

#[cfg(unix)]
#[tokio::test]
async fn test_symlinked_repo_is_skipped() -> anyhow::Result<()> {
    if !is_git_available() {
        eprintln!("Git not available, skipping test");
        return Ok(());
    }

    let workspace = TestWorkspaceBuilder::new().repo("real").build()?;
    std::os::unix::fs::symlink(workspace.repo_path("real"), workspace.root().join("alias"))?;
    let config = test_config(&workspace.root());

    let fleet = discover(&workspace.root(), Arc::new(SystemRunner), &config.process).await?;

    assert_eq!(sorted_names(&fleet), vec!["real"]);
    Ok(())
}

#[tokio::test]
async fn test_pending_changes_are_counted() -> anyhow::Result<()> {
    if !is_git_available() {
        eprintln!("Git not available, skipping test");
        return Ok(());
    }

    let workspace = TestWorkspaceBuilder::new().repo("busy").build()?;
    workspace.create_file("busy", "README.md", "edited")?;
    workspace.create_file("busy", "new.txt", "untracked")?;
    let config = test_config(&workspace.root());

    let fleet = discover(&workspace.root(), Arc::new(SystemRunner), &config.process).await?;

    let busy = fleet.get("busy").expect("busy discovered");
    assert_eq!(busy.changes, 2);
    assert_eq!((busy.ahead, busy.behind), (0, 0));
    Ok(())
}

#[tokio::test]
async fn test_many_repos_are_seeded_concurrently() -> anyhow::Result<()> {
    if !is_git_available() {
        eprintln!("Git not available, skipping test");
        return Ok(());
    }

    let temp_dir = TempDir::new()?;
    let names = create_multiple_repos(temp_dir.path(), 12)?;
    let config = test_config(temp_dir.path());

    let fleet = discover(temp_dir.path(), Arc::new(SystemRunner), &config.process).await?;

    assert_eq!(fleet.len(), names.len());
    for name in &names {
        assert!(fleet.get(name).is_some(), "{name} missing");
    }
    Ok(())
}

#[tokio::test]
async fn test_empty_root_yields_empty_fleet() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let config = test_config(temp_dir.path());

    let fleet = discover(temp_dir.path(), Arc::new(SystemRunner), &config.process).await?;

    assert!(fleet.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_missing_root_is_an_error() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let missing = temp_dir.path().join("nope");
    let config = test_config(&missing);

    let result = discover(&missing, Arc::new(SystemRunner), &config.process).await;

    assert!(result.is_err());
}
