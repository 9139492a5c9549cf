use async_trait::async_trait;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use gitgulf::core::{discover, render, RepositoryState};
use gitgulf::process::{CommandRunner, ProcessOptions, ProcessOutput, Result};
use std::fs;
use std::hint::black_box;
use std::sync::Arc;
use tempfile::TempDir;

fn make_fleet(count: usize) -> Vec<RepositoryState> {
    (0..count)
        .map(|i| {
            let mut repo = RepositoryState::new(format!("repo-{i:04}"), format!("/repos/{i}"));
            repo.branch = if i % 3 == 0 { "main" } else { "feature/benchmarks" }.to_string();
            repo.ahead = (i % 4) as u32;
            repo.behind = (i % 5) as u32;
            repo.changes = (i % 7) as u32 * 3;
            repo.fresh = i % 2 == 0;
            repo
        })
        .collect()
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");
    for count in [10, 100, 1000] {
        let fleet = make_fleet(count);
        let refs: Vec<&RepositoryState> = fleet.iter().collect();
        group.bench_with_input(BenchmarkId::new("color_120", count), &refs, |b, refs| {
            b.iter(|| render(black_box(refs), Some(120), true))
        });
        group.bench_with_input(BenchmarkId::new("shrunk_40", count), &refs, |b, refs| {
            b.iter(|| render(black_box(refs), Some(40), false))
        });
    }
    group.finish();
}

/// Answers every status query instantly so only discovery overhead is measured
struct InstantGit;

#[async_trait]
impl CommandRunner for InstantGit {
    async fn run(&self, _args: &[String], _options: &ProcessOptions) -> Result<ProcessOutput> {
        Ok(ProcessOutput {
            output: "main".to_string(),
            status: 0,
        })
    }
}

fn setup_many_repos(count: usize) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    for i in 0..count {
        fs::create_dir_all(temp_dir.path().join(format!("repo-{i}")).join(".git")).unwrap();
    }
    temp_dir
}

fn bench_discovery(c: &mut Criterion) {
    let temp_dir = setup_many_repos(100);
    let path = temp_dir.path().to_path_buf();
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let runner: Arc<dyn CommandRunner> = Arc::new(InstantGit);
    let options = ProcessOptions::new();

    c.bench_function("discovery_100_repos", |b| {
        b.to_async(&runtime)
            .iter(|| discover(&path, Arc::clone(&runner), &options))
    });
}

criterion_group!(benches, bench_render, bench_discovery);
criterion_main!(benches);
