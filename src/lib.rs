//! # gitgulf
//!
//! `gitgulf` runs one git operation across every repository directly under a
//! directory, concurrently, and keeps a column-aligned table of branch,
//! ahead/behind and pending-change counts up to date as results arrive. It
//! powers the `gitgulf` CLI tool.
//!
//! ## Core Features
//!
//! - **Process supervision**: one subprocess per call with timeout, interrupt
//!   and output ceiling, always killed and reaped on failure.
//! - **Fleet orchestration**: one task per repository, failures isolated per
//!   repository, a single owner applying results and redrawing.
//! - **Table rendering**: ANSI-aware, exact-width frames for in-place redraw.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use std::sync::Arc;
//! use gitgulf::core::{discover, render};
//! use gitgulf::process::{ProcessOptions, SystemRunner};
//!
//! #[tokio::main]
//! async fn main() -> std::io::Result<()> {
//!     let fleet = discover(Path::new("."), Arc::new(SystemRunner), &ProcessOptions::new()).await?;
//!     print!("{}", render(&fleet.sorted(), Some(80), false));
//!     Ok(())
//! }
//! ```

pub mod commands;
pub mod core;
pub mod git;
pub mod process;
pub mod utils;
