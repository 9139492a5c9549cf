//! Command handlers invoked by the binary

pub mod run;

pub use run::{banner, handle_command, run_fleet_command, summary_line};
