//! Pipeline entry points for the giveaway watcher.
//!
//! - `calculate_diff`: Compare two snapshots by title
//! - `run_watch`: Fetch, diff, notify and persist once
//! - `run_with_reporting`: `run_watch` plus failure reporting to the webhook

pub mod diff;
pub mod run;

pub use diff::{Diff, calculate_diff};
pub use run::{RunReport, run_watch, run_with_reporting};
