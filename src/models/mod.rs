// src/models/mod.rs

//! Domain models for the giveaway watcher.

mod config;
mod posting;

// Re-export all public types
pub use config::{Config, HttpConfig, PathsConfig, SourceConfig};
pub use posting::Posting;
