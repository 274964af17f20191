#![forbid(unsafe_code)]

//! Core domain model and game logic for Sloth, a text-mode fitness RPG.
//!
//! This crate provides:
//! - Domain types (profile, stats, log entries)
//! - Persistence (settings JSON, JSONL log, CSV export)
//! - Cardio scoring, levels and weekly deterioration
//! - Interactive prompts and the session flow

pub mod types;
pub mod error;
pub mod schema;
pub mod config;
pub mod logging;
pub mod settings;
pub mod log;
pub mod export;
pub mod level;
pub mod cardio;
pub mod deterioration;
pub mod checks;
pub mod convert;
pub mod prompt;
pub mod session;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use settings::{Profile, SettingsStore};
pub use log::{LogEntry, LogStore};
pub use checks::{personal_checks, Standing};
pub use prompt::Console;
