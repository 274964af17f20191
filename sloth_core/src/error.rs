//! Error types for the sloth_core library.

use std::collections::BTreeSet;
use std::io;
use std::path::PathBuf;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for sloth_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Settings file does not match the settings schema
    #[error(
        "Settings file {path:?} is improperly configured (missing keys: {missing:?}, extra keys: {extra:?})"
    )]
    ImproperlyConfigured {
        path: PathBuf,
        missing: BTreeSet<String>,
        extra: BTreeSet<String>,
    },

    /// Log entry does not match the log entry schema
    #[error("Log entry is improperly populated (missing keys: {missing:?}, extra keys: {extra:?})")]
    ImproperlyPopulated {
        missing: BTreeSet<String>,
        extra: BTreeSet<String>,
    },

    /// A physical value is out of range
    #[error("Validation error: {0}")]
    Validation(String),

    /// Persisted files disagree with what the program could have written
    #[error("Corrupted state: {0}")]
    CorruptedState(String),

    /// XP beyond the highest level threshold
    #[error("XP that high ({0}) isn't supported... yet")]
    UnsupportedXp(i64),

    /// The user closed the input stream
    #[error("Input aborted")]
    Aborted,

    /// Generic error
    #[error("{0}")]
    Other(String),
}
