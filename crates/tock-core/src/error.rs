//! Core error types for tock-core.
//!
//! Domain conditions (not found, already exists, invalid name, not running)
//! are distinct variants so callers can render their own messages. Raw I/O
//! failures are carried through unchanged.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for tock-core.
#[derive(Error, Debug)]
pub enum TimerError {
    /// No timer file backs the given name
    #[error("timer '{0}' not found")]
    NotFound(String),

    /// A different timer file already uses the name
    #[error("timer '{0}' already exists")]
    AlreadyExists(String),

    /// Name is empty after trimming, or a path does not denote a timer
    #[error("invalid timer name: '{0}'")]
    InvalidName(String),

    /// Operation requires a running timer
    #[error("timer '{0}' is not running")]
    NotRunning(String),

    /// No name was given and nothing is running
    #[error("no running timer")]
    NoRunningTimer,

    /// Settings errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Settings-file errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Settings file exists but could not be read
    #[error("Failed to read settings from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Settings file is not valid JSON for the expected shape
    #[error("Failed to parse settings at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Result type alias for TimerError
pub type Result<T, E = TimerError> = std::result::Result<T, E>;
