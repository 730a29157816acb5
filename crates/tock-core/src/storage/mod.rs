mod config;
mod lifecycle;
mod store;

pub use config::{MetadataLines, Settings, StoreConfig};
pub use lifecycle::ARCHIVE_DIR;
pub use store::{TimerStore, TIMER_EXTENSION};

use std::path::{Path, PathBuf};

/// Storage directory used when neither an override nor settings name one.
const DEFAULT_TIMERS_DIR: &str = "timers";

pub(crate) fn home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

/// Returns `~/.config/tock[-dev]/` based on TOCK_ENV.
///
/// Set TOCK_ENV=dev to use a development settings directory.
pub fn config_dir() -> PathBuf {
    let base_dir = home_dir().join(".config");

    let env = std::env::var("TOCK_ENV").unwrap_or_else(|_| "production".to_string());

    if env == "dev" {
        base_dir.join("tock-dev")
    } else {
        base_dir.join("tock")
    }
}

/// `~/timers`.
pub fn default_timers_dir() -> PathBuf {
    home_dir().join(DEFAULT_TIMERS_DIR)
}

/// Expand a leading `~` and anchor relative paths at `home`.
pub fn resolve_dir(raw: &str, home: &Path) -> PathBuf {
    let expanded = if raw == "~" {
        home.to_path_buf()
    } else if let Some(rest) = raw.strip_prefix("~/") {
        home.join(rest)
    } else {
        PathBuf::from(raw)
    };

    if expanded.is_relative() {
        home.join(expanded)
    } else {
        expanded
    }
}
