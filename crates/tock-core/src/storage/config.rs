//! JSON settings and the store configuration derived from them.
//!
//! Settings live at `~/.config/tock/settings.json`:
//!
//! ```json
//! {
//!   "timers_dir": "~/notes/timers",
//!   "default_metadata": ["project:", "billable: false"],
//!   "default_notes": "## Notes\n"
//! }
//! ```
//!
//! `default_metadata` may also be a single newline-delimited string. Keys the
//! core does not know about (dashboard buttons and the like) are ignored.

use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{config_dir, resolve_dir};
use crate::error::ConfigError;

const SETTINGS_FILE: &str = "settings.json";

/// Metadata lines as written in the settings file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataLines {
    Lines(Vec<String>),
    Text(String),
}

/// Raw settings file contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timers_dir: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_metadata: Option<MetadataLines>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_notes: Option<String>,
}

/// Effective values consumed by [`TimerStore`](super::TimerStore).
///
/// Built once and injected at store construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StoreConfig {
    /// Storage directory from settings, already expanded.
    pub dir: Option<PathBuf>,
    /// Front-matter lines added to every new timer.
    pub default_metadata: Vec<String>,
    /// Notes written into every new timer file.
    pub default_notes: Option<String>,
}

impl Settings {
    pub fn path() -> PathBuf {
        config_dir().join(SETTINGS_FILE)
    }

    /// Load from `path`. A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load from `path`, returning defaults on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default_from(path: &Path) -> Self {
        Self::load_from(path).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "ignoring settings file");
            Self::default()
        })
    }

    pub fn load_or_default() -> Self {
        Self::load_or_default_from(&Self::path())
    }

    /// Normalize into the values the store uses.
    pub fn store_config(&self) -> StoreConfig {
        let dir = self
            .timers_dir
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(|d| resolve_dir(d, &super::home_dir()));

        StoreConfig {
            dir,
            default_metadata: self
                .default_metadata
                .as_ref()
                .map(normalize_metadata)
                .unwrap_or_default(),
            default_notes: self.default_notes.as_deref().and_then(normalize_notes),
        }
    }
}

impl MetadataLines {
    fn lines(&self) -> Vec<String> {
        match self {
            MetadataLines::Lines(entries) => entries
                .iter()
                .flat_map(|entry| entry.split('\n').map(String::from))
                .collect(),
            MetadataLines::Text(text) => text.lines().map(String::from).collect(),
        }
    }
}

/// Strip carriage returns; blank-only input means no defaults.
fn normalize_metadata(raw: &MetadataLines) -> Vec<String> {
    let lines: Vec<String> = raw.lines().into_iter().map(|l| l.replace('\r', "")).collect();
    if lines.iter().all(|l| l.trim().is_empty()) {
        Vec::new()
    } else {
        lines
    }
}

fn normalize_notes(raw: &str) -> Option<String> {
    let notes = raw.replace('\r', "");
    if notes.trim().is_empty() {
        None
    } else {
        Some(notes)
    }
}
