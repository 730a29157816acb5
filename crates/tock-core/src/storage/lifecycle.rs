//! Moving timer files: archive and rename.

use std::fs;
use std::path::PathBuf;

use uuid::Uuid;

use super::store::{TimerStore, TIMER_EXTENSION};
use crate::error::{Result, TimerError};

/// Subdirectory of the storage directory holding archived timers.
pub const ARCHIVE_DIR: &str = "archived";

impl TimerStore {
    pub fn archive_dir(&self) -> PathBuf {
        self.dir().join(ARCHIVE_DIR)
    }

    /// Move `name` to `archived/<name>-<uuid>.md`, returning the new path.
    ///
    /// Archived timers no longer appear in listings or collide with names.
    pub fn archive(&self, name: &str) -> Result<PathBuf> {
        let source = self.timer_path(name);
        if !source.is_file() {
            return Err(TimerError::NotFound(name.to_string()));
        }

        let archive_dir = self.archive_dir();
        fs::create_dir_all(&archive_dir)?;

        let target = archive_dir.join(format!("{name}-{}.{TIMER_EXTENSION}", Uuid::new_v4()));
        fs::rename(&source, &target)?;
        tracing::debug!(timer = name, target = %target.display(), "archived timer");
        Ok(target)
    }

    /// Rename `old_name` to the trimmed `new_name`, returning the new path.
    ///
    /// Renaming a timer onto itself succeeds without touching the file.
    pub fn rename(&self, old_name: &str, new_name: &str) -> Result<PathBuf> {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(TimerError::InvalidName(new_name.to_string()));
        }

        let source = self.timer_path(old_name);
        if !source.is_file() {
            return Err(TimerError::NotFound(old_name.to_string()));
        }

        let target = self.timer_path(new_name);
        if target.exists() {
            if fs::canonicalize(&source)? == fs::canonicalize(&target)? {
                return Ok(target);
            }
            return Err(TimerError::AlreadyExists(new_name.to_string()));
        }

        fs::rename(&source, &target)?;
        tracing::debug!(from = old_name, to = new_name, "renamed timer");
        Ok(target)
    }
}
