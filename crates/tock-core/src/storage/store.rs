//! Directory-backed timer repository.
//!
//! One `<name>.md` file per timer directly under the storage directory.
//! Nothing is cached: every call goes back to the filesystem, so the store
//! can be polled by a dashboard while a CLI process writes.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{default_timers_dir, StoreConfig};
use crate::error::Result;
use crate::timer::{codec, TimerRecord};

pub const TIMER_EXTENSION: &str = "md";

#[derive(Debug, Clone)]
pub struct TimerStore {
    dir: PathBuf,
    config: StoreConfig,
}

impl TimerStore {
    /// Create a store over `override_dir`, else the configured directory,
    /// else `~/timers`.
    ///
    /// The directory is created if missing. Failure to create it is logged
    /// and otherwise ignored; later reads and writes report their own errors.
    pub fn new(override_dir: Option<PathBuf>, config: StoreConfig) -> Self {
        let dir = override_dir
            .or_else(|| config.dir.clone())
            .unwrap_or_else(default_timers_dir);

        if let Err(e) = fs::create_dir_all(&dir) {
            tracing::warn!(dir = %dir.display(), error = %e, "could not create timer directory");
        }

        Self { dir, config }
    }

    /// Resolved storage directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn default_metadata(&self) -> &[String] {
        &self.config.default_metadata
    }

    pub fn default_notes(&self) -> Option<&str> {
        self.config.default_notes.as_deref()
    }

    /// `<dir>/<name>.md`. The name is not sanitized.
    pub fn timer_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.{TIMER_EXTENSION}"))
    }

    pub fn exists(&self, name: &str) -> bool {
        self.timer_path(name).is_file()
    }

    /// Read and decode a timer. `None` when the file is missing or unreadable.
    pub fn load(&self, name: &str) -> Option<TimerRecord> {
        let path = self.timer_path(name);
        match fs::read_to_string(&path) {
            Ok(text) => Some(codec::decode(&text)),
            Err(e) => {
                if e.kind() != ErrorKind::NotFound {
                    tracing::debug!(path = %path.display(), error = %e, "timer unreadable");
                }
                None
            }
        }
    }

    /// Raw file contents.
    pub fn read_text(&self, name: &str) -> Result<String> {
        Ok(fs::read_to_string(self.timer_path(name))?)
    }

    /// Write `record` to `name`.
    ///
    /// An existing file keeps its notes section. `default_notes` is only used
    /// when the file does not exist yet.
    pub fn save(&self, name: &str, record: &TimerRecord, default_notes: Option<&str>) -> Result<()> {
        let path = self.timer_path(name);
        let notes = match fs::read_to_string(&path) {
            Ok(existing) => codec::extract_notes(&existing),
            Err(e) if e.kind() == ErrorKind::NotFound => default_notes.map(String::from),
            Err(e) => return Err(e.into()),
        };

        fs::write(&path, codec::encode(record, notes.as_deref()))?;
        tracing::debug!(timer = name, path = %path.display(), "saved timer");
        Ok(())
    }

    /// Names of all active timers, sorted. `archived/` is not descended into.
    pub fn list_names(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            if path.extension().and_then(|e| e.to_str()) != Some(TIMER_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    /// The alphabetically first running timer, not the most recently started.
    pub fn first_running_name(&self) -> Result<Option<String>> {
        Ok(self
            .list_names()?
            .into_iter()
            .find(|name| self.load(name).is_some_and(|r| r.is_running())))
    }

    /// Name for the successor of `current` in a split.
    ///
    /// `work`, `work-1` and `work-3` present gives `work-4` for any of them.
    pub fn next_split_name(&self, current: &str) -> Result<String> {
        let names = self.list_names()?;
        Ok(next_split_name_among(current, &names))
    }
}

fn is_number(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Strip trailing `-<digits>` groups while something remains in front.
pub(crate) fn split_base(name: &str) -> &str {
    let mut base = name;
    while let Some((head, tail)) = base.rsplit_once('-') {
        if head.is_empty() || !is_number(tail) {
            break;
        }
        base = head;
    }
    base
}

pub(crate) fn next_split_name_among(current: &str, names: &[String]) -> String {
    let base = split_base(current);
    let mut next: u64 = 1;
    for name in names {
        // Suffixes at u64::MAX have no successor and are skipped.
        let successor = name
            .strip_prefix(base)
            .and_then(|rest| rest.strip_prefix('-'))
            .filter(|rest| is_number(rest))
            .and_then(|rest| rest.parse::<u64>().ok())
            .and_then(|n| n.checked_add(1));
        if let Some(n) = successor {
            next = next.max(n);
        }
    }
    format!("{base}-{next}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn store() -> (TempDir, TimerStore) {
        let tmp = TempDir::new().unwrap();
        let store = TimerStore::new(Some(tmp.path().to_path_buf()), StoreConfig::default());
        (tmp, store)
    }

    #[test]
    fn split_base_strips_numeric_suffixes() {
        assert_eq!(split_base("work"), "work");
        assert_eq!(split_base("work-3"), "work");
        assert_eq!(split_base("work-1-2"), "work");
        assert_eq!(split_base("2024-05-01"), "2024");
        assert_eq!(split_base("-5"), "-5");
        assert_eq!(split_base("fix-bug"), "fix-bug");
        assert_eq!(split_base("work-"), "work-");
    }

    #[test]
    fn next_split_name_without_siblings() {
        assert_eq!(next_split_name_among("work", &[]), "work-1");
        assert_eq!(next_split_name_among("work", &names(&["work"])), "work-1");
    }

    #[test]
    fn next_split_name_after_highest_sibling() {
        let existing = names(&["work", "work-1", "work-3", "workshop-9", "other-7"]);
        assert_eq!(next_split_name_among("work", &existing), "work-4");
        assert_eq!(next_split_name_among("work-1", &existing), "work-4");
        assert_eq!(next_split_name_among("work-3", &existing), "work-4");
    }

    #[test]
    fn next_split_name_ignores_non_numeric_suffixes() {
        let existing = names(&["work-a", "work-2b", "work-02"]);
        assert_eq!(next_split_name_among("work", &existing), "work-3");
    }

    #[test]
    fn next_split_name_skips_suffixes_without_successor() {
        let existing = names(&["work-18446744073709551615", "work-2", "work-99999999999999999999"]);
        assert_eq!(next_split_name_among("work", &existing), "work-3");
        assert_eq!(
            next_split_name_among("work-18446744073709551615", &existing),
            "work-3"
        );
    }

    #[test]
    fn next_split_name_with_max_suffix_on_disk() {
        let (_tmp, store) = store();
        store
            .save("work-18446744073709551615", &TimerRecord::default(), None)
            .unwrap();
        assert_eq!(store.next_split_name("work").unwrap(), "work-1");
    }

    #[test]
    fn timer_path_joins_name_and_extension() {
        let (tmp, store) = store();
        assert_eq!(store.timer_path("work"), tmp.path().join("work.md"));
        assert_eq!(store.dir(), tmp.path());
    }

    #[test]
    fn creates_missing_directory() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("a").join("b");
        let store = TimerStore::new(Some(dir.clone()), StoreConfig::default());
        assert!(dir.is_dir());
        assert!(store.list_names().unwrap().is_empty());
    }

    #[test]
    fn override_wins_over_configured_dir() {
        let tmp = TempDir::new().unwrap();
        let config = StoreConfig {
            dir: Some(tmp.path().join("configured")),
            ..StoreConfig::default()
        };
        let store = TimerStore::new(Some(tmp.path().join("override")), config.clone());
        assert_eq!(store.dir(), tmp.path().join("override"));

        let store = TimerStore::new(None, config);
        assert_eq!(store.dir(), tmp.path().join("configured"));
    }

    #[test]
    fn load_missing_is_none() {
        let (_tmp, store) = store();
        assert!(store.load("nope").is_none());
    }

    #[test]
    fn list_names_only_sees_markdown_files() {
        let (tmp, store) = store();
        fs::write(tmp.path().join("b.md"), "---\n---\n").unwrap();
        fs::write(tmp.path().join("a.md"), "---\n---\n").unwrap();
        fs::write(tmp.path().join("notes.txt"), "x").unwrap();
        fs::create_dir(tmp.path().join("archived")).unwrap();
        fs::write(tmp.path().join("archived").join("c.md"), "---\n---\n").unwrap();
        fs::create_dir(tmp.path().join("dir.md")).unwrap();

        assert_eq!(store.list_names().unwrap(), vec!["a", "b"]);
    }
}
