//! Timer operations built from [`TimerStore`] primitives.
//!
//! Every mutation is load, change in memory, save. Callers pass the moment
//! to record (`at`) explicitly; nothing here reads the clock.

use chrono::{DateTime, Duration, Local, NaiveTime, TimeZone};
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::error::{Result, TimerError};
use crate::storage::{TimerStore, TIMER_EXTENSION};
use crate::timer::{format_timestamp, parse_timestamp, TimerRecord};

/// Point-in-time view of one timer for list and dashboard consumers.
#[derive(Debug, Clone, Serialize)]
pub struct TimerSummary {
    pub name: String,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub tags: Vec<String>,
    pub running: bool,
    /// Whole seconds elapsed at snapshot time.
    pub duration_secs: Option<i64>,
}

impl TimerSummary {
    fn new(name: String, record: &TimerRecord, now: DateTime<Local>) -> Self {
        Self {
            name,
            start_time: record.start_time.as_ref().map(format_timestamp),
            end_time: record.stop_time.as_ref().map(format_timestamp),
            tags: record.tags.clone(),
            running: record.is_running(),
            duration_secs: record.duration_at(now).map(|d| d.num_seconds()),
        }
    }

    pub fn duration(&self) -> Option<Duration> {
        self.duration_secs.map(Duration::seconds)
    }
}

fn load_existing(store: &TimerStore, name: &str) -> Result<TimerRecord> {
    store
        .load(name)
        .ok_or_else(|| TimerError::NotFound(name.to_string()))
}

/// The named timer, or the first running one when `name` is `None`.
fn resolve_running(store: &TimerStore, name: Option<&str>) -> Result<(String, TimerRecord)> {
    let name = match name {
        Some(name) => name.to_string(),
        None => store.first_running_name()?.ok_or(TimerError::NoRunningTimer)?,
    };
    let record = load_existing(store, &name)?;
    if !record.is_running() {
        return Err(TimerError::NotRunning(name));
    }
    Ok((name, record))
}

/// Fresh record carrying the configured default metadata.
fn new_record(store: &TimerStore, at: DateTime<Local>, tags: &[String]) -> TimerRecord {
    let mut record = TimerRecord::started_at(at);
    for tag in tags {
        record.add_tag(tag);
    }
    record.extra_metadata = store.default_metadata().to_vec();
    record
}

/// Create and start a new timer.
pub fn start(
    store: &TimerStore,
    name: &str,
    tags: &[String],
    at: DateTime<Local>,
) -> Result<TimerRecord> {
    let name = name.trim();
    if name.is_empty() {
        return Err(TimerError::InvalidName(name.to_string()));
    }
    if store.load(name).is_some() {
        return Err(TimerError::AlreadyExists(name.to_string()));
    }

    let record = new_record(store, at, tags);
    store.save(name, &record, store.default_notes())?;
    tracing::info!(timer = name, "started timer");
    Ok(record)
}

/// Stop a running timer.
pub fn stop(
    store: &TimerStore,
    name: Option<&str>,
    at: DateTime<Local>,
) -> Result<(String, TimerRecord)> {
    let (name, mut record) = resolve_running(store, name)?;
    record.stop_time = Some(at);
    store.save(&name, &record, None)?;
    tracing::info!(timer = %name, "stopped timer");
    Ok((name, record))
}

/// Outcome of [`split`].
#[derive(Debug, Clone)]
pub struct Split {
    pub stopped: String,
    pub started: String,
    pub record: TimerRecord,
}

/// Stop a running timer and start its successor with the same tags.
///
/// The two files are written one after the other, not as a transaction.
pub fn split(store: &TimerStore, name: Option<&str>, at: DateTime<Local>) -> Result<Split> {
    let (name, mut record) = resolve_running(store, name)?;
    let successor = store.next_split_name(&name)?;
    if store.load(&successor).is_some() {
        return Err(TimerError::AlreadyExists(successor));
    }

    record.stop_time = Some(at);
    store.save(&name, &record, None)?;

    let next = new_record(store, at, &record.tags);
    store.save(&successor, &next, store.default_notes())?;
    tracing::info!(from = %name, to = %successor, "split timer");

    Ok(Split {
        stopped: name,
        started: successor,
        record: next,
    })
}

/// Add tags not yet present, keeping order.
pub fn tag(store: &TimerStore, name: &str, tags: &[String]) -> Result<TimerRecord> {
    let mut record = load_existing(store, name)?;
    for t in tags {
        record.add_tag(t);
    }
    store.save(name, &record, None)?;
    Ok(record)
}

pub fn untag(store: &TimerStore, name: &str, tags: &[String]) -> Result<TimerRecord> {
    let mut record = load_existing(store, name)?;
    for t in tags {
        record.remove_tag(t);
    }
    store.save(name, &record, None)?;
    Ok(record)
}

/// Overwrite or clear the start time. Ordering against the stop time is not checked.
pub fn set_start(
    store: &TimerStore,
    name: &str,
    at: Option<DateTime<Local>>,
) -> Result<TimerRecord> {
    let mut record = load_existing(store, name)?;
    record.start_time = at;
    store.save(name, &record, None)?;
    Ok(record)
}

/// Overwrite or clear the stop time. Clearing it resumes a started timer.
pub fn set_stop(
    store: &TimerStore,
    name: &str,
    at: Option<DateTime<Local>>,
) -> Result<TimerRecord> {
    let mut record = load_existing(store, name)?;
    record.stop_time = at;
    store.save(name, &record, None)?;
    Ok(record)
}

/// Snapshot of every active timer in listing order.
pub fn summaries(store: &TimerStore, now: DateTime<Local>) -> Result<Vec<TimerSummary>> {
    Ok(store
        .list_names()?
        .into_iter()
        .filter_map(|name| {
            let record = store.load(&name)?;
            Some(TimerSummary::new(name, &record, now))
        })
        .collect())
}

/// Map a user-supplied file path to a timer name.
///
/// The path must be a `.md` file directly inside the storage directory.
/// Relative paths are taken from the current directory.
pub fn resolve_timer_path(store: &TimerStore, path: &Path) -> Result<String> {
    let invalid = || TimerError::InvalidName(path.display().to_string());

    let absolute = if path.is_relative() {
        std::env::current_dir()?.join(path)
    } else {
        path.to_path_buf()
    };

    if absolute.extension().and_then(|e| e.to_str()) != Some(TIMER_EXTENSION) {
        return Err(invalid());
    }
    let name = absolute
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .ok_or_else(invalid)?
        .to_string();

    let parent = absolute.parent().ok_or_else(invalid)?;
    let parent = std::fs::canonicalize(parent).map_err(|_| invalid())?;
    if parent != canonical(store.dir())? {
        return Err(invalid());
    }
    Ok(name)
}

fn canonical(path: &Path) -> Result<PathBuf> {
    Ok(std::fs::canonicalize(path)?)
}

/// Parse a time argument: any timestamp form the codec accepts, or a bare
/// `HH:MM` / `HH:MM:SS` meaning that time today.
pub fn parse_time_arg(text: &str, now: DateTime<Local>) -> Option<DateTime<Local>> {
    let text = text.trim();
    if let Some(dt) = parse_timestamp(text) {
        return Some(dt);
    }
    let time = NaiveTime::parse_from_str(text, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(text, "%H:%M"))
        .ok()?;
    Local
        .from_local_datetime(&now.date_naive().and_time(time))
        .earliest()
}
