//! In-memory state of one timer.

use chrono::{DateTime, Duration, Local};

/// One timer's persisted state.
///
/// `extra_metadata` holds every front-matter line the codec does not
/// recognize, verbatim and in order, so custom fields survive a rewrite.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimerRecord {
    pub start_time: Option<DateTime<Local>>,
    pub stop_time: Option<DateTime<Local>>,
    pub tags: Vec<String>,
    pub extra_metadata: Vec<String>,
}

impl TimerRecord {
    /// A record started at `at`, with no stop time.
    pub fn started_at(at: DateTime<Local>) -> Self {
        Self {
            start_time: Some(at),
            ..Self::default()
        }
    }

    pub fn is_running(&self) -> bool {
        self.start_time.is_some() && self.stop_time.is_none()
    }

    /// Elapsed time, using the wall clock for running timers.
    pub fn duration(&self) -> Option<Duration> {
        self.duration_at(Local::now())
    }

    /// Elapsed time with `now` standing in for a missing stop time.
    ///
    /// Negative when the stop time precedes the start time; ordering is
    /// not validated.
    pub fn duration_at(&self, now: DateTime<Local>) -> Option<Duration> {
        let start = self.start_time?;
        let end = self.stop_time.unwrap_or(now);
        Some(end - start)
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Append `tag` unless already present. Returns whether it was added.
    pub fn add_tag(&mut self, tag: &str) -> bool {
        let tag = tag.trim();
        if tag.is_empty() || self.has_tag(tag) {
            return false;
        }
        self.tags.push(tag.to_string());
        true
    }

    /// Remove every occurrence of `tag`. Returns whether anything was removed.
    pub fn remove_tag(&mut self, tag: &str) -> bool {
        let tag = tag.trim();
        let before = self.tags.len();
        self.tags.retain(|t| t != tag);
        self.tags.len() != before
    }
}
