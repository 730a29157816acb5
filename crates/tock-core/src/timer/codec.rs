//! Markdown front-matter codec for timer files.
//!
//! ## File layout
//!
//! ```text
//! ---
//! start_time: 2024-03-11T09:00:00
//! end_time: null
//! tags:
//!   - client
//!   - billing
//! project: acme
//! ---
//!
//! Free-form notes.
//! ```
//!
//! Decoding never fails. Unrecognized front-matter lines are kept verbatim in
//! [`TimerRecord::extra_metadata`], and timestamps that match none of the
//! accepted forms decode as absent.
//!
//! Timestamps are always written as naive local time (`%Y-%m-%dT%H:%M:%S`),
//! while UTC or offset-qualified input is accepted on read. A value read as
//! `2024-03-11T09:00:00.250Z` is therefore rewritten in local notation with
//! the fraction and offset dropped.

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};

use super::record::TimerRecord;

pub const DELIMITER: &str = "---";

/// Pattern used for every timestamp the codec writes.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

const START_KEY: &str = "start_time:";
const END_KEY: &str = "end_time:";
const TAGS_KEY: &str = "tags:";

/// Parse timer-file text into a record.
///
/// Line 0 is taken to be the opening delimiter and is skipped without
/// checking its content.
pub fn decode(text: &str) -> TimerRecord {
    let lines: Vec<&str> = text.lines().collect();
    let mut record = TimerRecord::default();

    let mut i = 1;
    while i < lines.len() {
        let line = lines[i];
        let trimmed = line.trim();

        if trimmed == DELIMITER {
            break;
        }

        if let Some(rest) = trimmed.strip_prefix(START_KEY) {
            record.start_time = parse_value(rest);
        } else if let Some(rest) = trimmed.strip_prefix(END_KEY) {
            record.stop_time = parse_value(rest);
        } else if let Some(rest) = trimmed.strip_prefix(TAGS_KEY) {
            let rest = rest.trim();
            if rest == "[]" {
                record.tags = Vec::new();
            } else if !rest.is_empty() {
                record.tags = rest
                    .split(',')
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(String::from)
                    .collect();
            } else {
                let (tags, next) = decode_tag_block(&lines, i + 1);
                record.tags = tags;
                // The line that ended the block is examined again.
                i = next;
                continue;
            }
        } else {
            record.extra_metadata.push(line.to_string());
        }

        i += 1;
    }

    record
}

/// Collect `- item` lines starting at `from`. Returns the tags and the index
/// of the first line that is not part of the block.
fn decode_tag_block(lines: &[&str], from: usize) -> (Vec<String>, usize) {
    let mut tags = Vec::new();
    let mut i = from;
    while i < lines.len() {
        let trimmed = lines[i].trim();
        if trimmed == DELIMITER {
            break;
        }
        if let Some(item) = trimmed.strip_prefix("- ") {
            let item = item.trim();
            if !item.is_empty() {
                tags.push(item.to_string());
            }
        } else if !trimmed.is_empty() {
            break;
        }
        i += 1;
    }
    (tags, i)
}

fn parse_value(raw: &str) -> Option<DateTime<Local>> {
    let value = raw.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("null") {
        return None;
    }
    let parsed = parse_timestamp(value);
    if parsed.is_none() {
        tracing::debug!(value, "unparseable timestamp treated as absent");
    }
    parsed
}

/// Parse a timestamp in any accepted form.
///
/// Tried in order: RFC 3339 (fractional seconds optional, `Z` or `+hh:mm`),
/// ISO 8601 with a `+hhmm` offset, and naive `%Y-%m-%dT%H:%M:%S` read as
/// local time. Local times that fall in a DST gap yield `None`.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Local>> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Local));
    }
    if let Ok(dt) = DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Some(dt.with_timezone(&Local));
    }
    let naive = NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT).ok()?;
    Local.from_local_datetime(&naive).earliest()
}

pub fn format_timestamp(dt: &DateTime<Local>) -> String {
    dt.format(TIMESTAMP_FORMAT).to_string()
}

fn format_value(dt: Option<&DateTime<Local>>) -> String {
    dt.map(format_timestamp).unwrap_or_else(|| "null".to_string())
}

/// Render a record, optionally followed by notes.
///
/// Without notes the text ends with the closing delimiter and one blank
/// line. With notes it ends with exactly one newline.
pub fn encode(record: &TimerRecord, notes: Option<&str>) -> String {
    let mut out = String::new();
    out.push_str(DELIMITER);
    out.push('\n');

    out.push_str(&format!("{START_KEY} {}\n", format_value(record.start_time.as_ref())));
    out.push_str(&format!("{END_KEY} {}\n", format_value(record.stop_time.as_ref())));

    if record.tags.is_empty() {
        out.push_str(TAGS_KEY);
        out.push_str(" []\n");
    } else {
        out.push_str(TAGS_KEY);
        out.push('\n');
        for tag in &record.tags {
            out.push_str("  - ");
            out.push_str(tag);
            out.push('\n');
        }
    }

    for line in &record.extra_metadata {
        out.push_str(line);
        out.push('\n');
    }

    out.push_str(DELIMITER);
    out.push_str("\n\n");

    if let Some(notes) = notes.filter(|n| !n.trim().is_empty()) {
        out.push_str(notes.trim_end_matches(['\n', '\r']));
        out.push('\n');
    }

    out
}

/// Everything after the closing delimiter, minus the one separator line
/// [`encode`] writes. `None` when nothing but whitespace follows.
pub fn extract_notes(text: &str) -> Option<String> {
    let after = if let Some(idx) = text.find("\n---\n") {
        &text[idx + 5..]
    } else if let Some(idx) = text.rfind("\n---") {
        &text[idx + 4..]
    } else {
        return None;
    };

    let body = after
        .strip_prefix("\r\n")
        .or_else(|| after.strip_prefix('\n'))
        .unwrap_or(after);

    if body.trim().is_empty() {
        None
    } else {
        Some(body.to_string())
    }
}
