//! Integration tests for the timer store and operations.

use chrono::{DateTime, Duration, Local};
use indoc::indoc;
use tempfile::TempDir;
use tock_core::storage::ARCHIVE_DIR;
use tock_core::timer::{format_timestamp, parse_timestamp};
use tock_core::{ops, Settings, StoreConfig, TimerError, TimerRecord, TimerStore};

fn at(s: &str) -> DateTime<Local> {
    parse_timestamp(s).unwrap()
}

fn open(tmp: &TempDir) -> TimerStore {
    TimerStore::new(Some(tmp.path().to_path_buf()), StoreConfig::default())
}

#[test]
fn test_start_stop_split_scenario() {
    let tmp = TempDir::new().unwrap();
    let store = open(&tmp);
    let t0 = at("2024-03-11T09:00:00");
    let t1 = at("2024-03-11T10:30:00");
    let t2 = at("2024-03-11T11:00:00");

    ops::start(&store, "work", &[], t0).unwrap();
    let text = store.read_text("work").unwrap();
    assert!(text.contains(&format!("start_time: {}\n", format_timestamp(&t0))));
    assert!(text.contains("end_time: null\n"));
    assert!(text.contains("tags: []\n"));

    let (_, stopped) = ops::stop(&store, Some("work"), t1).unwrap();
    assert!(store.read_text("work").unwrap().contains("end_time: 2024-03-11T10:30:00\n"));
    assert_eq!(stopped.duration(), Some(Duration::minutes(90)));

    // Resume, tag, then split while running.
    ops::set_stop(&store, "work", None).unwrap();
    ops::tag(&store, "work", &["client".to_string()]).unwrap();
    let outcome = ops::split(&store, None, t2).unwrap();
    assert_eq!(outcome.stopped, "work");
    assert_eq!(outcome.started, "work-1");

    let work = store.load("work").unwrap();
    assert_eq!(work.stop_time, Some(t2));
    let successor = store.load("work-1").unwrap();
    assert_eq!(successor.start_time, Some(t2));
    assert_eq!(successor.stop_time, None);
    assert_eq!(successor.tags, vec!["client"]);

    assert_eq!(store.list_names().unwrap(), vec!["work", "work-1"]);
    assert_eq!(store.first_running_name().unwrap().as_deref(), Some("work-1"));
}

#[test]
fn test_split_name_monotonic_across_siblings() {
    let tmp = TempDir::new().unwrap();
    let store = open(&tmp);
    for name in ["work", "work-1", "work-3"] {
        store.save(name, &TimerRecord::default(), None).unwrap();
    }
    assert_eq!(store.next_split_name("work").unwrap(), "work-4");

    let empty = TempDir::new().unwrap();
    assert_eq!(open(&empty).next_split_name("work").unwrap(), "work-1");
}

#[test]
fn test_notes_survive_metadata_mutation() {
    let tmp = TempDir::new().unwrap();
    let store = open(&tmp);
    std::fs::write(
        store.timer_path("work"),
        "---\nstart_time: 2024-03-11T09:00:00\nend_time: null\ntags: []\n---\n\nHello",
    )
    .unwrap();

    ops::tag(&store, "work", &["x".to_string()]).unwrap();

    let text = store.read_text("work").unwrap();
    assert!(text.ends_with("Hello\n"));
    assert!(text.contains("tags:\n  - x\n"));
}

#[test]
fn test_default_notes_only_for_new_files() {
    let tmp = TempDir::new().unwrap();
    let store = open(&tmp);
    store.save("a", &TimerRecord::default(), Some("placeholder")).unwrap();
    assert!(store.read_text("a").unwrap().ends_with("---\n\nplaceholder\n"));

    store.save("a", &TimerRecord::default(), Some("other")).unwrap();
    assert!(store.read_text("a").unwrap().ends_with("---\n\nplaceholder\n"));
}

#[test]
fn test_save_without_mutation_is_byte_identical() {
    let tmp = TempDir::new().unwrap();
    let store = open(&tmp);
    let original = indoc! {"
        ---
        start_time: 2024-03-11T09:00:00
        end_time: 2024-03-11T12:00:00
        tags:
          - a
          - b
        project: acme
        billable: true
        ---

        # Notes
        - called client

        - sent invoice
    "};
    std::fs::write(store.timer_path("work"), original).unwrap();

    let record = store.load("work").unwrap();
    store.save("work", &record, None).unwrap();
    assert_eq!(store.read_text("work").unwrap(), original);
}

#[test]
fn test_archive_removes_from_listing() {
    let tmp = TempDir::new().unwrap();
    let store = open(&tmp);
    ops::start(&store, "work", &[], Local::now()).unwrap();
    ops::start(&store, "other", &[], Local::now()).unwrap();

    let archived = store.archive("work").unwrap();

    assert_eq!(store.list_names().unwrap(), vec!["other"]);
    assert_eq!(archived.parent().unwrap(), tmp.path().join(ARCHIVE_DIR));
    let file = archived.file_name().unwrap().to_string_lossy().to_string();
    assert!(file.starts_with("work-") && file.ends_with(".md"));

    // The name is free again and split names ignore the archive.
    ops::start(&store, "work", &[], Local::now()).unwrap();
    assert_eq!(store.next_split_name("work").unwrap(), "work-1");
}

#[test]
fn test_rename_collision_and_self_rename() {
    let tmp = TempDir::new().unwrap();
    let store = open(&tmp);
    store.save("a", &TimerRecord::default(), Some("notes a")).unwrap();
    store.save("b", &TimerRecord::default(), None).unwrap();

    assert!(matches!(store.rename("a", "b"), Err(TimerError::AlreadyExists(_))));
    assert!(store.rename("a", "a").is_ok());

    store.rename("a", "c").unwrap();
    assert_eq!(store.list_names().unwrap(), vec!["b", "c"]);
    assert!(store.read_text("c").unwrap().ends_with("notes a\n"));
}

#[test]
fn test_running_duration_uses_wall_clock() {
    let tmp = TempDir::new().unwrap();
    let store = open(&tmp);
    let started = Local::now() - Duration::minutes(10);
    ops::start(&store, "work", &[], started).unwrap();

    let record = store.load("work").unwrap();
    assert!(record.is_running());
    let elapsed = record.duration().unwrap();
    // Seconds are truncated on write, so allow a few seconds either way.
    assert!(elapsed >= Duration::minutes(10) - Duration::seconds(1));
    assert!(elapsed <= Duration::minutes(10) + Duration::seconds(5));
}

#[test]
fn test_settings_drive_new_timers() {
    let tmp = TempDir::new().unwrap();
    let settings_path = tmp.path().join("settings.json");
    let timers = tmp.path().join("timers");
    std::fs::write(
        &settings_path,
        serde_json::json!({
            "timers_dir": timers.to_string_lossy(),
            "default_metadata": "project: acme\nbillable: true",
            "default_notes": "## Log\r\n",
        })
        .to_string(),
    )
    .unwrap();

    let config = Settings::load_from(&settings_path).unwrap().store_config();
    let store = TimerStore::new(None, config);
    assert_eq!(store.dir(), timers);

    ops::start(&store, "work", &[], at("2024-03-11T09:00:00")).unwrap();
    let record = store.load("work").unwrap();
    assert_eq!(record.extra_metadata, vec!["project: acme", "billable: true"]);
    assert!(store.read_text("work").unwrap().ends_with("---\n\n## Log\n"));
}
