use chrono::{DateTime, Duration, Local};
use clap::{Args, Subcommand};
use std::path::PathBuf;
use tock_core::ops::{self, TimerSummary};
use tock_core::{Settings, TimerStore};

type CmdResult = Result<(), Box<dyn std::error::Error>>;

// A timer given by name or by file path.
#[derive(Args)]
pub struct Target {
    /// Timer name
    #[arg(required_unless_present = "timer_path")]
    name: Option<String>,
    /// Timer file inside the timer directory
    #[arg(long, conflicts_with = "name")]
    timer_path: Option<PathBuf>,
}

// Like `Target`, but may be omitted to mean the first running timer.
#[derive(Args)]
pub struct RunningTarget {
    /// Timer name (default: first running timer)
    name: Option<String>,
    /// Timer file inside the timer directory
    #[arg(long, conflicts_with = "name")]
    timer_path: Option<PathBuf>,
}

// `<old> <new>`, or `--timer-path <file> <new>`.
#[derive(Args)]
pub struct RenameNames {
    /// Current and new timer name
    #[arg(required = true, num_args = 1..=2, value_names = ["OLD", "NEW"])]
    names: Vec<String>,
    /// Timer file inside the timer directory (replaces OLD)
    #[arg(long)]
    timer_path: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum TimerAction {
    /// Create and start a timer
    Start {
        #[command(flatten)]
        target: Target,
        /// Tag to attach (repeatable)
        #[arg(long = "tag", short)]
        tags: Vec<String>,
        /// Start time (default: now)
        #[arg(long)]
        at: Option<String>,
    },
    /// Stop a running timer
    Stop {
        #[command(flatten)]
        target: RunningTarget,
        /// Stop time (default: now)
        #[arg(long)]
        at: Option<String>,
    },
    /// Stop a running timer and start its successor
    Split {
        #[command(flatten)]
        target: RunningTarget,
        /// Split time (default: now)
        #[arg(long)]
        at: Option<String>,
    },
    /// Add tags to a timer
    Tag {
        #[command(flatten)]
        target: Target,
        /// Tag to add (repeatable)
        #[arg(long = "tag", short, required = true)]
        tags: Vec<String>,
    },
    /// Remove tags from a timer
    Untag {
        #[command(flatten)]
        target: Target,
        /// Tag to remove (repeatable)
        #[arg(long = "tag", short, required = true)]
        tags: Vec<String>,
    },
    /// Overwrite the start time ("null" clears it)
    SetStart {
        #[command(flatten)]
        target: Target,
        #[arg(long)]
        at: String,
    },
    /// Overwrite the stop time ("null" clears it)
    SetStop {
        #[command(flatten)]
        target: Target,
        #[arg(long)]
        at: String,
    },
    /// Rename a timer
    Rename {
        #[command(flatten)]
        names: RenameNames,
    },
    /// Move a timer into the archive
    Archive {
        #[command(flatten)]
        target: Target,
    },
    /// List all timers
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show the first running timer
    Status,
    /// Print a timer file
    Show {
        #[command(flatten)]
        target: Target,
    },
    /// Print the timer directory
    Dir,
}

impl Target {
    fn resolve(self, store: &TimerStore) -> Result<String, Box<dyn std::error::Error>> {
        match (self.name, self.timer_path) {
            (_, Some(path)) => Ok(ops::resolve_timer_path(store, &path)?),
            (Some(name), None) => Ok(name),
            (None, None) => Err("missing timer name".into()),
        }
    }
}

impl RunningTarget {
    fn resolve(self, store: &TimerStore) -> Result<Option<String>, Box<dyn std::error::Error>> {
        match (self.name, self.timer_path) {
            (_, Some(path)) => Ok(Some(ops::resolve_timer_path(store, &path)?)),
            (name, None) => Ok(name),
        }
    }
}

impl RenameNames {
    fn resolve(self, store: &TimerStore) -> Result<(String, String), Box<dyn std::error::Error>> {
        let mut names = self.names.into_iter();
        match (self.timer_path, names.next(), names.next()) {
            (Some(path), Some(new), None) => Ok((ops::resolve_timer_path(store, &path)?, new)),
            (None, Some(old), Some(new)) => Ok((old, new)),
            (Some(_), _, _) => Err("rename --timer-path takes only the new name".into()),
            (None, _, _) => Err("rename needs the old and the new name".into()),
        }
    }
}

fn time_or_now(arg: Option<&str>, now: DateTime<Local>) -> Result<DateTime<Local>, String> {
    match arg {
        Some(text) => ops::parse_time_arg(text, now).ok_or_else(|| format!("cannot parse time: {text}")),
        None => Ok(now),
    }
}

fn optional_time(arg: &str, now: DateTime<Local>) -> Result<Option<DateTime<Local>>, String> {
    if arg.trim().eq_ignore_ascii_case("null") {
        Ok(None)
    } else {
        time_or_now(Some(arg), now).map(Some)
    }
}

/// `1h05m`; negative durations keep their sign.
pub fn format_duration(d: Duration) -> String {
    let minutes = d.num_minutes();
    let sign = if minutes < 0 { "-" } else { "" };
    let minutes = minutes.abs();
    format!("{sign}{}h{:02}m", minutes / 60, minutes % 60)
}

fn print_table(list: &[TimerSummary]) {
    for s in list {
        let marker = if s.running { '*' } else { ' ' };
        let duration = s
            .duration()
            .map(format_duration)
            .unwrap_or_else(|| "-".to_string());
        let tags = if s.tags.is_empty() {
            String::new()
        } else {
            format!("  [{}]", s.tags.join(", "))
        };
        println!("{marker} {:<24} {duration:>8}{tags}", s.name);
    }
}

pub fn run(action: TimerAction, dir: Option<PathBuf>, settings: &Settings) -> CmdResult {
    let store = TimerStore::new(dir, settings.store_config());
    let now = Local::now();

    match action {
        TimerAction::Start { target, tags, at } => {
            let name = target.resolve(&store)?;
            let at = time_or_now(at.as_deref(), now)?;
            ops::start(&store, &name, &tags, at)?;
            println!("started {}", name.trim());
        }
        TimerAction::Stop { target, at } => {
            let name = target.resolve(&store)?;
            let at = time_or_now(at.as_deref(), now)?;
            let (name, record) = ops::stop(&store, name.as_deref(), at)?;
            let duration = record.duration_at(now).map(format_duration).unwrap_or_default();
            println!("stopped {name} ({duration})");
        }
        TimerAction::Split { target, at } => {
            let name = target.resolve(&store)?;
            let at = time_or_now(at.as_deref(), now)?;
            let split = ops::split(&store, name.as_deref(), at)?;
            println!("stopped {}, started {}", split.stopped, split.started);
        }
        TimerAction::Tag { target, tags } => {
            let name = target.resolve(&store)?;
            let record = ops::tag(&store, &name, &tags)?;
            println!("{name}: [{}]", record.tags.join(", "));
        }
        TimerAction::Untag { target, tags } => {
            let name = target.resolve(&store)?;
            let record = ops::untag(&store, &name, &tags)?;
            println!("{name}: [{}]", record.tags.join(", "));
        }
        TimerAction::SetStart { target, at } => {
            let name = target.resolve(&store)?;
            ops::set_start(&store, &name, optional_time(&at, now)?)?;
            println!("updated {name}");
        }
        TimerAction::SetStop { target, at } => {
            let name = target.resolve(&store)?;
            ops::set_stop(&store, &name, optional_time(&at, now)?)?;
            println!("updated {name}");
        }
        TimerAction::Rename { names } => {
            let (old, new) = names.resolve(&store)?;
            let path = store.rename(&old, &new)?;
            println!("renamed {old} -> {}", path.display());
        }
        TimerAction::Archive { target } => {
            let name = target.resolve(&store)?;
            let path = store.archive(&name)?;
            println!("archived {name} -> {}", path.display());
        }
        TimerAction::List { json } => {
            let list = ops::summaries(&store, now)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&list)?);
            } else {
                print_table(&list);
            }
        }
        TimerAction::Status => match store.first_running_name()? {
            Some(name) => {
                let duration = store
                    .load(&name)
                    .and_then(|r| r.duration_at(now))
                    .map(format_duration)
                    .unwrap_or_default();
                println!("{name} running for {duration}");
            }
            None => println!("no running timer"),
        },
        TimerAction::Show { target } => {
            let name = target.resolve(&store)?;
            if !store.exists(&name) {
                return Err(tock_core::TimerError::NotFound(name).into());
            }
            print!("{}", store.read_text(&name)?);
        }
        TimerAction::Dir => println!("{}", store.dir().display()),
    }

    Ok(())
}
