//! # tock core library
//!
//! Personal time tracking where every timer is a small markdown file:
//! a front-matter block with start/stop timestamps and tags, followed by
//! free-form notes. The line-mode CLI and the dashboard share this crate.
//!
//! ## Architecture
//!
//! - **Record**: [`TimerRecord`], the in-memory state of one timer
//! - **Codec**: lossless front-matter encode/decode in [`timer::codec`]
//! - **Storage**: [`TimerStore`], one `<name>.md` per timer in a directory,
//!   with archive and rename, configured from JSON [`Settings`]
//! - **Operations**: start/stop/split/tag flows in [`ops`]

pub mod error;
pub mod ops;
pub mod storage;
pub mod timer;

pub use error::{ConfigError, Result, TimerError};
pub use ops::{Split, TimerSummary};
pub use storage::{Settings, StoreConfig, TimerStore};
pub use timer::TimerRecord;
