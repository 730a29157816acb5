pub mod codec;
mod record;

pub use codec::{decode, encode, extract_notes, format_timestamp, parse_timestamp};
pub use record::TimerRecord;
