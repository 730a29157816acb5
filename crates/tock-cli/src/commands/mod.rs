pub mod config;
pub mod timer;

use std::path::Path;
use tock_core::Settings;

pub fn load_settings(path: Option<&Path>) -> Settings {
    match path {
        Some(path) => Settings::load_or_default_from(path),
        None => Settings::load_or_default(),
    }
}
