use std::path::PathBuf;
use tock_core::{Settings, TimerStore};

pub fn run(dir: Option<PathBuf>, settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    let store = TimerStore::new(dir, settings.store_config());
    let config = store.config();
    let json = serde_json::json!({
        "timers_dir": store.dir().display().to_string(),
        "default_metadata": config.default_metadata,
        "default_notes": config.default_notes,
    });
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
