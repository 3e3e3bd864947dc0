use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use feed_logging::{feed_debug, feed_info};
use riddle_core::{FeedSettings, MediaSettings};
use riddle_engine::AtomicFileWriter;
use serde::{Deserialize, Serialize};

const CACHE_DIR: &str = "riddle_cache";

/// Everything the `riddle` binary reads from its settings file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub feed: FeedSettings,
    pub media: MediaSettings,
}

/// Loads settings, falling back to defaults when the file does not exist.
pub fn load_settings(path: &Path) -> Result<AppSettings> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            feed_debug!("No settings file at {:?}, using defaults", path);
            return Ok(AppSettings::default());
        }
        Err(err) => {
            return Err(err).with_context(|| format!("reading settings from {}", path.display()))
        }
    };

    ron::from_str(&content).with_context(|| format!("parsing settings from {}", path.display()))
}

pub fn save_settings(path: &Path, settings: &AppSettings) -> Result<PathBuf> {
    let pretty = ron::ser::PrettyConfig::new();
    let content =
        ron::ser::to_string_pretty(settings, pretty).context("serializing settings")?;

    let dir = settings_dir(path);
    let filename = path
        .file_name()
        .with_context(|| format!("settings path {} has no file name", path.display()))?
        .to_string_lossy()
        .into_owned();

    let written = AtomicFileWriter::new(dir)
        .write(&filename, content.as_bytes())
        .with_context(|| format!("writing settings to {}", path.display()))?;
    feed_info!("Saved settings to {:?}", written);
    Ok(written)
}

/// Directory for the persistent feed cache, next to the settings file.
pub fn cache_dir(settings_path: &Path) -> PathBuf {
    settings_dir(settings_path).join(CACHE_DIR)
}

fn settings_dir(settings_path: &Path) -> PathBuf {
    match settings_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
