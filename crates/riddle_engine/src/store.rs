use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use feed_logging::{feed_debug, feed_warn};
use riddle_core::{CacheEntry, Feed};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::AtomicFileWriter;

/// Key/value storage for cached feed snapshots.
///
/// Writes replace the whole entry; readers never observe a partial update.
pub trait CacheStore: Send + Sync {
    fn get(&self, key: &str) -> Option<CacheEntry>;
    fn set(&self, key: &str, entry: CacheEntry);
}

#[derive(Debug, Default)]
pub struct MemoryCacheStore {
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl MemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CacheStore for MemoryCacheStore {
    fn get(&self, key: &str) -> Option<CacheEntry> {
        let entries = self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        entries.get(key).cloned()
    }

    fn set(&self, key: &str, entry: CacheEntry) {
        let mut entries = self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        entries.insert(key.to_string(), entry);
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct PersistedEntry {
    expires_at: DateTime<Utc>,
    feed: Feed,
}

/// Cache store that survives process restarts: one RON file per key.
///
/// File names are a hash of the key, so tokens never appear on disk.
/// Unreadable or corrupt files count as a miss.
#[derive(Debug, Clone)]
pub struct FileCacheStore {
    dir: PathBuf,
}

impl FileCacheStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn file_name(key: &str) -> String {
        format!("feed-{}.ron", short_hash(key))
    }
}

impl CacheStore for FileCacheStore {
    fn get(&self, key: &str) -> Option<CacheEntry> {
        let path = self.dir.join(Self::file_name(key));
        let content = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return None,
            Err(err) => {
                feed_warn!("Failed to read feed cache {:?}: {}", path, err);
                return None;
            }
        };

        match ron::from_str::<PersistedEntry>(&content) {
            Ok(persisted) => {
                feed_debug!("Loaded feed cache {:?}", path);
                Some(CacheEntry::new(Arc::new(persisted.feed), persisted.expires_at))
            }
            Err(err) => {
                feed_warn!("Ignoring corrupt feed cache {:?}: {}", path, err);
                None
            }
        }
    }

    fn set(&self, key: &str, entry: CacheEntry) {
        let persisted = PersistedEntry {
            expires_at: entry.expires_at,
            feed: entry.feed.as_ref().clone(),
        };
        let content = match ron::ser::to_string_pretty(&persisted, ron::ser::PrettyConfig::new()) {
            Ok(text) => text,
            Err(err) => {
                feed_warn!("Failed to serialize feed cache: {}", err);
                return;
            }
        };

        let writer = AtomicFileWriter::new(self.dir.clone());
        if let Err(err) = writer.write(&Self::file_name(key), content.as_bytes()) {
            feed_warn!("Failed to write feed cache to {:?}: {}", self.dir, err);
        }
    }
}

fn short_hash(input: &str) -> String {
    let digest = Sha256::digest(input.as_bytes());
    let mut hex = String::with_capacity(16);
    for byte in digest.iter().take(8) {
        use std::fmt::Write;
        let _ = write!(&mut hex, "{byte:02x}");
    }
    hex
}
