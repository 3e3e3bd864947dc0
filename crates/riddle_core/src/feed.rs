use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryStatus {
    Published,
    Unpublished,
}

impl EntryStatus {
    /// Only the exact string `published` counts as published.
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw {
            Some("published") => EntryStatus::Published,
            _ => EntryStatus::Unpublished,
        }
    }

    pub fn as_flag(self) -> u8 {
        match self {
            EntryStatus::Published => 1,
            EntryStatus::Unpublished => 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedEntry {
    pub uid: String,
    pub title: String,
    pub status: EntryStatus,
    pub image: Option<String>,
}

/// Normalized snapshot of upstream entries keyed by uid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Feed {
    entries: BTreeMap<String, FeedEntry>,
}

impl Feed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an entry, replacing any earlier entry with the same uid.
    pub fn insert(&mut self, entry: FeedEntry) -> Option<FeedEntry> {
        self.entries.insert(entry.uid.clone(), entry)
    }

    pub fn get(&self, uid: &str) -> Option<&FeedEntry> {
        self.entries.get(uid)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FeedEntry> {
        self.entries.values()
    }
}

/// A feed snapshot paired with the instant it stops being served.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub feed: Arc<Feed>,
    pub expires_at: DateTime<Utc>,
}

impl CacheEntry {
    pub fn new(feed: Arc<Feed>, expires_at: DateTime<Utc>) -> Self {
        Self { feed, expires_at }
    }

    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn entry(uid: &str, title: &str) -> FeedEntry {
        FeedEntry {
            uid: uid.to_string(),
            title: title.to_string(),
            status: EntryStatus::Published,
            image: None,
        }
    }

    #[test]
    fn insert_replaces_duplicate_uid() {
        let mut feed = Feed::new();
        assert!(feed.insert(entry("a", "first")).is_none());
        let previous = feed.insert(entry("a", "second"));
        assert_eq!(previous.map(|e| e.title), Some("first".to_string()));
        assert_eq!(feed.len(), 1);
        assert_eq!(feed.get("a").map(|e| e.title.as_str()), Some("second"));
    }

    #[test]
    fn status_flag_matches_exact_string_only() {
        assert_eq!(EntryStatus::from_raw(Some("published")).as_flag(), 1);
        assert_eq!(EntryStatus::from_raw(Some("Published")).as_flag(), 0);
        assert_eq!(EntryStatus::from_raw(Some("draft")).as_flag(), 0);
        assert_eq!(EntryStatus::from_raw(None).as_flag(), 0);
    }

    #[test]
    fn cache_entry_expires_at_boundary() {
        let expires_at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 30).unwrap();
        let cached = CacheEntry::new(Arc::new(Feed::new()), expires_at);
        assert!(cached.is_fresh(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 29).unwrap()));
        assert!(!cached.is_fresh(expires_at));
    }
}
