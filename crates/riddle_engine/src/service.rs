use std::sync::Arc;
use std::time::Duration;

use feed_logging::{feed_debug, feed_info, feed_warn, redact};
use riddle_core::{normalize, CacheEntry, Feed, FeedSettings};

use crate::{CacheStore, Clock, FeedError, Fetcher};

/// How long a fetched feed is served before the next lookup refetches it.
///
/// Kept short so an entry just created upstream shows up within the same
/// editing session.
pub const FEED_CACHE_TTL: Duration = Duration::from_secs(30);

pub fn cache_key(token: &str) -> String {
    format!("riddle_feed:{token}")
}

/// Fetches, normalizes and caches the riddle feed of the configured token.
pub struct FeedService {
    settings: FeedSettings,
    fetcher: Arc<dyn Fetcher>,
    clock: Arc<dyn Clock>,
    store: Arc<dyn CacheStore>,
}

impl FeedService {
    pub fn new(
        settings: FeedSettings,
        fetcher: Arc<dyn Fetcher>,
        clock: Arc<dyn Clock>,
        store: Arc<dyn CacheStore>,
    ) -> Self {
        Self {
            settings,
            fetcher,
            clock,
            store,
        }
    }

    /// Returns the cached feed while it is fresh, otherwise refetches it.
    ///
    /// Errors propagate as-is: nothing is cached and an expired snapshot is
    /// never returned as a fallback.
    pub fn get_feed(&self) -> Result<Arc<Feed>, FeedError> {
        let token = self.settings.token().ok_or(FeedError::MissingCredential)?;
        let key = cache_key(token);
        let now = self.clock.now();

        if let Some(cached) = self.store.get(&key) {
            if cached.is_fresh(now) {
                feed_debug!("Feed cache hit for token {}", redact(token));
                return Ok(cached.feed);
            }
        }

        feed_info!("Feed cache miss for token {}, fetching", redact(token));
        let url = self.settings.api_url()?;
        let raw = self.fetcher.fetch_json(&url).map_err(|err| {
            feed_warn!("Feed fetch failed for token {}: {}", redact(token), err);
            err
        })?;

        let normalized = normalize(&raw, &self.settings.empty_title_prefix);
        if normalized.skipped > 0 {
            feed_debug!("Skipped {} invalid feed entries", normalized.skipped);
        }

        let feed = Arc::new(normalized.feed);
        let expires_at = self.clock.now() + FEED_CACHE_TTL;
        self.store.set(&key, CacheEntry::new(feed.clone(), expires_at));
        feed_info!("Cached {} feed entries until {}", feed.len(), expires_at);
        Ok(feed)
    }
}
