//! Riddle engine: upstream fetching, feed caching and thumbnail IO.
mod clock;
mod fetch;
mod persist;
mod service;
mod store;
mod thumbnail;
mod types;

pub use clock::{Clock, SystemClock};
pub use fetch::{FetchSettings, Fetcher, ReqwestFetcher};
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use service::{cache_key, FeedService, FEED_CACHE_TTL};
pub use store::{CacheStore, FileCacheStore, MemoryCacheStore};
pub use thumbnail::{localize_thumbnail, ThumbnailError};
pub use types::{FailureKind, FeedError, FetchError, FetchOutput};
