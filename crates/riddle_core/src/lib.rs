//! Riddle core: feed data model, settings and pure normalization.
mod feed;
mod media;
mod normalize;
mod settings;

pub use feed::{CacheEntry, EntryStatus, Feed, FeedEntry};
pub use media::{
    default_thumbnail, local_thumbnail_path, resolve_field, FieldValue, MediaField, UnknownField,
};
pub use normalize::{normalize, resolve_image_url, Normalized, RIDDLE_HOST};
pub use settings::{FeedSettings, MediaSettings, SettingsError, TOKEN_PLACEHOLDER};
