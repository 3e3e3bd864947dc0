use std::path::PathBuf;

use feed_logging::feed_info;
use riddle_core::{local_thumbnail_path, Feed, MediaSettings};
use thiserror::Error;

use crate::{AtomicFileWriter, FetchError, Fetcher, PersistError};

#[derive(Debug, Error)]
pub enum ThumbnailError {
    #[error("thumbnail download failed: {0}")]
    Fetch(#[from] FetchError),
    #[error("thumbnail could not be stored: {0}")]
    Persist(#[from] PersistError),
}

/// Returns the local copy of a riddle thumbnail, downloading it on first use.
///
/// `Ok(None)` when the riddle is unknown or has no image.
pub fn localize_thumbnail(
    fetcher: &dyn Fetcher,
    feed: &Feed,
    code: &str,
    settings: &MediaSettings,
) -> Result<Option<PathBuf>, ThumbnailError> {
    let Some(entry) = feed.get(code) else {
        return Ok(None);
    };
    let (Some(image), Some(local)) = (
        entry.image.as_deref(),
        local_thumbnail_path(entry, &settings.local_images),
    ) else {
        return Ok(None);
    };
    if local.exists() {
        return Ok(Some(local));
    }

    let output = fetcher.fetch_bytes(image)?;
    let dir = local
        .parent()
        .map(PathBuf::from)
        .unwrap_or_else(|| settings.local_images.clone());
    let filename = local
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| entry.uid.clone());
    let written = AtomicFileWriter::new(dir).write(&filename, &output.bytes)?;
    feed_info!(
        "Stored thumbnail for {} ({} bytes) at {:?}",
        code,
        output.bytes.len(),
        written
    );
    Ok(Some(written))
}
