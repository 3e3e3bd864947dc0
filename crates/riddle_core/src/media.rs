use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::str::FromStr;

use thiserror::Error;
use url::Url;

use crate::{EntryStatus, Feed, FeedEntry, MediaSettings};

const DEFAULT_ICON: &str = "riddle.png";

/// Fields a riddle media item exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaField {
    Id,
    Title,
    Status,
    Thumbnail,
    ThumbnailLocalUri,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown media field: {0}")]
pub struct UnknownField(pub String);

impl FromStr for MediaField {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "id" => Ok(MediaField::Id),
            "title" => Ok(MediaField::Title),
            "status" => Ok(MediaField::Status),
            "thumbnail" => Ok(MediaField::Thumbnail),
            "thumbnail_local_uri" => Ok(MediaField::ThumbnailLocalUri),
            other => Err(UnknownField(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Status(EntryStatus),
    Path(PathBuf),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(text) => write!(f, "{text}"),
            FieldValue::Status(status) => write!(f, "{}", status.as_flag()),
            FieldValue::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Resolves one media field for the riddle identified by `code`.
///
/// `Id` never touches the feed. Every other field is `None` when the code is
/// not in the feed or the entry lacks the data.
pub fn resolve_field(
    feed: &Feed,
    code: &str,
    field: MediaField,
    settings: &MediaSettings,
) -> Option<FieldValue> {
    if code.is_empty() {
        return None;
    }

    let entry = || feed.get(code);
    match field {
        MediaField::Id => Some(FieldValue::Text(code.to_string())),
        MediaField::Title => entry().map(|e| FieldValue::Text(e.title.clone())),
        MediaField::Status => entry().map(|e| FieldValue::Status(e.status)),
        MediaField::Thumbnail => entry()?.image.clone().map(FieldValue::Text),
        MediaField::ThumbnailLocalUri => {
            local_thumbnail_path(entry()?, &settings.local_images).map(FieldValue::Path)
        }
    }
}

/// `<local_images>/<uid>.<ext>`, with the extension taken from the image url.
///
/// `None` unless the uid is a single plain file name, so an upstream uid can
/// never point outside `local_images`.
pub fn local_thumbnail_path(entry: &FeedEntry, local_images: &Path) -> Option<PathBuf> {
    if !is_plain_file_name(&entry.uid) {
        return None;
    }
    let image = entry.image.as_deref()?;
    let extension = Url::parse(image)
        .ok()
        .and_then(|url| {
            Path::new(url.path())
                .extension()
                .map(|ext| ext.to_string_lossy().into_owned())
        })
        .unwrap_or_default();
    Some(local_images.join(format!("{}.{}", entry.uid, extension)))
}

fn is_plain_file_name(name: &str) -> bool {
    if name.contains(['/', '\\']) {
        return false;
    }
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

pub fn default_thumbnail(settings: &MediaSettings) -> PathBuf {
    settings.icon_base.join(DEFAULT_ICON)
}
