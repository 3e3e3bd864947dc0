use serde_json::{Map, Value};
use url::Url;

use crate::{EntryStatus, Feed, FeedEntry};

/// Host that relative image paths are served from.
pub const RIDDLE_HOST: &str = "https://www.riddle.com";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Normalized {
    pub feed: Feed,
    /// Entries dropped by validation.
    pub skipped: usize,
}

/// Projects a raw API response into a [`Feed`].
///
/// Anything other than a JSON array yields an empty feed. Invalid entries are
/// skipped rather than failing the batch, and a later entry with an already
/// seen uid replaces the earlier one.
pub fn normalize(raw: &Value, empty_title_prefix: &str) -> Normalized {
    let mut normalized = Normalized::default();
    let Some(items) = raw.as_array() else {
        return normalized;
    };

    for item in items {
        match normalize_entry(item, empty_title_prefix) {
            Some(entry) => {
                normalized.feed.insert(entry);
            }
            None => normalized.skipped += 1,
        }
    }
    normalized
}

fn normalize_entry(item: &Value, empty_title_prefix: &str) -> Option<FeedEntry> {
    let entry = item.as_object()?;
    let data = non_empty_object(entry, "data");
    let draft = non_empty_object(entry, "draftData");
    if data.is_none() && draft.is_none() {
        return None;
    }
    let uid = uid(entry.get("uid")?)?;

    let title = data
        .and_then(|d| text(d, "/title"))
        .or_else(|| draft.and_then(|d| text(d, "/title")))
        .map(ToOwned::to_owned)
        .unwrap_or_else(|| format!("{empty_title_prefix}{uid}"));

    let status = EntryStatus::from_raw(entry.get("status").and_then(Value::as_str));

    let image_source = [data, draft]
        .into_iter()
        .flatten()
        .find(|d| text(d, "/image/standard").is_some());
    let image = image_source.and_then(|d| {
        let standard = text(d, "/image/standard")?;
        resolve_image_url(standard, text(d, "/image/format"))
    });

    Some(FeedEntry {
        uid,
        title,
        status,
        image,
    })
}

/// Turns a possibly relative image url into an absolute one.
///
/// Relative or host-less urls are resolved against [`RIDDLE_HOST`]. Port,
/// query and fragment are dropped. When the last path segment has no
/// extension and a format hint is given, `.<format>` is appended.
pub fn resolve_image_url(standard: &str, format: Option<&str>) -> Option<String> {
    let parsed = match Url::parse(standard) {
        Ok(url) => url,
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            Url::parse(RIDDLE_HOST).ok()?.join(standard).ok()?
        }
        Err(_) => return None,
    };

    let path = parsed.path();
    let mut image = match parsed.host_str().filter(|host| !host.is_empty()) {
        Some(host) => format!("{}://{}{}", parsed.scheme(), host, path),
        None if path.starts_with('/') => format!("{RIDDLE_HOST}{path}"),
        None => format!("{RIDDLE_HOST}/{path}"),
    };

    if let Some(format) = format.filter(|f| !f.is_empty()) {
        if !has_extension(path) {
            image.push('.');
            image.push_str(format);
        }
    }
    Some(image)
}

fn has_extension(path: &str) -> bool {
    let segment = path.rsplit('/').next().unwrap_or(path);
    segment
        .rsplit_once('.')
        .is_some_and(|(_, ext)| !ext.is_empty())
}

// Only blank or non-scalar uids are missing; "0" and 0 are real identifiers.
fn uid(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn non_empty_object<'a>(entry: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    entry
        .get(key)
        .filter(|value| value.as_object().is_some_and(|map| !map.is_empty()))
}

fn text<'a>(value: &'a Value, pointer: &str) -> Option<&'a str> {
    value
        .pointer(pointer)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}
