mod common;

use std::fs;

use common::{init_logging, FakeFetcher};
use riddle_core::{normalize, Feed, MediaSettings};
use riddle_engine::{localize_thumbnail, FailureKind, FetchError, ThumbnailError};
use serde_json::json;
use tempfile::TempDir;

fn feed() -> Feed {
    normalize(
        &json!([
            {"uid": "r1", "data": {"image": {"standard": "/img/r1", "format": "png"}}},
            {"uid": "r2", "data": {"title": "No image"}}
        ]),
        "Riddle ",
    )
    .feed
}

fn settings(temp: &TempDir) -> MediaSettings {
    MediaSettings {
        local_images: temp.path().join("riddle"),
        ..MediaSettings::default()
    }
}

#[test]
fn downloads_once_then_reuses_local_copy() {
    init_logging();
    let temp = TempDir::new().unwrap();
    let settings = settings(&temp);
    let fetcher = FakeFetcher::with_body(b"PNGDATA".to_vec());
    let feed = feed();

    let path = localize_thumbnail(&fetcher, &feed, "r1", &settings)
        .unwrap()
        .expect("thumbnail path");
    assert_eq!(path, temp.path().join("riddle").join("r1.png"));
    assert_eq!(fs::read(&path).unwrap(), b"PNGDATA");
    assert_eq!(fetcher.urls(), vec!["https://www.riddle.com/img/r1.png".to_string()]);

    let again = localize_thumbnail(&fetcher, &feed, "r1", &settings).unwrap();
    assert_eq!(again, Some(path));
    assert_eq!(fetcher.calls(), 1);
}

#[test]
fn unknown_riddle_or_missing_image_is_none() {
    let temp = TempDir::new().unwrap();
    let settings = settings(&temp);
    let fetcher = FakeFetcher::with_body(Vec::new());
    let feed = feed();

    assert!(localize_thumbnail(&fetcher, &feed, "nope", &settings).unwrap().is_none());
    assert!(localize_thumbnail(&fetcher, &feed, "r2", &settings).unwrap().is_none());
    assert_eq!(fetcher.calls(), 0);
}

#[test]
fn failed_download_writes_nothing() {
    let temp = TempDir::new().unwrap();
    let settings = settings(&temp);
    let fetcher = FakeFetcher::failing(FetchError::new(FailureKind::HttpStatus(404), "404"));

    let err = localize_thumbnail(&fetcher, &feed(), "r1", &settings).unwrap_err();
    assert!(matches!(err, ThumbnailError::Fetch(_)));
    assert!(!temp.path().join("riddle").join("r1.png").exists());
}

#[test]
fn hostile_uid_cannot_write_outside_local_images() {
    let temp = TempDir::new().unwrap();
    let settings = settings(&temp);
    let outside = temp.path().join("outside").join("owned");
    let feed = normalize(
        &json!([
            {"uid": outside.to_string_lossy(), "data": {"image": {"standard": "/img/a.png"}}},
            {"uid": "../climb", "data": {"image": {"standard": "/img/b.png"}}}
        ]),
        "Riddle ",
    )
    .feed;
    let fetcher = FakeFetcher::with_body(b"PNG".to_vec());

    for entry in feed.iter() {
        let local = localize_thumbnail(&fetcher, &feed, &entry.uid, &settings).unwrap();
        assert_eq!(local, None);
    }
    assert_eq!(fetcher.calls(), 0);
    assert!(!temp.path().join("outside").exists());
    assert!(!temp.path().join("climb.png").exists());
}
