#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use riddle_engine::{Clock, FetchError, FetchOutput, Fetcher};

pub fn init_logging() {
    feed_logging::initialize_for_tests();
}

pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Mutex::new(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now = *now + by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

/// Serves a canned response and records every requested url.
pub struct FakeFetcher {
    response: Mutex<Result<Vec<u8>, FetchError>>,
    urls: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

impl FakeFetcher {
    pub fn with_body(body: impl Into<Vec<u8>>) -> Self {
        Self {
            response: Mutex::new(Ok(body.into())),
            urls: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(err: FetchError) -> Self {
        let fetcher = Self::with_body(Vec::new());
        fetcher.respond_with(Err(err));
        fetcher
    }

    pub fn respond_with(&self, response: Result<Vec<u8>, FetchError>) {
        *self.response.lock().unwrap() = response;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn urls(&self) -> Vec<String> {
        self.urls.lock().unwrap().clone()
    }
}

impl Fetcher for FakeFetcher {
    fn fetch_bytes(&self, url: &str) -> Result<FetchOutput, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.urls.lock().unwrap().push(url.to_string());
        self.response
            .lock()
            .unwrap()
            .clone()
            .map(|bytes| FetchOutput { bytes })
    }
}
