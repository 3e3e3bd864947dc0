use std::time::Duration;

use riddle_engine::{FailureKind, FeedError, FetchSettings, Fetcher, ReqwestFetcher};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// The blocking client must not run on the async test runtime.
async fn run_blocking<T, F>(f: F) -> T
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await.unwrap()
}

#[tokio::test]
async fn fetch_json_parses_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/items/tok"))
        .and(query_param("status", "published"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{"uid": "r1", "data": {"title": "T"}}])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let url = format!("{}/items/tok?status=published", server.uri());
    let value = run_blocking(move || {
        ReqwestFetcher::new(FetchSettings::default()).fetch_json(&url)
    })
    .await
    .expect("fetch ok");

    assert_eq!(value[0]["uid"], "r1");
}

#[tokio::test]
async fn fetch_fails_on_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let url = format!("{}/missing", server.uri());
    let err = run_blocking(move || ReqwestFetcher::default().fetch_json(&url))
        .await
        .unwrap_err();

    match err {
        FeedError::Transport(err) => assert_eq!(err.kind, FailureKind::HttpStatus(404)),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn fetch_reports_malformed_json() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/html"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let url = format!("{}/html", server.uri());
    let err = run_blocking(move || ReqwestFetcher::default().fetch_json(&url))
        .await
        .unwrap_err();

    assert!(matches!(err, FeedError::MalformedResponse(_)));
}

#[tokio::test]
async fn fetch_times_out_on_slow_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(500))
                .set_body_string("[]"),
        )
        .mount(&server)
        .await;

    let settings = FetchSettings {
        request_timeout: Duration::from_millis(50),
        ..FetchSettings::default()
    };
    let url = format!("{}/slow", server.uri());
    let err = run_blocking(move || ReqwestFetcher::new(settings).fetch_bytes(&url))
        .await
        .unwrap_err();

    assert_eq!(err.kind, FailureKind::Timeout);
}

#[tokio::test]
async fn fetch_rejects_too_large_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/large"))
        .respond_with(ResponseTemplate::new(200).set_body_string("01234567890"))
        .mount(&server)
        .await;

    let settings = FetchSettings {
        max_bytes: 10,
        ..FetchSettings::default()
    };
    let url = format!("{}/large", server.uri());
    let err = run_blocking(move || ReqwestFetcher::new(settings).fetch_bytes(&url))
        .await
        .unwrap_err();

    assert_eq!(
        err.kind,
        FailureKind::TooLarge {
            max_bytes: 10,
            actual: Some(11)
        }
    );
}

#[test]
fn fetch_rejects_invalid_url() {
    let err = ReqwestFetcher::default().fetch_bytes("not a url").unwrap_err();
    assert_eq!(err.kind, FailureKind::InvalidUrl);
}
