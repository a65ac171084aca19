//! Waiting on asynchronous requests, against wiremock.

use std::time::Duration;

use profitbricks::{
    CancellationToken, Delete, ProfitBricksClient, ProfitBricksError, RequestState, Snapshot,
    WaitConfig,
};
use tokio_test::assert_err;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn status_body(status: &str, message: Option<&str>) -> serde_json::Value {
    let mut metadata = serde_json::json!({ "status": status, "targets": [] });
    if let Some(message) = message {
        metadata["message"] = message.into();
    }
    serde_json::json!({
        "id": "42/status",
        "type": "request-status",
        "href": "/requests/42/status",
        "metadata": metadata
    })
}

fn fast() -> WaitConfig {
    WaitConfig::default()
        .with_timeout(Duration::from_secs(5))
        .with_poll_interval(Duration::from_millis(10))
}

async fn mount_delete_snapshot(server: &MockServer) {
    Mock::given(method("DELETE"))
        .and(path("/snapshots/9"))
        .respond_with(ResponseTemplate::new(202).insert_header("location", "/requests/42/status"))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_delete_then_wait_polls_until_done() {
    let server = MockServer::start().await;
    mount_delete_snapshot(&server).await;

    // Mounted first, so it answers the first two polls
    Mock::given(method("GET"))
        .and(path("/requests/42/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(status_body("QUEUED", None)))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/requests/42/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(status_body("DONE", None)))
        .expect(1)
        .mount(&server)
        .await;

    let client = ProfitBricksClient::new("user", "pass", &server.uri()).unwrap();
    let accepted = Snapshot::delete(&client, "9".to_string()).await.unwrap();
    assert_eq!(accepted.status_url().unwrap(), "/requests/42/status");

    let status = client
        .wait_for_request(accepted.status_url().unwrap(), fast(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(status.state(), RequestState::Done);
}

#[tokio::test]
async fn test_failed_request_reports_provider_message() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/requests/42/status"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(status_body("FAILED", Some("snapshot is in use"))),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = ProfitBricksClient::new("user", "pass", &server.uri()).unwrap();
    let err = client
        .wait_for_request("/requests/42/status", fast(), &CancellationToken::new())
        .await
        .unwrap_err();

    match err {
        ProfitBricksError::ProviderFailure { url, message } => {
            assert_eq!(url, "/requests/42/status");
            assert_eq!(message, "snapshot is in use");
        }
        other => panic!("Expected ProviderFailure, got {other:?}"),
    }
}

#[tokio::test]
async fn test_status_fetch_error_is_propagated() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/requests/42/status"))
        .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
            "httpStatus": 500,
            "messages": [{ "errorCode": "100", "message": "internal error" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = ProfitBricksClient::new("user", "pass", &server.uri()).unwrap();
    let err = client
        .wait_for_request("/requests/42/status", fast(), &CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), Some(500));
    assert!(err.to_string().contains("internal error"));
}

#[tokio::test]
async fn test_wait_times_out_on_stuck_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/requests/42/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(status_body("RUNNING", None)))
        .mount(&server)
        .await;

    let client = ProfitBricksClient::new("user", "pass", &server.uri()).unwrap();
    let config = WaitConfig::default()
        .with_timeout(Duration::from_millis(200))
        .with_poll_interval(Duration::from_millis(20));
    let err = client
        .wait_for_request("/requests/42/status", config, &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, ProfitBricksError::Timeout { timeout, .. } if timeout == Duration::from_millis(200)));
}

#[tokio::test]
async fn test_cancelled_wait_stops_polling() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/requests/42/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(status_body("RUNNING", None)))
        .mount(&server)
        .await;

    let client = ProfitBricksClient::new("user", "pass", &server.uri()).unwrap();
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });

    let err = client
        .wait_for_request("/requests/42/status", fast(), &cancel)
        .await
        .unwrap_err();

    assert!(matches!(err, ProfitBricksError::Cancelled { .. }));
}

#[tokio::test]
async fn test_missing_location_header() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/snapshots/9"))
        .respond_with(ResponseTemplate::new(202))
        .mount(&server)
        .await;

    let client = ProfitBricksClient::new("user", "pass", &server.uri()).unwrap();
    let result = Snapshot::delete_and_wait(&client, "9".to_string(), Duration::ZERO).await;

    let err = assert_err!(result);
    assert!(matches!(err, ProfitBricksError::MissingLocation(ref p) if p == "snapshots/9"));
}

#[tokio::test]
async fn test_delete_with_unexpected_status_fails_fast() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/snapshots/9"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "httpStatus": 404,
            "messages": [{ "errorCode": "309", "message": "Resource does not exist" }]
        })))
        .mount(&server)
        .await;

    let client = ProfitBricksClient::new("user", "pass", &server.uri()).unwrap();
    let err = Snapshot::delete(&client, "9".to_string()).await.unwrap_err();

    assert!(err.is_not_found());
    assert!(matches!(
        err,
        ProfitBricksError::UnexpectedStatus { expected: 202, status: 404, .. }
    ));
}
