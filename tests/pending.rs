//! In-flight operation checks against the requests log, using wiremock.

use profitbricks::{
    has_delete_snapshot_in_progress, has_pending_operation, is_snapshot_in_use,
    is_snapshot_in_use_strict, pending_requests, Method, ProfitBricksClient, RequestListFilter,
};
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn collection(items: Vec<serde_json::Value>) -> serde_json::Value {
    serde_json::json!({
        "id": "requests",
        "type": "collection",
        "href": "/requests",
        "items": items
    })
}

fn request(
    id: &str,
    http_method: &str,
    url: &str,
    body: Option<&str>,
    status: &str,
) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "type": "request",
        "href": format!("/requests/{id}"),
        "metadata": {
            "requestStatus": {
                "id": format!("{id}/status"),
                "type": "request-status",
                "href": format!("/requests/{id}/status"),
                "metadata": { "status": status }
            }
        },
        "properties": { "method": http_method, "url": url, "headers": {}, "body": body }
    })
}

fn volumes(items: Vec<serde_json::Value>) -> serde_json::Value {
    serde_json::json!({
        "id": "dc-1/volumes",
        "type": "collection",
        "href": "/datacenters/dc-1/volumes",
        "items": items
    })
}

fn client(server: &MockServer) -> ProfitBricksClient {
    ProfitBricksClient::new("user", "pass", &server.uri()).unwrap()
}

async fn mount_requests(server: &MockServer, status: &str, items: Vec<serde_json::Value>) {
    Mock::given(method("GET"))
        .and(path("/requests"))
        .and(query_param("filter.status", status))
        .respond_with(ResponseTemplate::new(200).set_body_json(collection(items)))
        .mount(server)
        .await;
}

// =============================================================================
// has_pending_operation
// =============================================================================

#[tokio::test]
async fn test_queued_request_is_pending_without_asking_for_running() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/requests"))
        .and(query_param("filter.url", "/snapshots/9"))
        .and(query_param("filter.method", "DELETE"))
        .and(query_param("filter.status", "QUEUED"))
        .respond_with(ResponseTemplate::new(200).set_body_json(collection(vec![request(
            "1",
            "DELETE",
            "/snapshots/9",
            None,
            "QUEUED",
        )])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/requests"))
        .and(query_param("filter.status", "RUNNING"))
        .respond_with(ResponseTemplate::new(200).set_body_json(collection(vec![])))
        .expect(0)
        .mount(&server)
        .await;

    let pending = has_pending_operation(&client(&server), "/snapshots/9", Method::DELETE).await;

    assert!(assert_ok!(pending));
}

#[tokio::test]
async fn test_running_request_is_pending() {
    let server = MockServer::start().await;
    mount_requests(&server, "QUEUED", vec![]).await;
    mount_requests(
        &server,
        "RUNNING",
        vec![request("2", "DELETE", "/snapshots/9", None, "RUNNING")],
    )
    .await;

    let pending = has_delete_snapshot_in_progress(&client(&server), "9")
        .await
        .unwrap();

    assert!(pending);
}

#[tokio::test]
async fn test_nothing_pending() {
    let server = MockServer::start().await;
    mount_requests(&server, "QUEUED", vec![]).await;
    mount_requests(&server, "RUNNING", vec![]).await;

    let pending = has_pending_operation(&client(&server), "snapshots/9", Method::DELETE)
        .await
        .unwrap();

    assert!(!pending);
}

#[tokio::test]
async fn test_list_failure_aborts_the_check() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/requests"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let result = has_pending_operation(&client(&server), "snapshots/9", Method::DELETE).await;

    let err = assert_err!(result);
    assert_eq!(err.status_code(), Some(503));
}

#[tokio::test]
async fn test_pending_requests_lists_queued_before_running() {
    let server = MockServer::start().await;
    mount_requests(
        &server,
        "QUEUED",
        vec![request("1", "POST", "/datacenters/dc-1/volumes", None, "QUEUED")],
    )
    .await;
    mount_requests(
        &server,
        "RUNNING",
        vec![request("2", "POST", "/datacenters/dc-1/volumes", None, "RUNNING")],
    )
    .await;

    let filter = RequestListFilter::new().with_method(Method::POST);
    let requests = pending_requests(&client(&server), &filter).await.unwrap();

    let ids: Vec<&str> = requests.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2"]);
}

// =============================================================================
// is_snapshot_in_use
// =============================================================================

async fn mount_volumes(server: &MockServer, items: Vec<serde_json::Value>) {
    Mock::given(method("GET"))
        .and(path("/datacenters/dc-1/volumes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(volumes(items)))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_snapshot_used_by_existing_volume() {
    let server = MockServer::start().await;
    mount_volumes(
        &server,
        vec![serde_json::json!({
            "id": "vol-1",
            "type": "volume",
            "properties": { "name": "root", "image": "snap-1", "size": 10 }
        })],
    )
    .await;

    let in_use = is_snapshot_in_use(&client(&server), "dc-1", "snap-1")
        .await
        .unwrap();

    assert!(in_use);
}

#[tokio::test]
async fn test_snapshot_used_by_running_volume_creation() {
    let server = MockServer::start().await;
    mount_volumes(&server, vec![]).await;

    let body = r#"{"properties":{"name":"restored","size":10,"image":"snap-1","type":"HDD"}}"#;
    Mock::given(method("GET"))
        .and(path("/requests"))
        .and(query_param("filter.url", "datacenters/dc-1/volumes"))
        .and(query_param("filter.method", "POST"))
        .and(query_param("filter.status", "QUEUED"))
        .respond_with(ResponseTemplate::new(200).set_body_json(collection(vec![])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/requests"))
        .and(query_param("filter.status", "RUNNING"))
        .respond_with(ResponseTemplate::new(200).set_body_json(collection(vec![request(
            "7",
            "POST",
            "/datacenters/dc-1/volumes",
            Some(body),
            "RUNNING",
        )])))
        .mount(&server)
        .await;

    let in_use = is_snapshot_in_use(&client(&server), "dc-1", "snap-1")
        .await
        .unwrap();

    assert!(in_use);
}

#[tokio::test]
async fn test_malformed_request_body_is_not_a_reference() {
    let server = MockServer::start().await;
    mount_volumes(&server, vec![]).await;
    mount_requests(&server, "QUEUED", vec![]).await;
    mount_requests(
        &server,
        "RUNNING",
        vec![request(
            "7",
            "POST",
            "/datacenters/dc-1/volumes",
            Some("snap-1 but not json"),
            "RUNNING",
        )],
    )
    .await;

    let in_use = is_snapshot_in_use(&client(&server), "dc-1", "snap-1")
        .await
        .unwrap();

    assert!(!in_use);
}

#[tokio::test]
async fn test_mistyped_body_field_still_references_image() {
    let server = MockServer::start().await;
    mount_volumes(&server, vec![]).await;
    mount_requests(
        &server,
        "QUEUED",
        vec![request(
            "8",
            "POST",
            "/datacenters/dc-1/volumes",
            Some(r#"{"properties":{"name":"data","size":"10","image":"snap-1","deviceNumber":-1}}"#),
            "QUEUED",
        )],
    )
    .await;
    mount_requests(&server, "RUNNING", vec![]).await;

    let in_use = is_snapshot_in_use(&client(&server), "dc-1", "snap-1")
        .await
        .unwrap();

    assert!(in_use);
}

#[tokio::test]
async fn test_volume_list_failure_policy() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/datacenters/dc-1/volumes"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    // The requests log is not consulted once volumes cannot be listed
    Mock::given(method("GET"))
        .and(path("/requests"))
        .respond_with(ResponseTemplate::new(200).set_body_json(collection(vec![])))
        .expect(0)
        .mount(&server)
        .await;

    let client = client(&server);

    let lenient = is_snapshot_in_use(&client, "dc-1", "snap-1").await;
    assert!(!assert_ok!(lenient));

    let strict = is_snapshot_in_use_strict(&client, "dc-1", "snap-1").await;
    let err = assert_err!(strict);
    assert_eq!(err.status_code(), Some(500));
}

#[tokio::test]
async fn test_requests_log_failure_is_an_error() {
    let server = MockServer::start().await;
    mount_volumes(&server, vec![]).await;

    Mock::given(method("GET"))
        .and(path("/requests"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let result = is_snapshot_in_use(&client(&server), "dc-1", "snap-1").await;

    assert_err!(result);
}
