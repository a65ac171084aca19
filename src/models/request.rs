//! Provisioning requests and their status resources.
//!
//! Every mutating call is recorded by the API as a request. A request
//! moves through `QUEUED` and `RUNNING` to one of the terminal states
//! `DONE` or `FAILED`; its status resource is what the waiter polls.

use std::collections::HashMap;
use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};

use crate::client::ProfitBricksClient;
use crate::error::{ProfitBricksError, Result};
use crate::models::{Collection, ResourceReference};
use crate::selector::Selector;
use crate::traits::{Get, List};

/// Processing state of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestState {
    Queued,
    Running,
    Done,
    Failed,
}

impl RequestState {
    /// The wire representation, as used in filters.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Queued => "QUEUED",
            Self::Running => "RUNNING",
            Self::Done => "DONE",
            Self::Failed => "FAILED",
        }
    }

    /// DONE and FAILED never transition again.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    /// QUEUED or RUNNING.
    pub fn is_pending(&self) -> bool {
        !self.is_terminal()
    }
}

impl fmt::Display for RequestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entity touched by a request, with its own progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestTarget {
    pub target: ResourceReference,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<RequestState>,
}

/// Metadata block of a status resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestStatusMetadata {
    pub status: RequestState,

    /// Provider message; explains the failure for FAILED requests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,

    #[serde(default)]
    pub targets: Vec<RequestTarget>,
}

/// The status resource a `location` header points at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestStatus {
    #[serde(default)]
    pub id: String,

    #[serde(rename = "type", default)]
    pub resource_type: String,

    #[serde(default)]
    pub href: String,

    pub metadata: RequestStatusMetadata,
}

impl RequestStatus {
    /// Current processing state.
    pub fn state(&self) -> RequestState {
        self.metadata.status
    }

    /// Provider message, if any.
    pub fn message(&self) -> Option<&str> {
        self.metadata.message.as_deref()
    }
}

#[async_trait]
impl Get for RequestStatus {
    /// Status URL (absolute, or a path relative to the API base).
    type Id = String;

    #[tracing::instrument(skip(client))]
    async fn get(client: &ProfitBricksClient, url: String) -> Result<Self> {
        let response = client.get(&url, StatusCode::OK).await?;
        let status: RequestStatus = response.json().await.map_err(ProfitBricksError::HttpError)?;
        Ok(status)
    }
}

/// Metadata block of a request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_date: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,

    /// Embedded status resource (present at depth >= 1).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_status: Option<RequestStatus>,
}

/// The original HTTP call recorded by a request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestProperties {
    #[serde(default)]
    pub method: String,

    #[serde(default)]
    pub headers: HashMap<String, String>,

    /// Original request body, as sent. Its shape depends on the target
    /// entity and is left to the caller to decode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,

    #[serde(default)]
    pub url: String,
}

/// An entry of the historical requests log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    #[serde(default)]
    pub id: String,

    #[serde(rename = "type", default)]
    pub resource_type: String,

    #[serde(default)]
    pub href: String,

    #[serde(default)]
    pub metadata: RequestMetadata,

    #[serde(default)]
    pub properties: RequestProperties,
}

impl Request {
    /// State of the embedded status, if the response carried one.
    pub fn state(&self) -> Option<RequestState> {
        self.metadata
            .request_status
            .as_ref()
            .map(RequestStatus::state)
    }

    /// URL of the status resource for this request.
    pub fn status_url(&self) -> String {
        self.metadata
            .request_status
            .as_ref()
            .map(|s| s.href.clone())
            .filter(|href| !href.is_empty())
            .unwrap_or_else(|| request_status_path(&self.id))
    }

    /// Fetch the current status of this request.
    pub async fn status(&self, client: &ProfitBricksClient) -> Result<RequestStatus> {
        RequestStatus::get(client, self.status_url()).await
    }

    /// Select requests whose recorded method matches (case-insensitive).
    pub fn by_method(method: Method) -> Selector<Self> {
        Selector::new(move |r: &Self| r.properties.method.eq_ignore_ascii_case(method.as_str()))
    }

    /// Select requests whose embedded status is `state`.
    pub fn by_state(state: RequestState) -> Selector<Self> {
        Selector::new(move |r: &Self| r.state() == Some(state))
    }
}

#[async_trait]
impl Get for Request {
    type Id = String;

    #[tracing::instrument(skip(client))]
    async fn get(client: &ProfitBricksClient, id: String) -> Result<Self> {
        let response = client.get(&request_path(&id), StatusCode::OK).await?;
        let request: Request = response.json().await.map_err(ProfitBricksError::HttpError)?;
        Ok(request)
    }
}

#[async_trait]
impl List for Request {
    type Query = RequestListFilter;

    #[tracing::instrument(skip(client))]
    async fn list(
        client: &ProfitBricksClient,
        filter: &Self::Query,
    ) -> Result<Collection<Self>> {
        let response = client
            .get_with_query(REQUESTS_PATH, filter, StatusCode::OK)
            .await?;
        let data: Collection<Request> =
            response.json().await.map_err(ProfitBricksError::HttpError)?;
        Ok(data)
    }
}

/// Query against the requests log.
///
/// A value type: each `with_*` method returns a copy differing from the
/// receiver only in the overridden field, so one template can be
/// specialized several times.
///
/// ```
/// use profitbricks::{RequestListFilter, RequestState};
/// use profitbricks::Method;
///
/// let base = RequestListFilter::new()
///     .with_url("snapshots/9")
///     .with_method(Method::DELETE);
/// let queued = base.clone().with_status(RequestState::Queued);
/// let running = base.clone().with_status(RequestState::Running);
///
/// assert_eq!(queued.url, running.url);
/// assert_ne!(queued.status, running.status);
/// assert_eq!(base.status, None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RequestListFilter {
    /// Substring of the request URL.
    #[serde(rename = "filter.url", skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// HTTP method of the request.
    #[serde(rename = "filter.method", skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,

    /// Current request status.
    #[serde(rename = "filter.status", skip_serializing_if = "Option::is_none")]
    pub status: Option<RequestState>,

    /// Substring of the request body.
    #[serde(rename = "filter.body", skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,

    #[serde(rename = "filter.createdAfter", skip_serializing_if = "Option::is_none")]
    pub created_after: Option<DateTime<Utc>>,

    #[serde(rename = "filter.createdBefore", skip_serializing_if = "Option::is_none")]
    pub created_before: Option<DateTime<Utc>>,
}

impl RequestListFilter {
    /// An empty filter matching every request.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    #[must_use]
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = Some(method.as_str().to_string());
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: RequestState) -> Self {
        self.status = Some(status);
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    #[must_use]
    pub fn with_created_after(mut self, after: DateTime<Utc>) -> Self {
        self.created_after = Some(after);
        self
    }

    #[must_use]
    pub fn with_created_before(mut self, before: DateTime<Utc>) -> Self {
        self.created_before = Some(before);
        self
    }
}

const REQUESTS_PATH: &str = "requests";

/// Path of a single request.
pub fn request_path(request_id: &str) -> String {
    format!("{REQUESTS_PATH}/{}", urlencoding::encode(request_id))
}

/// Path of a request's status resource.
pub fn request_status_path(request_id: &str) -> String {
    format!("{}/status", request_path(request_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_request_state_wire_format() {
        let state: RequestState = serde_json::from_str("\"RUNNING\"").unwrap();
        assert_eq!(state, RequestState::Running);
        assert_eq!(serde_json::to_string(&RequestState::Queued).unwrap(), "\"QUEUED\"");
        assert_eq!(RequestState::Failed.to_string(), "FAILED");
    }

    #[test]
    fn test_request_state_terminal() {
        assert!(RequestState::Done.is_terminal());
        assert!(RequestState::Failed.is_terminal());
        assert!(RequestState::Queued.is_pending());
        assert!(RequestState::Running.is_pending());
    }

    #[test]
    fn test_status_deserializes_failure() {
        let status: RequestStatus = serde_json::from_value(serde_json::json!({
            "id": "42/status",
            "type": "request-status",
            "href": "https://api.example.com/cloudapi/v4/requests/42/status",
            "metadata": {
                "status": "FAILED",
                "message": "Volume quota exceeded",
                "etag": "abc",
                "targets": [{
                    "target": { "id": "9", "type": "snapshot", "href": "" },
                    "status": "FAILED"
                }]
            }
        }))
        .unwrap();

        assert_eq!(status.state(), RequestState::Failed);
        assert_eq!(status.message(), Some("Volume quota exceeded"));
        assert_eq!(status.metadata.targets[0].target.id, "9");
    }

    #[test]
    fn test_filter_override_changes_only_that_field() {
        let after = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let base = RequestListFilter::new()
            .with_url("datacenters/1/volumes")
            .with_method(Method::POST)
            .with_body("snap-1")
            .with_created_after(after)
            .with_status(RequestState::Queued);

        let running = base.clone().with_status(RequestState::Running);
        assert_eq!(running.status, Some(RequestState::Running));
        assert_eq!(
            RequestListFilter {
                status: base.status,
                ..running.clone()
            },
            base
        );

        let moved = base.clone().with_url("snapshots/9");
        assert_eq!(moved.url.as_deref(), Some("snapshots/9"));
        assert_eq!(
            RequestListFilter {
                url: base.url.clone(),
                ..moved
            },
            base
        );

        // The template itself is untouched
        assert_eq!(base.status, Some(RequestState::Queued));
        assert_eq!(base.url.as_deref(), Some("datacenters/1/volumes"));
    }

    #[test]
    fn test_filter_query_parameters() {
        let filter = RequestListFilter::new()
            .with_url("snapshots/9")
            .with_method(Method::DELETE)
            .with_status(RequestState::Running);

        let value = serde_json::to_value(&filter).unwrap();
        assert_eq!(value["filter.url"], "snapshots/9");
        assert_eq!(value["filter.method"], "DELETE");
        assert_eq!(value["filter.status"], "RUNNING");
        assert!(value.get("filter.body").is_none());
    }

    #[test]
    fn test_request_status_url_fallback() {
        let request = Request {
            id: "42".to_string(),
            resource_type: "request".to_string(),
            href: String::new(),
            metadata: RequestMetadata::default(),
            properties: RequestProperties::default(),
        };
        assert_eq!(request.status_url(), "requests/42/status");
        assert_eq!(request.state(), None);
    }

    #[test]
    fn test_request_selectors() {
        let request: Request = serde_json::from_value(serde_json::json!({
            "id": "1",
            "type": "request",
            "metadata": {
                "requestStatus": {
                    "id": "1/status",
                    "href": "https://api.example.com/cloudapi/v4/requests/1/status",
                    "metadata": { "status": "QUEUED" }
                }
            },
            "properties": { "method": "delete", "url": "https://api.example.com/cloudapi/v4/snapshots/9" }
        }))
        .unwrap();

        assert!(Request::by_method(Method::DELETE).matches(&request));
        assert!(Request::by_state(RequestState::Queued).matches(&request));
        assert!(!Request::by_state(RequestState::Running).matches(&request));
        assert_eq!(
            request.status_url(),
            "https://api.example.com/cloudapi/v4/requests/1/status"
        );
    }
}
