//! Mock server state management.
//!
//! Provides the in-memory data store for the mock Cloud API server,
//! including the requests log that drives asynchronous operations.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::{
    resource_type, Datacenter, Request, RequestMetadata, RequestProperties, RequestState,
    RequestStatus, RequestStatusMetadata, Snapshot, Volume,
};

/// Side effect applied when a request reaches DONE.
#[derive(Debug, Clone)]
pub enum Completion {
    /// A created volume appears in its datacenter.
    AddVolume { datacenter_id: String, volume: Volume },
    /// A deleted snapshot disappears.
    RemoveSnapshot(String),
    /// A deleted datacenter disappears, with its volumes.
    RemoveDatacenter(String),
}

/// An entry of the mock requests log.
#[derive(Debug, Clone)]
pub struct MockRequest {
    pub id: String,
    pub method: String,
    /// Path the request was made against, e.g. `/snapshots/9`.
    pub url: String,
    pub body: Option<String>,
    pub status: RequestState,
    /// Set to make the request end FAILED with this message.
    pub fail_message: Option<String>,
    pub completion: Option<Completion>,
}

impl MockRequest {
    /// A QUEUED request without side effects.
    pub fn queued(id: &str, method: &str, url: &str) -> Self {
        Self {
            id: id.to_string(),
            method: method.to_string(),
            url: url.to_string(),
            body: None,
            status: RequestState::Queued,
            fail_message: None,
            completion: None,
        }
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_status(mut self, status: RequestState) -> Self {
        self.status = status;
        self
    }

    pub fn failing(mut self, message: &str) -> Self {
        self.fail_message = Some(message.to_string());
        self
    }

    pub fn with_completion(mut self, completion: Completion) -> Self {
        self.completion = Some(completion);
        self
    }

    /// The status resource as the API renders it.
    pub fn to_status(&self) -> RequestStatus {
        let message = match self.status {
            RequestState::Failed => self.fail_message.clone(),
            RequestState::Done => Some("Request has been successfully executed".to_string()),
            _ => None,
        };
        RequestStatus {
            id: format!("{}/status", self.id),
            resource_type: resource_type::REQUEST_STATUS.to_string(),
            href: format!("/requests/{}/status", self.id),
            metadata: RequestStatusMetadata {
                status: self.status,
                message,
                etag: None,
                targets: vec![],
            },
        }
    }

    /// The log entry as the API renders it.
    pub fn to_request(&self) -> Request {
        Request {
            id: self.id.clone(),
            resource_type: resource_type::REQUEST.to_string(),
            href: format!("/requests/{}", self.id),
            metadata: RequestMetadata {
                request_status: Some(self.to_status()),
                ..Default::default()
            },
            properties: RequestProperties {
                method: self.method.clone(),
                headers: HashMap::new(),
                body: self.body.clone(),
                url: self.url.clone(),
            },
        }
    }
}

/// Filters accepted by the mock requests log.
#[derive(Debug, Default, Clone)]
pub struct RequestQuery {
    pub url: Option<String>,
    pub method: Option<String>,
    pub status: Option<RequestState>,
    pub body: Option<String>,
}

/// Shared state for the mock server.
///
/// Wrapped in `Arc<RwLock<_>>` for concurrent access from handlers.
#[derive(Debug, Default)]
pub struct MockState {
    pub datacenters: HashMap<String, Datacenter>,

    /// Volumes indexed by datacenter ID, then volume ID.
    pub volumes: HashMap<String, HashMap<String, Volume>>,

    pub snapshots: HashMap<String, Snapshot>,

    /// Requests log, in creation order.
    pub requests: Vec<MockRequest>,

    next_id: u64,
}

impl MockState {
    /// Create a new empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create state wrapped in Arc<RwLock> for sharing.
    pub fn shared(self) -> Arc<RwLock<Self>> {
        Arc::new(RwLock::new(self))
    }

    pub fn with_datacenter(mut self, datacenter: Datacenter) -> Self {
        self.datacenters.insert(datacenter.id.clone(), datacenter);
        self
    }

    pub fn with_volume(mut self, datacenter_id: &str, volume: Volume) -> Self {
        self.volumes
            .entry(datacenter_id.to_string())
            .or_default()
            .insert(volume.id.clone(), volume);
        self
    }

    pub fn with_snapshot(mut self, snapshot: Snapshot) -> Self {
        self.snapshots.insert(snapshot.id.clone(), snapshot);
        self
    }

    pub fn with_request(mut self, request: MockRequest) -> Self {
        self.requests.push(request);
        self
    }

    /// Allocate an ID for a new entity or request.
    pub fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}-{}", self.next_id)
    }

    /// Record a new QUEUED request and return its ID.
    pub fn record_request(
        &mut self,
        method: &str,
        url: &str,
        body: Option<String>,
        completion: Option<Completion>,
    ) -> String {
        let id = self.next_id("req");
        let mut request = MockRequest::queued(&id, method, url);
        request.body = body;
        request.completion = completion;
        self.requests.push(request);
        id
    }

    pub fn get_request(&self, id: &str) -> Option<&MockRequest> {
        self.requests.iter().find(|r| r.id == id)
    }

    /// Requests matching every set field of `query`.
    pub fn list_requests(&self, query: &RequestQuery) -> Vec<&MockRequest> {
        self.requests
            .iter()
            .filter(|r| query.url.as_deref().map_or(true, |u| r.url.contains(u)))
            .filter(|r| {
                query
                    .method
                    .as_deref()
                    .map_or(true, |m| r.method.eq_ignore_ascii_case(m))
            })
            .filter(|r| query.status.map_or(true, |s| r.status == s))
            .filter(|r| {
                query
                    .body
                    .as_deref()
                    .map_or(true, |b| r.body.as_deref().is_some_and(|body| body.contains(b)))
            })
            .collect()
    }

    /// Report the current status of a request, then move it one step on.
    ///
    /// QUEUED becomes RUNNING; RUNNING becomes DONE (or FAILED when a
    /// failure message is set) and applies the request's completion.
    pub fn poll_request(&mut self, id: &str) -> Option<RequestStatus> {
        let index = self.requests.iter().position(|r| r.id == id)?;
        let status = self.requests[index].to_status();

        let request = &mut self.requests[index];
        match request.status {
            RequestState::Queued => request.status = RequestState::Running,
            RequestState::Running if request.fail_message.is_some() => {
                request.status = RequestState::Failed;
            }
            RequestState::Running => {
                request.status = RequestState::Done;
                if let Some(completion) = request.completion.take() {
                    self.complete(completion);
                }
            }
            RequestState::Done | RequestState::Failed => {}
        }

        Some(status)
    }

    fn complete(&mut self, completion: Completion) {
        match completion {
            Completion::AddVolume {
                datacenter_id,
                volume,
            } => {
                self.volumes
                    .entry(datacenter_id)
                    .or_default()
                    .insert(volume.id.clone(), volume);
            }
            Completion::RemoveSnapshot(id) => {
                self.snapshots.remove(&id);
            }
            Completion::RemoveDatacenter(id) => {
                self.datacenters.remove(&id);
                self.volumes.remove(&id);
            }
        }
    }

    pub fn list_volumes(&self, datacenter_id: &str) -> Vec<&Volume> {
        self.volumes
            .get(datacenter_id)
            .map(|v| v.values().collect())
            .unwrap_or_default()
    }

    pub fn get_volume(&self, datacenter_id: &str, volume_id: &str) -> Option<&Volume> {
        self.volumes.get(datacenter_id)?.get(volume_id)
    }
}
