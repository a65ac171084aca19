//! Envelope types shared by every Cloud API entity.

use chrono::{DateTime, Utc};
use reqwest::Response;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::client::{location_header, ProfitBricksClient};
use crate::error::{ProfitBricksError, Result};
use crate::models::RequestStatus;
use crate::selector::Selector;

/// Values of the `type` field used by the API.
pub mod resource_type {
    pub const COLLECTION: &str = "collection";
    pub const DATACENTER: &str = "datacenter";
    pub const SERVER: &str = "server";
    pub const VOLUME: &str = "volume";
    pub const SNAPSHOT: &str = "snapshot";
    pub const REQUEST: &str = "request";
    pub const REQUEST_STATUS: &str = "request-status";
}

/// Bookkeeping the API attaches to every entity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_date: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by_user_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified_date: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified_by: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified_by_user_id: Option<String>,

    /// Entity state, e.g. `AVAILABLE`, `BUSY` or `INACTIVE`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

/// A bare reference to another entity, as found in nested properties.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceReference {
    pub id: String,
    #[serde(rename = "type", default)]
    pub resource_type: String,
    #[serde(default)]
    pub href: String,
}

/// An entity: identity, metadata and kind-specific properties.
///
/// Concrete entities are aliases, e.g. [`Snapshot`](crate::Snapshot) is
/// `Resource<SnapshotProperties>`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(
    serialize = "P: Serialize",
    deserialize = "P: Deserialize<'de> + Default"
))]
pub struct Resource<P> {
    #[serde(default)]
    pub id: String,

    /// The `type` tag; see [`resource_type`].
    #[serde(rename = "type", default)]
    pub resource_type: String,

    #[serde(default)]
    pub href: String,

    #[serde(default)]
    pub metadata: Metadata,

    #[serde(default)]
    pub properties: P,

    /// Nested collections (servers, volumes, ...) when requested depth allows.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entities: Option<serde_json::Value>,
}

impl<P> Resource<P> {
    /// The entity state from its metadata, if reported.
    pub fn state(&self) -> Option<&str> {
        self.metadata.state.as_deref()
    }

    /// Check the `type` tag against the value an operation expects.
    pub fn has_type(&self, expected: &str) -> bool {
        self.resource_type == expected
    }
}

impl<P: 'static> Resource<P> {
    /// Select entities by ID.
    pub fn by_id(id: impl Into<String>) -> Selector<Self> {
        let id = id.into();
        Selector::new(move |r: &Self| r.id == id)
    }

    /// Select entities by metadata state.
    pub fn by_state(state: impl Into<String>) -> Selector<Self> {
        let state = state.into();
        Selector::new(move |r: &Self| r.state() == Some(state.as_str()))
    }
}

/// A list response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(serialize = "T: Serialize", deserialize = "T: Deserialize<'de>"))]
pub struct Collection<T> {
    #[serde(default)]
    pub id: String,

    #[serde(rename = "type", default)]
    pub resource_type: String,

    #[serde(default)]
    pub href: String,

    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

impl<T> Collection<T> {
    /// Returns true if the collection has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns an iterator over the items.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }
}

impl<T> IntoIterator for Collection<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Collection<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Body of a create call: `{"properties": {...}}`.
#[derive(Debug, Serialize)]
pub(crate) struct CreateBody<'a, P> {
    pub properties: &'a P,
}

/// Result of a mutating call the API accepted for asynchronous processing.
#[derive(Debug, Clone)]
pub struct Accepted<T> {
    /// The response body (the entity as it will be once provisioned).
    pub value: T,
    /// The `location` header: URL of the request status resource.
    pub location: Option<String>,
    path: String,
}

impl<T> Accepted<T> {
    pub(crate) fn new(path: impl Into<String>, value: T, location: Option<String>) -> Self {
        Self {
            value,
            location,
            path: path.into(),
        }
    }

    /// The request status URL.
    ///
    /// # Errors
    ///
    /// Returns [`ProfitBricksError::MissingLocation`] if the response had
    /// no `location` header.
    pub fn status_url(&self) -> Result<&str> {
        self.location
            .as_deref()
            .ok_or_else(|| ProfitBricksError::MissingLocation(self.path.clone()))
    }

    /// Wait for the accepted request to finish.
    ///
    /// A zero `timeout` waits for the default ten minutes.
    ///
    /// # Errors
    ///
    /// See [`ProfitBricksClient::wait_till_provisioned_or_canceled`].
    pub async fn wait(
        &self,
        client: &ProfitBricksClient,
        timeout: std::time::Duration,
    ) -> Result<RequestStatus> {
        let url = self.status_url()?;
        client.wait_till_provisioned_or_canceled(url, timeout).await
    }

    /// Take the response body.
    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T: DeserializeOwned> Accepted<T> {
    /// Decode an accepted response, keeping its `location` header.
    pub(crate) async fn from_response(path: &str, response: Response) -> Result<Self> {
        let location = location_header(&response);
        let value: T = response.json().await.map_err(ProfitBricksError::HttpError)?;
        Ok(Self::new(path, value, location))
    }
}

impl Accepted<()> {
    /// Wrap an accepted response whose body is ignored.
    pub(crate) fn from_empty_response(path: &str, response: &Response) -> Self {
        Self::new(path, (), location_header(response))
    }
}
