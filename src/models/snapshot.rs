//! Snapshot model, trait implementations and in-use checks.

use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};

use crate::client::ProfitBricksClient;
use crate::error::{ProfitBricksError, Result};
use crate::models::{volumes_path, Accepted, Collection, RequestListFilter, Resource, Volume};
use crate::pending::{has_pending_operation, pending_requests};
use crate::selector::Selector;
use crate::traits::{Delete, Get, List, Update};

/// A point-in-time copy of a volume, usable as the image of new volumes.
pub type Snapshot = Resource<SnapshotProperties>;

/// Properties of a snapshot.
///
/// Also used as patch parameters; unset fields are omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    /// Size in GB.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu_hot_plug: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu_hot_unplug: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ram_hot_plug: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ram_hot_unplug: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nic_hot_plug: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nic_hot_unplug: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disc_virtio_hot_plug: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disc_virtio_hot_unplug: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disc_scsi_hot_plug: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disc_scsi_hot_unplug: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub licence_type: Option<String>,
}

impl Snapshot {
    /// Select snapshots by name.
    pub fn by_name(name: impl Into<String>) -> Selector<Self> {
        let name = name.into();
        Selector::new(move |s: &Self| s.properties.name.as_deref() == Some(name.as_str()))
    }

    /// Select snapshots by description.
    pub fn by_description(description: impl Into<String>) -> Selector<Self> {
        let description = description.into();
        Selector::new(move |s: &Self| {
            s.properties.description.as_deref() == Some(description.as_str())
        })
    }

    /// Select snapshots by location.
    pub fn by_location(location: impl Into<String>) -> Selector<Self> {
        let location = location.into();
        Selector::new(move |s: &Self| {
            s.properties.location.as_deref() == Some(location.as_str())
        })
    }

    /// Select snapshots of at least `min_gb` GB.
    pub fn by_min_size(min_gb: f64) -> Selector<Self> {
        Selector::new(move |s: &Self| s.properties.size.is_some_and(|size| size >= min_gb))
    }
}

const SNAPSHOTS_PATH: &str = "snapshots";

/// Path of a single snapshot.
pub fn snapshot_path(snapshot_id: &str) -> String {
    format!("{SNAPSHOTS_PATH}/{}", urlencoding::encode(snapshot_id))
}

#[async_trait]
impl Get for Snapshot {
    type Id = String;

    #[tracing::instrument(skip(client))]
    async fn get(client: &ProfitBricksClient, id: String) -> Result<Self> {
        let response = client.get(&snapshot_path(&id), StatusCode::OK).await?;
        let snapshot: Snapshot = response.json().await.map_err(ProfitBricksError::HttpError)?;
        Ok(snapshot)
    }
}

#[async_trait]
impl List for Snapshot {
    type Query = ();

    #[tracing::instrument(skip(client))]
    async fn list(client: &ProfitBricksClient, _query: &()) -> Result<Collection<Self>> {
        let response = client.get(SNAPSHOTS_PATH, StatusCode::OK).await?;
        let data: Collection<Snapshot> =
            response.json().await.map_err(ProfitBricksError::HttpError)?;
        Ok(data)
    }
}

#[async_trait]
impl Update for Snapshot {
    type Id = String;
    type Params = SnapshotProperties;

    #[tracing::instrument(skip(client))]
    async fn update(
        client: &ProfitBricksClient,
        id: String,
        params: Self::Params,
    ) -> Result<Accepted<Self>> {
        let path = snapshot_path(&id);
        let response = client.patch(&path, &params, StatusCode::ACCEPTED).await?;
        Accepted::from_response(&path, response).await
    }
}

#[async_trait]
impl Delete for Snapshot {
    type Id = String;

    #[tracing::instrument(skip(client))]
    async fn delete(client: &ProfitBricksClient, id: String) -> Result<Accepted<()>> {
        let path = snapshot_path(&id);
        let response = client.delete(&path, StatusCode::ACCEPTED).await?;
        Ok(Accepted::from_empty_response(&path, &response))
    }
}

/// Check for a queued or running deletion of the snapshot.
pub async fn has_delete_snapshot_in_progress(
    client: &ProfitBricksClient,
    snapshot_id: &str,
) -> Result<bool> {
    has_pending_operation(client, &snapshot_path(snapshot_id), Method::DELETE).await
}

/// Check whether a volume of the datacenter uses the snapshot as its image,
/// including volumes whose creation is still queued or running.
///
/// If the volume listing itself fails, the snapshot is reported as not in
/// use (`Ok(false)`) and the error is only logged. Use
/// [`is_snapshot_in_use_strict`] to get the error instead.
///
/// Request bodies that cannot be decoded as a volume are treated as not
/// referencing the snapshot.
///
/// # Errors
///
/// Returns an error if listing the requests log fails.
#[tracing::instrument(skip(client))]
pub async fn is_snapshot_in_use(
    client: &ProfitBricksClient,
    datacenter_id: &str,
    snapshot_id: &str,
) -> Result<bool> {
    let volumes = match Volume::list(client, &datacenter_id.to_string()).await {
        Ok(volumes) => volumes,
        Err(err) => {
            tracing::warn!(error = %err, "listing volumes failed, assuming snapshot is unused");
            return Ok(false);
        }
    };
    if volumes_reference(&volumes, snapshot_id) {
        return Ok(true);
    }

    has_volume_creation_from(client, datacenter_id, snapshot_id).await
}

/// Like [`is_snapshot_in_use`], but a failed volume listing is an error.
///
/// # Errors
///
/// Returns an error if listing the volumes or the requests log fails.
#[tracing::instrument(skip(client))]
pub async fn is_snapshot_in_use_strict(
    client: &ProfitBricksClient,
    datacenter_id: &str,
    snapshot_id: &str,
) -> Result<bool> {
    let volumes = Volume::list(client, &datacenter_id.to_string()).await?;
    if volumes_reference(&volumes, snapshot_id) {
        return Ok(true);
    }

    has_volume_creation_from(client, datacenter_id, snapshot_id).await
}

fn volumes_reference(volumes: &Collection<Volume>, snapshot_id: &str) -> bool {
    volumes
        .iter()
        .any(|volume| volume.properties.image.as_deref() == Some(snapshot_id))
}

/// Look for queued or running volume creations using the snapshot.
async fn has_volume_creation_from(
    client: &ProfitBricksClient,
    datacenter_id: &str,
    snapshot_id: &str,
) -> Result<bool> {
    let filter = RequestListFilter::new()
        .with_url(volumes_path(datacenter_id))
        .with_method(Method::POST);
    let requests = pending_requests(client, &filter).await?;

    Ok(requests
        .iter()
        .any(|request| body_references_image(request.properties.body.as_deref(), snapshot_id)))
}

/// Whether a create-volume request body names `image_id` as its image.
///
/// Only `properties.image` is read, so other fields of unexpected type do
/// not hide it. Missing bodies and bodies that are not JSON do not
/// reference anything.
pub(crate) fn body_references_image(body: Option<&str>, image_id: &str) -> bool {
    let Some(body) = body else {
        return false;
    };
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(value) => {
            value
                .pointer("/properties/image")
                .and_then(serde_json::Value::as_str)
                == Some(image_id)
        }
        Err(err) => {
            tracing::debug!(error = %err, "ignoring undecodable request body");
            false
        }
    }
}
