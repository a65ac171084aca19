//! Volume model and trait implementations.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::client::ProfitBricksClient;
use crate::error::{ProfitBricksError, Result};
use crate::models::{datacenter_path, Accepted, Collection, CreateBody, Resource};
use crate::selector::Selector;
use crate::traits::{Create, Get, List};

/// A block storage volume inside a datacenter.
pub type Volume = Resource<VolumeProperties>;

/// Properties of a volume.
///
/// Also used as create parameters; unset fields are omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// `HDD` or `SSD`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub volume_type: Option<String>,

    /// Size in GB.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,

    /// ID of the image or snapshot the volume was created from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_alias: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_password: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bus: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub licence_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability_zone: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_number: Option<u32>,
}

impl Volume {
    /// Select volumes by name.
    pub fn by_name(name: impl Into<String>) -> Selector<Self> {
        let name = name.into();
        Selector::new(move |v: &Self| v.properties.name.as_deref() == Some(name.as_str()))
    }

    /// Select volumes created from the given image or snapshot.
    pub fn by_image(image: impl Into<String>) -> Selector<Self> {
        let image = image.into();
        Selector::new(move |v: &Self| v.properties.image.as_deref() == Some(image.as_str()))
    }
}

/// Path of the volumes collection of a datacenter.
pub fn volumes_path(datacenter_id: &str) -> String {
    format!("{}/volumes", datacenter_path(datacenter_id))
}

/// Path of a single volume.
pub fn volume_path(datacenter_id: &str, volume_id: &str) -> String {
    format!(
        "{}/{}",
        volumes_path(datacenter_id),
        urlencoding::encode(volume_id)
    )
}

#[async_trait]
impl Get for Volume {
    /// `(datacenter_id, volume_id)`
    type Id = (String, String);

    #[tracing::instrument(skip(client))]
    async fn get(client: &ProfitBricksClient, id: Self::Id) -> Result<Self> {
        let (datacenter_id, volume_id) = id;
        let path = volume_path(&datacenter_id, &volume_id);

        let response = client.get(&path, StatusCode::OK).await?;
        let volume: Volume = response.json().await.map_err(ProfitBricksError::HttpError)?;
        Ok(volume)
    }
}

#[async_trait]
impl List for Volume {
    /// Datacenter ID.
    type Query = String;

    #[tracing::instrument(skip(client))]
    async fn list(
        client: &ProfitBricksClient,
        datacenter_id: &String,
    ) -> Result<Collection<Self>> {
        let response = client
            .get(&volumes_path(datacenter_id), StatusCode::OK)
            .await?;
        let data: Collection<Volume> =
            response.json().await.map_err(ProfitBricksError::HttpError)?;
        Ok(data)
    }
}

#[async_trait]
impl Create for Volume {
    /// Datacenter ID.
    type Parent = String;
    type Params = VolumeProperties;

    #[tracing::instrument(skip(client, params))]
    async fn create(
        client: &ProfitBricksClient,
        datacenter_id: String,
        params: Self::Params,
    ) -> Result<Accepted<Self>> {
        let path = volumes_path(&datacenter_id);
        let body = CreateBody {
            properties: &params,
        };
        let response = client.post(&path, &body, StatusCode::ACCEPTED).await?;
        Accepted::from_response(&path, response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_volume_type_field_renamed() {
        let volume: Volume = serde_json::from_value(serde_json::json!({
            "id": "v1",
            "type": "volume",
            "properties": { "name": "data", "type": "SSD", "size": 10.0, "image": "snap-1" }
        }))
        .unwrap();

        assert!(volume.has_type("volume"));
        assert_eq!(volume.properties.volume_type.as_deref(), Some("SSD"));
        assert!(Volume::by_image("snap-1").matches(&volume));
        assert!(!Volume::by_image("snap-2").matches(&volume));
    }

    #[test]
    fn test_volume_paths() {
        assert_eq!(volumes_path("dc"), "datacenters/dc/volumes");
        assert_eq!(volume_path("dc", "v1"), "datacenters/dc/volumes/v1");
    }
}
