//! Server model and trait implementations.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::client::ProfitBricksClient;
use crate::error::{ProfitBricksError, Result};
use crate::models::{datacenter_path, Collection, Resource, ResourceReference};
use crate::selector::Selector;
use crate::traits::{Get, List};

/// A virtual server inside a datacenter.
pub type Server = Resource<ServerProperties>;

/// Properties of a server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cores: Option<u32>,

    /// Memory in MiB.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ram: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability_zone: Option<String>,

    /// Power state, e.g. `RUNNING` or `SHUTOFF`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vm_state: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boot_volume: Option<ResourceReference>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boot_cdrom: Option<ResourceReference>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu_family: Option<String>,
}

impl Server {
    /// Select servers by name.
    pub fn by_name(name: impl Into<String>) -> Selector<Self> {
        let name = name.into();
        Selector::new(move |s: &Self| s.properties.name.as_deref() == Some(name.as_str()))
    }

    /// Select servers by power state.
    pub fn by_vm_state(vm_state: impl Into<String>) -> Selector<Self> {
        let vm_state = vm_state.into();
        Selector::new(move |s: &Self| {
            s.properties.vm_state.as_deref() == Some(vm_state.as_str())
        })
    }
}

/// Path of the servers collection of a datacenter.
pub fn servers_path(datacenter_id: &str) -> String {
    format!("{}/servers", datacenter_path(datacenter_id))
}

/// Path of a single server.
pub fn server_path(datacenter_id: &str, server_id: &str) -> String {
    format!(
        "{}/{}",
        servers_path(datacenter_id),
        urlencoding::encode(server_id)
    )
}

#[async_trait]
impl Get for Server {
    /// `(datacenter_id, server_id)`
    type Id = (String, String);

    #[tracing::instrument(skip(client))]
    async fn get(client: &ProfitBricksClient, id: Self::Id) -> Result<Self> {
        let (datacenter_id, server_id) = id;
        let path = server_path(&datacenter_id, &server_id);

        let response = client.get(&path, StatusCode::OK).await?;
        let server: Server = response.json().await.map_err(ProfitBricksError::HttpError)?;
        Ok(server)
    }
}

#[async_trait]
impl List for Server {
    /// Datacenter ID.
    type Query = String;

    #[tracing::instrument(skip(client))]
    async fn list(
        client: &ProfitBricksClient,
        datacenter_id: &String,
    ) -> Result<Collection<Self>> {
        let response = client
            .get(&servers_path(datacenter_id), StatusCode::OK)
            .await?;
        let data: Collection<Server> =
            response.json().await.map_err(ProfitBricksError::HttpError)?;
        Ok(data)
    }
}
