//! Datacenter model and trait implementations.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::client::ProfitBricksClient;
use crate::error::{ProfitBricksError, Result};
use crate::models::{Accepted, Collection, CreateBody, Resource};
use crate::selector::Selector;
use crate::traits::{Create, Delete, Get, List, Update};

/// A virtual datacenter: the container for servers, volumes and networks.
pub type Datacenter = Resource<DatacenterProperties>;

/// Properties of a datacenter.
///
/// Also used as create and patch parameters; unset fields are omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatacenterProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Physical location, e.g. `us/las`. Fixed at creation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    /// Incremented by the API on every change.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sec_auth_protection: Option<bool>,
}

impl Datacenter {
    /// Select datacenters by name.
    pub fn by_name(name: impl Into<String>) -> Selector<Self> {
        let name = name.into();
        Selector::new(move |dc: &Self| dc.properties.name.as_deref() == Some(name.as_str()))
    }

    /// Select datacenters by location.
    pub fn by_location(location: impl Into<String>) -> Selector<Self> {
        let location = location.into();
        Selector::new(move |dc: &Self| {
            dc.properties.location.as_deref() == Some(location.as_str())
        })
    }
}

const DATACENTERS_PATH: &str = "datacenters";

/// Path of a single datacenter.
pub fn datacenter_path(datacenter_id: &str) -> String {
    format!("{DATACENTERS_PATH}/{}", urlencoding::encode(datacenter_id))
}

#[async_trait]
impl Get for Datacenter {
    type Id = String;

    #[tracing::instrument(skip(client))]
    async fn get(client: &ProfitBricksClient, id: String) -> Result<Self> {
        let response = client.get(&datacenter_path(&id), StatusCode::OK).await?;
        let datacenter: Datacenter =
            response.json().await.map_err(ProfitBricksError::HttpError)?;
        Ok(datacenter)
    }
}

#[async_trait]
impl List for Datacenter {
    type Query = ();

    #[tracing::instrument(skip(client))]
    async fn list(client: &ProfitBricksClient, _query: &()) -> Result<Collection<Self>> {
        let response = client.get(DATACENTERS_PATH, StatusCode::OK).await?;
        let data: Collection<Datacenter> =
            response.json().await.map_err(ProfitBricksError::HttpError)?;
        Ok(data)
    }
}

#[async_trait]
impl Create for Datacenter {
    type Parent = ();
    type Params = DatacenterProperties;

    #[tracing::instrument(skip(client))]
    async fn create(
        client: &ProfitBricksClient,
        _parent: (),
        params: Self::Params,
    ) -> Result<Accepted<Self>> {
        let body = CreateBody {
            properties: &params,
        };
        let response = client
            .post(DATACENTERS_PATH, &body, StatusCode::ACCEPTED)
            .await?;
        Accepted::from_response(DATACENTERS_PATH, response).await
    }
}

#[async_trait]
impl Update for Datacenter {
    type Id = String;
    type Params = DatacenterProperties;

    #[tracing::instrument(skip(client))]
    async fn update(
        client: &ProfitBricksClient,
        id: String,
        params: Self::Params,
    ) -> Result<Accepted<Self>> {
        let path = datacenter_path(&id);
        let response = client.patch(&path, &params, StatusCode::ACCEPTED).await?;
        Accepted::from_response(&path, response).await
    }
}

#[async_trait]
impl Delete for Datacenter {
    type Id = String;

    #[tracing::instrument(skip(client))]
    async fn delete(client: &ProfitBricksClient, id: String) -> Result<Accepted<()>> {
        let path = datacenter_path(&id);
        let response = client.delete(&path, StatusCode::ACCEPTED).await?;
        Ok(Accepted::from_empty_response(&path, &response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_body_omits_unset_fields() {
        let params = DatacenterProperties {
            name: Some("datacenter-name".to_string()),
            location: Some("us/lasdev".to_string()),
            ..Default::default()
        };
        let body = serde_json::to_value(CreateBody {
            properties: &params,
        })
        .unwrap();

        assert_eq!(
            body,
            serde_json::json!({
                "properties": { "name": "datacenter-name", "location": "us/lasdev" }
            })
        );
    }

    #[test]
    fn test_datacenter_selectors() {
        let dc: Datacenter = serde_json::from_value(serde_json::json!({
            "id": "1",
            "type": "datacenter",
            "properties": { "name": "GOSDK", "location": "us/lasdev", "version": 3 }
        }))
        .unwrap();

        assert!(Datacenter::by_name("GOSDK").matches(&dc));
        assert!(Datacenter::by_location("us/lasdev").matches(&dc));
        assert!(!Datacenter::by_location("de/fra").matches(&dc));
        assert_eq!(dc.properties.version, Some(3));
    }

    #[test]
    fn test_datacenter_path_encodes_id() {
        assert_eq!(datacenter_path("a b"), "datacenters/a%20b");
    }
}
