//! Datacenter endpoint handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use super::{accepted, collection, not_found, PropertiesBody, SharedState};
use crate::mock_server::state::Completion;
use crate::{resource_type, Datacenter, DatacenterProperties, Metadata, Resource};

/// GET /datacenters
pub async fn list_datacenters(State(state): State<SharedState>) -> Response {
    let state = state.read().await;
    collection("/datacenters", state.datacenters.values().collect())
}

/// GET /datacenters/{id}
pub async fn get_datacenter(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Response {
    let state = state.read().await;
    match state.datacenters.get(&id) {
        Some(datacenter) => (StatusCode::OK, Json(datacenter.clone())).into_response(),
        None => not_found("datacenter", &id),
    }
}

/// POST /datacenters
pub async fn create_datacenter(
    State(state): State<SharedState>,
    Json(body): Json<PropertiesBody<DatacenterProperties>>,
) -> Response {
    let mut state = state.write().await;
    let id = state.next_id("dc");
    let datacenter: Datacenter = Resource {
        id: id.clone(),
        resource_type: resource_type::DATACENTER.to_string(),
        href: format!("/datacenters/{id}"),
        metadata: Metadata {
            state: Some("AVAILABLE".to_string()),
            ..Default::default()
        },
        properties: DatacenterProperties {
            version: Some(1),
            ..body.properties
        },
        entities: None,
    };
    state.datacenters.insert(id.clone(), datacenter.clone());
    let request_id = state.record_request("POST", "/datacenters", None, None);
    accepted(&request_id, Some(datacenter))
}

/// PATCH /datacenters/{id}
pub async fn update_datacenter(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Json(body): Json<DatacenterProperties>,
) -> Response {
    let mut state = state.write().await;
    let Some(datacenter) = state.datacenters.get_mut(&id) else {
        return not_found("datacenter", &id);
    };
    if body.name.is_some() {
        datacenter.properties.name = body.name;
    }
    if body.description.is_some() {
        datacenter.properties.description = body.description;
    }
    datacenter.properties.version = datacenter.properties.version.map(|v| v + 1);
    let updated = datacenter.clone();
    let request_id = state.record_request("PATCH", &format!("/datacenters/{id}"), None, None);
    accepted(&request_id, Some(updated))
}

/// DELETE /datacenters/{id}
pub async fn delete_datacenter(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Response {
    let mut state = state.write().await;
    if !state.datacenters.contains_key(&id) {
        return not_found("datacenter", &id);
    }
    let request_id = state.record_request(
        "DELETE",
        &format!("/datacenters/{id}"),
        None,
        Some(Completion::RemoveDatacenter(id.clone())),
    );
    accepted::<()>(&request_id, None)
}
