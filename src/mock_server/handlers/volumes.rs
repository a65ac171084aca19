//! Volume endpoint handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use super::{accepted, collection, error, not_found, PropertiesBody, SharedState};
use crate::mock_server::state::Completion;
use crate::{resource_type, Metadata, Resource, Volume, VolumeProperties};

/// GET /datacenters/{dc}/volumes
pub async fn list_volumes(State(state): State<SharedState>, Path(dc): Path<String>) -> Response {
    let state = state.read().await;
    if !state.datacenters.contains_key(&dc) {
        return not_found("datacenter", &dc);
    }
    collection(
        &format!("/datacenters/{dc}/volumes"),
        state.list_volumes(&dc),
    )
}

/// GET /datacenters/{dc}/volumes/{id}
pub async fn get_volume(
    State(state): State<SharedState>,
    Path((dc, id)): Path<(String, String)>,
) -> Response {
    let state = state.read().await;
    match state.get_volume(&dc, &id) {
        Some(volume) => (StatusCode::OK, Json(volume.clone())).into_response(),
        None => not_found("volume", &id),
    }
}

/// POST /datacenters/{dc}/volumes
///
/// The raw body is kept as the request body so that the requests log can
/// be searched for pending creations from an image.
pub async fn create_volume(
    State(state): State<SharedState>,
    Path(dc): Path<String>,
    body: String,
) -> Response {
    let parsed: PropertiesBody<VolumeProperties> = match serde_json::from_str(&body) {
        Ok(parsed) => parsed,
        Err(e) => return error(StatusCode::UNPROCESSABLE_ENTITY, &e.to_string()),
    };

    let mut state = state.write().await;
    if !state.datacenters.contains_key(&dc) {
        return not_found("datacenter", &dc);
    }

    let id = state.next_id("vol");
    let mut volume: Volume = Resource {
        id: id.clone(),
        resource_type: resource_type::VOLUME.to_string(),
        href: format!("/datacenters/{dc}/volumes/{id}"),
        metadata: Metadata {
            state: Some("BUSY".to_string()),
            ..Default::default()
        },
        properties: parsed.properties,
        entities: None,
    };
    let response_body = volume.clone();
    volume.metadata.state = Some("AVAILABLE".to_string());

    let path = format!("/datacenters/{dc}/volumes");
    let request_id = state.record_request(
        "POST",
        &path,
        Some(body),
        Some(Completion::AddVolume {
            datacenter_id: dc,
            volume,
        }),
    );
    accepted(&request_id, Some(response_body))
}
