//! Snapshot endpoint handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use super::{accepted, collection, not_found, SharedState};
use crate::mock_server::state::Completion;
use crate::SnapshotProperties;

/// GET /snapshots
pub async fn list_snapshots(State(state): State<SharedState>) -> Response {
    let state = state.read().await;
    collection("/snapshots", state.snapshots.values().collect())
}

/// GET /snapshots/{id}
pub async fn get_snapshot(State(state): State<SharedState>, Path(id): Path<String>) -> Response {
    let state = state.read().await;
    match state.snapshots.get(&id) {
        Some(snapshot) => (StatusCode::OK, Json(snapshot.clone())).into_response(),
        None => not_found("snapshot", &id),
    }
}

/// PATCH /snapshots/{id}
pub async fn update_snapshot(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Json(body): Json<SnapshotProperties>,
) -> Response {
    let mut state = state.write().await;
    let Some(snapshot) = state.snapshots.get_mut(&id) else {
        return not_found("snapshot", &id);
    };
    if body.name.is_some() {
        snapshot.properties.name = body.name;
    }
    if body.description.is_some() {
        snapshot.properties.description = body.description;
    }
    if body.licence_type.is_some() {
        snapshot.properties.licence_type = body.licence_type;
    }
    let updated = snapshot.clone();
    let request_id = state.record_request("PATCH", &format!("/snapshots/{id}"), None, None);
    accepted(&request_id, Some(updated))
}

/// DELETE /snapshots/{id}
///
/// The snapshot stays listed until the delete request is DONE.
pub async fn delete_snapshot(State(state): State<SharedState>, Path(id): Path<String>) -> Response {
    let mut state = state.write().await;
    if !state.snapshots.contains_key(&id) {
        return not_found("snapshot", &id);
    }
    let request_id = state.record_request(
        "DELETE",
        &format!("/snapshots/{id}"),
        None,
        Some(Completion::RemoveSnapshot(id.clone())),
    );
    accepted::<()>(&request_id, None)
}
