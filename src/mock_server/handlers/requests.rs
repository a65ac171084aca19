//! Requests log endpoint handlers.

use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use super::{collection, error, not_found, SharedState};
use crate::mock_server::state::RequestQuery;
use crate::{Request, RequestState};

fn parse_query(params: &HashMap<String, String>) -> Result<RequestQuery, String> {
    let status = match params.get("filter.status") {
        Some(raw) => Some(
            serde_json::from_value::<RequestState>(serde_json::Value::String(raw.clone()))
                .map_err(|_| format!("invalid filter.status '{raw}'"))?,
        ),
        None => None,
    };
    Ok(RequestQuery {
        url: params.get("filter.url").cloned(),
        method: params.get("filter.method").cloned(),
        status,
        body: params.get("filter.body").cloned(),
    })
}

/// GET /requests
///
/// Supports `filter.url`, `filter.method`, `filter.status` and `filter.body`.
pub async fn list_requests(
    State(state): State<SharedState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let query = match parse_query(&params) {
        Ok(query) => query,
        Err(message) => return error(StatusCode::BAD_REQUEST, &message),
    };

    let state = state.read().await;
    let requests: Vec<Request> = state
        .list_requests(&query)
        .into_iter()
        .map(|r| r.to_request())
        .collect();
    collection("/requests", requests.iter().collect())
}

/// GET /requests/{id}
pub async fn get_request(State(state): State<SharedState>, Path(id): Path<String>) -> Response {
    let state = state.read().await;
    match state.get_request(&id) {
        Some(request) => (StatusCode::OK, Json(request.to_request())).into_response(),
        None => not_found("request", &id),
    }
}

/// GET /requests/{id}/status
///
/// Each poll moves the request one step towards its terminal state.
pub async fn get_request_status(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Response {
    let mut state = state.write().await;
    match state.poll_request(&id) {
        Some(status) => (StatusCode::OK, Json(status)).into_response(),
        None => not_found("request", &id),
    }
}
