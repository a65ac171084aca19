//! HTTP request handlers for the mock server.

pub mod datacenters;
pub mod requests;
pub mod snapshots;
pub mod volumes;

pub use datacenters::*;
pub use requests::*;
pub use snapshots::*;
pub use volumes::*;

use std::sync::Arc;

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::mock_server::state::MockState;
use crate::{resource_type, Collection};

pub(crate) type SharedState = Arc<RwLock<MockState>>;

/// Body of create and update calls: `{"properties": {...}}`.
#[derive(Debug, Deserialize)]
pub struct PropertiesBody<P> {
    pub properties: P,
}

/// Error body in the shape the API uses.
pub(crate) fn error(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(serde_json::json!({
            "httpStatus": status.as_u16(),
            "messages": [{ "errorCode": "309", "message": message }]
        })),
    )
        .into_response()
}

pub(crate) fn not_found(what: &str, id: &str) -> Response {
    error(
        StatusCode::NOT_FOUND,
        &format!("Resource does not exist: {what} {id}"),
    )
}

/// 202 with the body and a `location` header pointing at the request status.
pub(crate) fn accepted<T: Serialize>(request_id: &str, body: Option<T>) -> Response {
    let location = [(header::LOCATION, format!("/requests/{request_id}/status"))];
    match body {
        Some(body) => (StatusCode::ACCEPTED, location, Json(body)).into_response(),
        None => (StatusCode::ACCEPTED, location).into_response(),
    }
}

pub(crate) fn collection<T: Clone + Serialize>(href: &str, items: Vec<&T>) -> Response {
    let collection = Collection {
        id: href.trim_start_matches('/').replace('/', "-"),
        resource_type: resource_type::COLLECTION.to_string(),
        href: href.to_string(),
        items: items.into_iter().cloned().collect(),
    };
    (StatusCode::OK, Json(collection)).into_response()
}
