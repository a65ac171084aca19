//! Detection of operations still in flight against a resource.
//!
//! The API keeps a log of every mutating request. Listing it filtered by
//! URL, method and status tells whether a conflicting operation is queued
//! or running, which lets callers wait before issuing their own.

use reqwest::Method;

use crate::client::ProfitBricksClient;
use crate::error::Result;
use crate::models::{Request, RequestListFilter, RequestState};
use crate::traits::List;

/// The states a request goes through before it is terminal, in order.
const PENDING_STATES: [RequestState; 2] = [RequestState::Queued, RequestState::Running];

/// Check whether a `method` request against `resource_path` is queued or
/// running.
///
/// Lists the requests log once per pending state, from one base filter
/// specialized per status, and stops at the first non-empty answer. A
/// failed listing is returned as an error, never as "nothing pending".
///
/// # Example
///
/// ```ignore
/// use profitbricks::{has_pending_operation, Method};
///
/// if has_pending_operation(&client, "snapshots/9", Method::DELETE).await? {
///     println!("snapshot is already being deleted");
/// }
/// ```
#[tracing::instrument(skip(client))]
pub async fn has_pending_operation(
    client: &ProfitBricksClient,
    resource_path: &str,
    method: Method,
) -> Result<bool> {
    let base = RequestListFilter::new()
        .with_url(resource_path)
        .with_method(method);

    for state in PENDING_STATES {
        let requests = Request::list(client, &base.clone().with_status(state)).await?;
        if !requests.is_empty() {
            tracing::debug!(%state, count = requests.len(), "found pending request");
            return Ok(true);
        }
    }

    Ok(false)
}

/// Collect the queued and running requests matching `filter`.
///
/// Any status already set on `filter` is overridden. Queued requests come
/// first, in the order the API returned them.
#[tracing::instrument(skip(client))]
pub async fn pending_requests(
    client: &ProfitBricksClient,
    filter: &RequestListFilter,
) -> Result<Vec<Request>> {
    let mut requests = Vec::new();
    for state in PENDING_STATES {
        let found = Request::list(client, &filter.clone().with_status(state)).await?;
        requests.extend(found.items);
    }
    Ok(requests)
}
