//! Delete trait for removing entities.

use std::time::Duration;

use async_trait::async_trait;

use crate::client::ProfitBricksClient;
use crate::error::Result;
use crate::models::{Accepted, RequestStatus};

/// Delete an entity.
#[async_trait]
pub trait Delete {
    /// The ID type for this entity.
    type Id: Send;

    /// Submit the deletion. The returned handle carries the status URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found or the request fails.
    async fn delete(client: &ProfitBricksClient, id: Self::Id) -> Result<Accepted<()>>;

    /// Delete the entity and wait for the request to complete.
    ///
    /// A zero `timeout` waits for the default ten minutes.
    ///
    /// # Errors
    ///
    /// Returns the deletion error, or any error of the wait
    /// (provider failure, timeout).
    async fn delete_and_wait(
        client: &ProfitBricksClient,
        id: Self::Id,
        timeout: Duration,
    ) -> Result<RequestStatus> {
        let accepted = Self::delete(client, id).await?;
        accepted.wait(client, timeout).await
    }
}
