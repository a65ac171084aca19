//! Create trait for provisioning new entities.

use async_trait::async_trait;

use crate::client::ProfitBricksClient;
use crate::error::Result;
use crate::models::Accepted;

/// Provision a new entity.
///
/// Creation is asynchronous: the API answers `202 Accepted` with the
/// entity as it will be and a `location` header pointing at the request
/// status. Use [`Accepted::wait`] to block until provisioning finishes.
#[async_trait]
pub trait Create: Sized {
    /// Identifies where the entity is created (`()` for top-level entities,
    /// the datacenter ID for nested ones).
    type Parent: Send;

    /// Properties of the new entity.
    type Params: Send + Sync;

    /// Submit the creation request.
    ///
    /// # Errors
    ///
    /// Returns an error if the request is rejected or fails.
    async fn create(
        client: &ProfitBricksClient,
        parent: Self::Parent,
        params: Self::Params,
    ) -> Result<Accepted<Self>>;
}
