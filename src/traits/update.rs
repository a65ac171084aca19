//! Update trait for modifying entities.

use async_trait::async_trait;

use crate::client::ProfitBricksClient;
use crate::error::Result;
use crate::models::Accepted;

/// Partially update an existing entity (HTTP `PATCH`).
///
/// # Example
///
/// ```ignore
/// use profitbricks::{ProfitBricksClient, Snapshot, SnapshotProperties, Update};
///
/// let client = ProfitBricksClient::from_env()?;
/// let accepted = Snapshot::update(
///     &client,
///     "snapshot-id".to_string(),
///     SnapshotProperties {
///         name: Some("renamed".to_string()),
///         ..Default::default()
///     },
/// ).await?;
/// accepted.wait(&client, Default::default()).await?;
/// ```
#[async_trait]
pub trait Update: Sized {
    /// The ID type for this entity.
    type Id: Send;

    /// Properties to change; unset fields are left alone.
    type Params: Send + Sync;

    /// Submit the update and return the entity as the API accepted it.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found or the request fails.
    async fn update(
        client: &ProfitBricksClient,
        id: Self::Id,
        params: Self::Params,
    ) -> Result<Accepted<Self>>;
}
