//! Get trait for fetching single entities.

use async_trait::async_trait;

use crate::client::ProfitBricksClient;
use crate::error::Result;

/// Fetch a single entity by ID.
///
/// Nested resources use a tuple ID carrying the parent identifiers,
/// e.g. `(datacenter_id, server_id)`.
///
/// # Example
///
/// ```ignore
/// use profitbricks::{ProfitBricksClient, Server, Get};
///
/// let client = ProfitBricksClient::from_env()?;
/// let server = Server::get(&client, ("dc-1".to_string(), "srv-2".to_string())).await?;
/// ```
#[async_trait]
pub trait Get: Sized {
    /// The ID type for this entity.
    type Id: Send;

    /// Fetch the entity by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found or the request fails.
    async fn get(client: &ProfitBricksClient, id: Self::Id) -> Result<Self>;
}
