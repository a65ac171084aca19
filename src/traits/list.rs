//! List trait for fetching collections of entities.

use async_trait::async_trait;

use crate::client::ProfitBricksClient;
use crate::error::Result;
use crate::models::Collection;
use crate::selector::{filter_owned, Selector};

/// List entities, with client-side selector filtering.
///
/// The Cloud API returns whole collections; narrowing happens on the
/// client through [`Selector`]s.
///
/// # Example
///
/// ```ignore
/// use profitbricks::{ProfitBricksClient, Snapshot, List};
///
/// let client = ProfitBricksClient::from_env()?;
///
/// // Fetch the whole collection
/// let snapshots = Snapshot::list(&client, &()).await?;
///
/// // Only the available snapshots called "nightly"
/// let nightly = Snapshot::list_with_selector(
///     &client,
///     &(),
///     &[Snapshot::by_name("nightly"), Snapshot::by_state("AVAILABLE")],
/// ).await?;
/// ```
#[async_trait]
pub trait List: Sized + Send {
    /// Query parameters (parent IDs or server-side filters).
    type Query: Default + Send + Sync;

    /// List entities matching the query.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    async fn list(client: &ProfitBricksClient, query: &Self::Query) -> Result<Collection<Self>>;

    /// List entities and keep those matching every selector (logical AND).
    ///
    /// Order of the collection is preserved. An empty selector list
    /// returns every item.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    async fn list_with_selector(
        client: &ProfitBricksClient,
        query: &Self::Query,
        selectors: &[Selector<Self>],
    ) -> Result<Vec<Self>> {
        let collection = Self::list(client, query).await?;
        let total = collection.items.len();
        let items = filter_owned(collection.items, selectors);
        tracing::debug!(total, selected = items.len(), "applied selectors");
        Ok(items)
    }
}
