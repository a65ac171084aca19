//! ProfitBricks Cloud API client library.
//!
//! A Rust library for the ProfitBricks Infrastructure-as-a-Service API
//! using a trait-based architecture where each operation (Get, List,
//! Create, Update, Delete) is defined as a trait that entity types
//! implement.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::time::Duration;
//! use profitbricks::{Datacenter, Delete, Get, List, ProfitBricksClient, Snapshot};
//!
//! #[tokio::main]
//! async fn main() -> profitbricks::Result<()> {
//!     // Create client from environment variables
//!     let client = ProfitBricksClient::from_env()?;
//!
//!     // List datacenters
//!     let datacenters = Datacenter::list(&client, &()).await?;
//!     println!("Found {} datacenters", datacenters.len());
//!
//!     // Only the available snapshots named "nightly"
//!     let nightly = Snapshot::list_with_selector(
//!         &client,
//!         &(),
//!         &[Snapshot::by_name("nightly"), Snapshot::by_state("AVAILABLE")],
//!     )
//!     .await?;
//!
//!     // Delete them, waiting up to two minutes each
//!     for snapshot in nightly {
//!         Snapshot::delete_and_wait(&client, snapshot.id, Duration::from_secs(120)).await?;
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`Get`], [`List`], [`Create`], [`Update`], [`Delete`] - per-entity
//!   operations. Mutating ones return an [`Accepted`] handle carrying the
//!   request status URL.
//! - [`Waiter`] - polls a request status until it is DONE or FAILED, with
//!   a deadline and a [`CancellationToken`].
//! - [`Selector`] - composable client-side predicates for list results.
//! - [`RequestListFilter`], [`has_pending_operation`] - ask the requests
//!   log which operations are still queued or running.
//!
//! # Configuration
//!
//! The client reads configuration from environment variables:
//!
//! - `PROFITBRICKS_USERNAME` (required)
//! - `PROFITBRICKS_PASSWORD` (required)
//! - `PROFITBRICKS_API_URL` (optional) - defaults to
//!   `https://api.profitbricks.com/cloudapi/v4`

pub mod cli;
mod client;
mod error;
mod models;
pub mod output;
mod pending;
mod selector;
mod traits;
mod wait;

#[cfg(feature = "test-server")]
pub mod mock_server;

// Re-export core types
pub use client::{ProfitBricksClient, DEFAULT_DEPTH};
pub use error::{ProfitBricksError, Result};
pub use reqwest::Method;
pub use tokio_util::sync::CancellationToken;

// Re-export traits
pub use traits::{Create, Delete, Get, List, Update};

// Re-export models
pub use models::{
    // Envelope types
    resource_type,
    Accepted,
    Collection,
    Metadata,
    Resource,
    ResourceReference,
    // Datacenter types
    Datacenter,
    DatacenterProperties,
    // Server types
    Server,
    ServerProperties,
    // Volume types
    Volume,
    VolumeProperties,
    // Snapshot types
    Snapshot,
    SnapshotProperties,
    // Request types
    Request,
    RequestListFilter,
    RequestMetadata,
    RequestProperties,
    RequestState,
    RequestStatus,
    RequestStatusMetadata,
    RequestTarget,
};

// Re-export path builders
pub use models::{
    datacenter_path, request_path, request_status_path, server_path, servers_path, snapshot_path,
    volume_path, volumes_path,
};

// Re-export in-flight checks
pub use models::{has_delete_snapshot_in_progress, is_snapshot_in_use, is_snapshot_in_use_strict};
pub use pending::{has_pending_operation, pending_requests};

// Re-export selectors and waiting
pub use output::PrettyPrint;
pub use selector::{filter, filter_owned, Selector};
pub use wait::{
    duration_or_default, RequestStatusSource, WaitConfig, Waiter, DEFAULT_POLL_INTERVAL,
    DEFAULT_WAIT_TIMEOUT,
};
