//! Mock Cloud API server for E2E testing.
//!
//! This module provides an in-memory mock server that simulates the Cloud
//! API for integration and end-to-end testing. Unlike wiremock which mocks
//! at the HTTP level per-test, this server maintains state across requests:
//! mutating calls are recorded in a requests log, and every poll of a
//! request status moves it from QUEUED to RUNNING to DONE.
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use profitbricks::mock_server::MockServer;
//! use profitbricks::{Delete, ProfitBricksClient, Snapshot};
//!
//! #[tokio::test]
//! async fn test_workflow() {
//!     let server = MockServer::start().await;
//!     let client = ProfitBricksClient::new("user", "pass", server.url()).unwrap();
//!
//!     let status = Snapshot::delete_and_wait(&client, "snap-2".to_string(), Duration::ZERO)
//!         .await
//!         .unwrap();
//!     assert!(status.state().is_terminal());
//!
//!     server.shutdown().await;
//! }
//! ```

mod fixtures;
mod handlers;
mod server;
mod state;

pub use fixtures::{DefaultScenario, Fixtures};
pub use server::MockServer;
pub use state::{Completion, MockRequest, MockState, RequestQuery};
