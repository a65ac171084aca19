//! Mock Cloud API server.
//!
//! Provides an axum-based HTTP server that simulates the Cloud API.

use std::sync::Arc;

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use super::fixtures::{DefaultScenario, Fixtures};
use super::handlers;
use super::state::MockState;

/// A mock Cloud API server for testing.
///
/// The server runs in the background and can be used to test the client
/// against a stateful API implementation.
pub struct MockServer {
    /// The URL where the server is listening.
    url: String,
    /// Handle to the server task.
    handle: JoinHandle<()>,
    /// Shared state that can be modified during tests.
    state: Arc<RwLock<MockState>>,
}

impl MockServer {
    /// Start a new mock server with default fixtures.
    ///
    /// The server listens on a random available port and returns immediately.
    /// Use `url()` to get the server's base URL.
    pub async fn start() -> Self {
        Self::with_state(Self::default_state()).await
    }

    /// Start a mock server with empty state.
    pub async fn start_empty() -> Self {
        Self::with_state(MockState::new()).await
    }

    /// Start a mock server with custom state.
    pub async fn with_state(state: MockState) -> Self {
        let shared_state = state.shared();
        let app = Self::create_router(shared_state.clone());

        // Bind to a random available port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to address");
        let addr = listener.local_addr().expect("Failed to get local address");

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Server error");
        });

        Self {
            url: format!("http://{}", addr),
            handle,
            state: shared_state,
        }
    }

    /// Get the base URL of the mock server.
    ///
    /// Use this URL when creating a `ProfitBricksClient` for testing.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get access to the server's shared state.
    pub fn state(&self) -> Arc<RwLock<MockState>> {
        self.state.clone()
    }

    /// Shutdown the server.
    pub async fn shutdown(self) {
        self.handle.abort();
        let _ = self.handle.await;
    }

    fn default_state() -> MockState {
        Self::state_from_scenario(Fixtures::default_scenario())
    }

    fn state_from_scenario(scenario: DefaultScenario) -> MockState {
        let mut state = MockState::new();

        for datacenter in scenario.datacenters {
            state = state.with_datacenter(datacenter);
        }

        for (datacenter_id, volume) in scenario.volumes {
            state = state.with_volume(&datacenter_id, volume);
        }

        for snapshot in scenario.snapshots {
            state = state.with_snapshot(snapshot);
        }

        state
    }

    fn create_router(state: Arc<RwLock<MockState>>) -> Router {
        Router::new()
            // Datacenter routes
            .route(
                "/datacenters",
                get(handlers::list_datacenters).post(handlers::create_datacenter),
            )
            .route(
                "/datacenters/:id",
                get(handlers::get_datacenter)
                    .patch(handlers::update_datacenter)
                    .delete(handlers::delete_datacenter),
            )
            // Volume routes
            .route(
                "/datacenters/:dc/volumes",
                get(handlers::list_volumes).post(handlers::create_volume),
            )
            .route("/datacenters/:dc/volumes/:id", get(handlers::get_volume))
            // Snapshot routes
            .route("/snapshots", get(handlers::list_snapshots))
            .route(
                "/snapshots/:id",
                get(handlers::get_snapshot)
                    .patch(handlers::update_snapshot)
                    .delete(handlers::delete_snapshot),
            )
            // Request routes
            .route("/requests", get(handlers::list_requests))
            .route("/requests/:id", get(handlers::get_request))
            .route("/requests/:id/status", get(handlers::get_request_status))
            // Health check
            .route("/health", get(health_check))
            .with_state(state)
    }
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "ok"
}
