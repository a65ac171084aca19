//! Test data fixtures for the mock server.
//!
//! Provides factory functions for creating realistic test data.

use crate::{
    resource_type, Datacenter, DatacenterProperties, Metadata, Resource, Snapshot,
    SnapshotProperties, Volume, VolumeProperties,
};

use super::state::MockRequest;

/// Collection of fixture factories for test data.
pub struct Fixtures;

fn available() -> Metadata {
    Metadata {
        state: Some("AVAILABLE".to_string()),
        created_by: Some("test@example.com".to_string()),
        ..Default::default()
    }
}

impl Fixtures {
    // =========================================================================
    // Datacenter Fixtures
    // =========================================================================

    /// Create an available datacenter.
    pub fn datacenter(id: &str, name: &str, location: &str) -> Datacenter {
        Resource {
            id: id.to_string(),
            resource_type: resource_type::DATACENTER.to_string(),
            href: format!("/datacenters/{id}"),
            metadata: available(),
            properties: DatacenterProperties {
                name: Some(name.to_string()),
                location: Some(location.to_string()),
                version: Some(1),
                ..Default::default()
            },
            entities: None,
        }
    }

    // =========================================================================
    // Volume Fixtures
    // =========================================================================

    /// Create an available HDD volume, optionally built from an image.
    pub fn volume(datacenter_id: &str, id: &str, name: &str, image: Option<&str>) -> Volume {
        Resource {
            id: id.to_string(),
            resource_type: resource_type::VOLUME.to_string(),
            href: format!("/datacenters/{datacenter_id}/volumes/{id}"),
            metadata: available(),
            properties: VolumeProperties {
                name: Some(name.to_string()),
                volume_type: Some("HDD".to_string()),
                size: Some(10.0),
                image: image.map(str::to_string),
                licence_type: Some("LINUX".to_string()),
                ..Default::default()
            },
            entities: None,
        }
    }

    // =========================================================================
    // Snapshot Fixtures
    // =========================================================================

    /// Create an available snapshot.
    pub fn snapshot(id: &str, name: &str, location: &str, size: f64) -> Snapshot {
        Resource {
            id: id.to_string(),
            resource_type: resource_type::SNAPSHOT.to_string(),
            href: format!("/snapshots/{id}"),
            metadata: available(),
            properties: SnapshotProperties {
                name: Some(name.to_string()),
                location: Some(location.to_string()),
                size: Some(size),
                licence_type: Some("LINUX".to_string()),
                ..Default::default()
            },
            entities: None,
        }
    }

    // =========================================================================
    // Request Fixtures
    // =========================================================================

    /// A queued create-volume request whose body uses `image` as its image.
    pub fn volume_creation(id: &str, datacenter_id: &str, image: &str) -> MockRequest {
        let body = serde_json::json!({
            "properties": { "name": "restored", "size": 10, "image": image, "type": "HDD" }
        });
        MockRequest::queued(id, "POST", &format!("/datacenters/{datacenter_id}/volumes"))
            .with_body(body.to_string())
    }

    // =========================================================================
    // Scenario Builders
    // =========================================================================

    /// Create a complete default scenario with related data.
    ///
    /// - datacenter `dc-1` in `de/fra` with one volume built from `snap-1`
    /// - datacenter `dc-2` in `us/las`, empty
    /// - snapshots `snap-1` (in use), `snap-2` and `snap-3` (unused)
    pub fn default_scenario() -> DefaultScenario {
        DefaultScenario {
            datacenters: vec![
                Self::datacenter("dc-1", "Production", "de/fra"),
                Self::datacenter("dc-2", "Staging", "us/las"),
            ],
            volumes: vec![(
                "dc-1".to_string(),
                Self::volume("dc-1", "vol-1", "root", Some("snap-1")),
            )],
            snapshots: vec![
                Self::snapshot("snap-1", "golden-image", "de/fra", 10.0),
                Self::snapshot("snap-2", "nightly", "de/fra", 20.0),
                Self::snapshot("snap-3", "nightly", "us/las", 5.0),
            ],
        }
    }
}

/// A complete test scenario with related data.
pub struct DefaultScenario {
    pub datacenters: Vec<Datacenter>,
    /// Volumes paired with their datacenter ID.
    pub volumes: Vec<(String, Volume)>,
    pub snapshots: Vec<Snapshot>,
}
