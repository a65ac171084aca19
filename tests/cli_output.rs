//! Tests for CLI output formatting.
//!
//! - JSON output with --json flag
//! - Pretty-print output as default

use profitbricks::{PrettyPrint, Request, RequestStatus, Snapshot, Volume};

// ============================================================================
// JSON Output Tests
// ============================================================================

#[test]
fn test_json_output_keeps_wire_names() {
    let snapshot = make_test_snapshot();
    let json_output = serde_json::to_string_pretty(&snapshot).unwrap();

    let parsed: serde_json::Value = serde_json::from_str(&json_output).unwrap();
    assert_eq!(parsed["type"], "snapshot");
    assert_eq!(parsed["metadata"]["state"], "AVAILABLE");
    assert_eq!(parsed["properties"]["cpuHotPlug"], true);
    assert!(parsed["properties"].get("description").is_none());
}

#[test]
fn test_json_for_list_outputs_array() {
    let snapshots = vec![make_test_snapshot(), make_test_snapshot()];
    let json_output = serde_json::to_string_pretty(&snapshots).unwrap();

    let parsed: serde_json::Value = serde_json::from_str(&json_output).unwrap();
    assert_eq!(parsed.as_array().unwrap().len(), 2);
}

#[test]
fn test_volume_type_field_is_renamed() {
    let volume: Volume = serde_json::from_value(serde_json::json!({
        "id": "vol-1",
        "type": "volume",
        "properties": { "type": "SSD", "size": 50 }
    }))
    .unwrap();

    assert_eq!(volume.properties.volume_type.as_deref(), Some("SSD"));
    let json = serde_json::to_value(&volume).unwrap();
    assert_eq!(json["properties"]["type"], "SSD");
}

// ============================================================================
// Pretty-Print Tests
// ============================================================================

#[test]
fn test_default_output_is_not_json() {
    let output = make_test_snapshot().pretty_print();

    let parse_result: Result<serde_json::Value, _> = serde_json::from_str(&output);
    assert!(parse_result.is_err(), "Default output should NOT be valid JSON");
}

#[test]
fn test_snapshot_pretty_print_shows_key_fields() {
    let output = make_test_snapshot().pretty_print();

    assert!(output.contains("snap-1"), "Should show ID");
    assert!(output.contains("golden-image"), "Should show name");
    assert!(output.contains("de/fra"), "Should show location");
    assert!(output.contains("Created:"), "Should show creation date");
}

#[test]
fn test_request_pretty_print_shows_method_and_status() {
    let request: Request = serde_json::from_value(serde_json::json!({
        "id": "42",
        "type": "request",
        "metadata": {
            "requestStatus": { "id": "42/status", "metadata": { "status": "FAILED", "message": "quota exceeded" } }
        },
        "properties": { "method": "DELETE", "url": "/snapshots/9" }
    }))
    .unwrap();

    let output = request.pretty_print();

    assert!(output.contains("DELETE"));
    assert!(output.contains("/snapshots/9"));
    assert!(output.contains("FAILED"));
    assert!(output.contains("quota exceeded"));
}

#[test]
fn test_request_status_pretty_print() {
    let status: RequestStatus = serde_json::from_value(serde_json::json!({
        "id": "42/status",
        "type": "request-status",
        "metadata": { "status": "DONE", "message": "Request has been successfully executed" }
    }))
    .unwrap();

    let output = status.pretty_print();

    assert!(output.starts_with("Request Status: 42/status"));
    assert!(output.contains("DONE"));
}

// ============================================================================
// Test Helpers
// ============================================================================

fn make_test_snapshot() -> Snapshot {
    serde_json::from_value(serde_json::json!({
        "id": "snap-1",
        "type": "snapshot",
        "href": "https://api.profitbricks.com/cloudapi/v4/snapshots/snap-1",
        "metadata": {
            "createdDate": "2018-01-15T10:00:00Z",
            "createdBy": "test@example.com",
            "state": "AVAILABLE"
        },
        "properties": {
            "name": "golden-image",
            "location": "de/fra",
            "size": 10.0,
            "cpuHotPlug": true,
            "licenceType": "LINUX"
        }
    }))
    .unwrap()
}
