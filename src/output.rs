//! Output formatting for CLI display.
//!
//! Provides the [`PrettyPrint`] trait for human-readable output
//! as an alternative to JSON serialization.

use crate::{Datacenter, Metadata, Request, RequestStatus, Server, Snapshot, Volume};

/// Trait for human-readable key-value output.
///
/// Implemented by entity types to provide formatted output
/// suitable for terminal display when `--json` is not specified.
pub trait PrettyPrint {
    /// Returns a formatted string for terminal display.
    fn pretty_print(&self) -> String;
}

fn header(kind: &str, id: &str) -> Vec<String> {
    let title = format!("{kind}: {id}");
    let divider = "─".repeat(title.chars().count().max(30));
    vec![title, divider]
}

fn push_opt<T: std::fmt::Display>(lines: &mut Vec<String>, label: &str, value: Option<T>) {
    if let Some(value) = value {
        lines.push(format!("{:<16}{}", format!("{label}:"), value));
    }
}

fn push_metadata(lines: &mut Vec<String>, metadata: &Metadata) {
    push_opt(lines, "State", metadata.state.as_deref());
    push_opt(
        lines,
        "Created",
        metadata
            .created_date
            .map(|d| d.format("%Y-%m-%d %H:%M:%S UTC")),
    );
    push_opt(lines, "Created By", metadata.created_by.as_deref());
}

impl PrettyPrint for Datacenter {
    fn pretty_print(&self) -> String {
        let mut lines = header("Datacenter", &self.id);
        push_opt(&mut lines, "Name", self.properties.name.as_deref());
        push_opt(&mut lines, "Location", self.properties.location.as_deref());
        push_opt(&mut lines, "Description", self.properties.description.as_deref());
        push_opt(&mut lines, "Version", self.properties.version);
        push_metadata(&mut lines, &self.metadata);
        lines.join("\n")
    }
}

impl PrettyPrint for Server {
    fn pretty_print(&self) -> String {
        let mut lines = header("Server", &self.id);
        push_opt(&mut lines, "Name", self.properties.name.as_deref());
        push_opt(&mut lines, "Cores", self.properties.cores);
        push_opt(&mut lines, "RAM (MiB)", self.properties.ram);
        push_opt(&mut lines, "VM State", self.properties.vm_state.as_deref());
        push_opt(
            &mut lines,
            "Boot Volume",
            self.properties.boot_volume.as_ref().map(|v| v.id.as_str()),
        );
        push_metadata(&mut lines, &self.metadata);
        lines.join("\n")
    }
}

impl PrettyPrint for Volume {
    fn pretty_print(&self) -> String {
        let mut lines = header("Volume", &self.id);
        push_opt(&mut lines, "Name", self.properties.name.as_deref());
        push_opt(&mut lines, "Type", self.properties.volume_type.as_deref());
        push_opt(&mut lines, "Size (GB)", self.properties.size);
        push_opt(&mut lines, "Image", self.properties.image.as_deref());
        push_metadata(&mut lines, &self.metadata);
        lines.join("\n")
    }
}

impl PrettyPrint for Snapshot {
    fn pretty_print(&self) -> String {
        let mut lines = header("Snapshot", &self.id);
        push_opt(&mut lines, "Name", self.properties.name.as_deref());
        push_opt(&mut lines, "Description", self.properties.description.as_deref());
        push_opt(&mut lines, "Location", self.properties.location.as_deref());
        push_opt(&mut lines, "Size (GB)", self.properties.size);
        push_opt(&mut lines, "Licence", self.properties.licence_type.as_deref());
        push_metadata(&mut lines, &self.metadata);
        lines.join("\n")
    }
}

impl PrettyPrint for Request {
    fn pretty_print(&self) -> String {
        let mut lines = header("Request", &self.id);
        lines.push(format!("{:<16}{}", "Method:", self.properties.method));
        lines.push(format!("{:<16}{}", "URL:", self.properties.url));
        push_opt(&mut lines, "Status", self.state());
        push_opt(
            &mut lines,
            "Message",
            self.metadata
                .request_status
                .as_ref()
                .and_then(|s| s.message()),
        );
        push_opt(
            &mut lines,
            "Created",
            self.metadata
                .created_date
                .map(|d| d.format("%Y-%m-%d %H:%M:%S UTC")),
        );
        lines.join("\n")
    }
}

impl PrettyPrint for RequestStatus {
    fn pretty_print(&self) -> String {
        let mut lines = header("Request Status", &self.id);
        lines.push(format!("{:<16}{}", "Status:", self.state()));
        push_opt(&mut lines, "Message", self.message());
        for target in &self.metadata.targets {
            lines.push(format!(
                "{:<16}{} {} ({})",
                "Target:",
                target.target.resource_type,
                target.target.id,
                target
                    .status
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "-".to_string())
            ));
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_pretty_print_format() {
        let snapshot: Snapshot = serde_json::from_value(serde_json::json!({
            "id": "snap-1",
            "type": "snapshot",
            "metadata": { "state": "AVAILABLE" },
            "properties": { "name": "nightly", "size": 10.0 }
        }))
        .unwrap();

        let output = snapshot.pretty_print();
        assert!(output.starts_with("Snapshot: snap-1"));
        assert!(output.contains("Name:           nightly"));
        assert!(output.contains("State:          AVAILABLE"));
        assert!(!output.contains("Description:"));
    }

    #[test]
    fn test_request_status_pretty_print_lists_targets() {
        let status: RequestStatus = serde_json::from_value(serde_json::json!({
            "id": "42/status",
            "metadata": {
                "status": "RUNNING",
                "targets": [{ "target": { "id": "9", "type": "snapshot" }, "status": "RUNNING" }]
            }
        }))
        .unwrap();

        let output = status.pretty_print();
        assert!(output.contains("Status:         RUNNING"));
        assert!(output.contains("Target:         snapshot 9 (RUNNING)"));
    }
}
