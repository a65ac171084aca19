//! Basic example demonstrating the Cloud API client.
//!
//! Run with:
//! ```
//! PROFITBRICKS_USERNAME=me PROFITBRICKS_PASSWORD=secret cargo run --example basic
//! ```

use std::time::Duration;

use profitbricks::{
    has_delete_snapshot_in_progress, is_snapshot_in_use, Datacenter, Get, List,
    ProfitBricksClient, Snapshot, SnapshotProperties, Update,
};

#[tokio::main]
async fn main() -> profitbricks::Result<()> {
    // Initialize tracing for debugging (optional)
    tracing_subscriber::fmt::init();

    println!("Creating client...");
    let client = ProfitBricksClient::from_env()?;
    println!("Connected to: {}", client.base_url());

    println!("\n--- Listing Datacenters ---");
    let datacenters = Datacenter::list(&client, &()).await?;
    println!("Found {} datacenters", datacenters.len());
    for dc in &datacenters {
        println!(
            "  - {} ({}) in {}",
            dc.properties.name.as_deref().unwrap_or("unnamed"),
            dc.id,
            dc.properties.location.as_deref().unwrap_or("?"),
        );
    }

    println!("\n--- Snapshots ---");
    let snapshots = Snapshot::list_with_selector(
        &client,
        &(),
        &[Snapshot::by_state("AVAILABLE")],
    )
    .await?;
    println!("Found {} available snapshots", snapshots.len());

    let Some(snapshot) = snapshots.first() else {
        return Ok(());
    };
    let snapshot = Snapshot::get(&client, snapshot.id.clone()).await?;
    println!(
        "Snapshot {}: {} GB",
        snapshot.id,
        snapshot.properties.size.unwrap_or_default()
    );

    if has_delete_snapshot_in_progress(&client, &snapshot.id).await? {
        println!("  deletion already in progress");
    }

    for dc in &datacenters {
        if is_snapshot_in_use(&client, &dc.id, &snapshot.id).await? {
            println!("  in use in datacenter {}", dc.id);
        }
    }

    // Updates are asynchronous; wait for the API to apply it
    let params = SnapshotProperties {
        description: Some("checked by the basic example".to_string()),
        ..Default::default()
    };
    let accepted = Snapshot::update(&client, snapshot.id, params).await?;
    let status = accepted.wait(&client, Duration::from_secs(120)).await?;
    println!("Update finished: {}", status.state());

    Ok(())
}
