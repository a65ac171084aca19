//! ProfitBricks Cloud API CLI binary.
//!
//! A command-line interface for interacting with the Cloud API.

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use profitbricks::cli::{Cli, Command, Entity};
use profitbricks::{
    has_pending_operation, is_snapshot_in_use, is_snapshot_in_use_strict, CancellationToken,
    Datacenter, Delete, Get, List, PrettyPrint, ProfitBricksClient, ProfitBricksError, Request,
    RequestListFilter, Resource, Selector, Server, Snapshot, Volume, WaitConfig,
};
use serde::Serialize;
use tabled::{Table, Tabled};
use tracing_subscriber::EnvFilter;

const DEFAULT_API_URL: &str = "https://api.profitbricks.com/cloudapi/v4";

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let client = match build_client(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Hint: Set PROFITBRICKS_USERNAME and PROFITBRICKS_PASSWORD");
            return ExitCode::FAILURE;
        }
    };

    match run(&client, cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn build_client(cli: &Cli) -> profitbricks::Result<ProfitBricksClient> {
    let username = cli.username.as_deref().ok_or_else(|| {
        ProfitBricksError::ConfigMissing("PROFITBRICKS_USERNAME not set".to_string())
    })?;
    let password = cli.password.as_deref().ok_or_else(|| {
        ProfitBricksError::ConfigMissing("PROFITBRICKS_PASSWORD not set".to_string())
    })?;
    let api_url = cli.api_url.as_deref().unwrap_or(DEFAULT_API_URL);
    ProfitBricksClient::new(username, password, api_url)
}

async fn run(client: &ProfitBricksClient, cli: Cli) -> profitbricks::Result<()> {
    let json = cli.json;
    match cli.command {
        Command::Get {
            entity,
            id,
            datacenter,
        } => handle_get(client, entity, id, datacenter, json).await,
        Command::List {
            entity,
            datacenter,
            name,
            state,
            status,
            method,
            url,
        } => {
            let mut filter = RequestListFilter::new();
            if let Some(status) = status {
                filter = filter.with_status(status.into());
            }
            if let Some(method) = method {
                filter = filter.with_method(method);
            }
            if let Some(url) = url {
                filter = filter.with_url(url);
            }
            let selection = Selection { name, state };
            handle_list(client, entity, datacenter, selection, filter, json).await
        }
        Command::Delete {
            entity,
            id,
            wait,
            timeout,
        } => handle_delete(client, entity, id, wait, Duration::from_secs(timeout), json).await,
        Command::Wait {
            status_url,
            timeout,
            interval,
        } => {
            let config = WaitConfig::default()
                .with_timeout(Duration::from_secs(timeout))
                .with_poll_interval(Duration::from_millis(interval));
            let cancel = CancellationToken::new();
            let on_ctrl_c = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    on_ctrl_c.cancel();
                }
            });
            let status = client.wait_for_request(&status_url, config, &cancel).await?;
            output_single(&status, json)
        }
        Command::Pending { resource, method } => {
            let pending = has_pending_operation(client, &resource, method).await?;
            output_answer("pending", pending, json)
        }
        Command::InUse {
            snapshot,
            datacenter,
            strict,
        } => {
            let in_use = if strict {
                is_snapshot_in_use_strict(client, &datacenter, &snapshot).await?
            } else {
                is_snapshot_in_use(client, &datacenter, &snapshot).await?
            };
            output_answer("in_use", in_use, json)
        }
    }
}

/// Client-side filters shared by every entity.
struct Selection {
    name: Option<String>,
    state: Option<String>,
}

impl Selection {
    fn selectors<P: 'static>(
        &self,
        by_name: impl Fn(String) -> Selector<Resource<P>>,
    ) -> Vec<Selector<Resource<P>>> {
        let mut selectors = Vec::new();
        if let Some(name) = &self.name {
            selectors.push(by_name(name.clone()));
        }
        if let Some(state) = &self.state {
            selectors.push(Resource::by_state(state.clone()));
        }
        selectors
    }
}

fn require_datacenter(datacenter: Option<String>, entity: &str) -> profitbricks::Result<String> {
    datacenter.ok_or_else(|| {
        ProfitBricksError::ConfigMissing(format!("--datacenter required for {entity}"))
    })
}

async fn handle_get(
    client: &ProfitBricksClient,
    entity: Entity,
    id: String,
    datacenter: Option<String>,
    json: bool,
) -> profitbricks::Result<()> {
    match entity {
        Entity::Datacenter => output_single(&Datacenter::get(client, id).await?, json),
        Entity::Server => {
            let dc = require_datacenter(datacenter, "servers")?;
            output_single(&Server::get(client, (dc, id)).await?, json)
        }
        Entity::Volume => {
            let dc = require_datacenter(datacenter, "volumes")?;
            output_single(&Volume::get(client, (dc, id)).await?, json)
        }
        Entity::Snapshot => output_single(&Snapshot::get(client, id).await?, json),
        Entity::Request => output_single(&Request::get(client, id).await?, json),
    }
}

async fn handle_list(
    client: &ProfitBricksClient,
    entity: Entity,
    datacenter: Option<String>,
    selection: Selection,
    filter: RequestListFilter,
    json: bool,
) -> profitbricks::Result<()> {
    match entity {
        Entity::Datacenter => {
            let selectors = selection.selectors(|n| Datacenter::by_name(n));
            let items = Datacenter::list_with_selector(client, &(), &selectors).await?;
            output_list(&items, json, |i| DatacenterRow::from(i))
        }
        Entity::Server => {
            let dc = require_datacenter(datacenter, "servers")?;
            let selectors = selection.selectors(|n| Server::by_name(n));
            let items = Server::list_with_selector(client, &dc, &selectors).await?;
            output_list(&items, json, |i| ServerRow::from(i))
        }
        Entity::Volume => {
            let dc = require_datacenter(datacenter, "volumes")?;
            let selectors = selection.selectors(|n| Volume::by_name(n));
            let items = Volume::list_with_selector(client, &dc, &selectors).await?;
            output_list(&items, json, |i| VolumeRow::from(i))
        }
        Entity::Snapshot => {
            let selectors = selection.selectors(|n| Snapshot::by_name(n));
            let items = Snapshot::list_with_selector(client, &(), &selectors).await?;
            output_list(&items, json, |i| SnapshotRow::from(i))
        }
        Entity::Request => {
            let items = Request::list(client, &filter).await?.items;
            output_list(&items, json, |i| RequestRow::from(i))
        }
    }
}

async fn handle_delete(
    client: &ProfitBricksClient,
    entity: Entity,
    id: String,
    wait: bool,
    timeout: Duration,
    json: bool,
) -> profitbricks::Result<()> {
    let accepted = match entity {
        Entity::Snapshot => Snapshot::delete(client, id).await?,
        Entity::Datacenter => Datacenter::delete(client, id).await?,
        _ => {
            eprintln!("Error: Only snapshots and datacenters can be deleted via CLI");
            return Err(ProfitBricksError::ConfigMissing(
                "unsupported entity for delete".to_string(),
            ));
        }
    };

    if wait {
        let status = accepted.wait(client, timeout).await?;
        output_single(&status, json)
    } else {
        let location = accepted.status_url()?;
        if json {
            println!("{}", serde_json::json!({ "location": location }));
        } else {
            println!("Accepted. Status: {location}");
        }
        Ok(())
    }
}

fn output_single<T: Serialize + PrettyPrint>(item: &T, json: bool) -> profitbricks::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(item)?);
    } else {
        println!("{}", item.pretty_print());
    }
    Ok(())
}

fn output_answer(key: &str, answer: bool, json: bool) -> profitbricks::Result<()> {
    if json {
        let mut map = serde_json::Map::new();
        map.insert(key.to_string(), answer.into());
        println!("{}", serde_json::Value::Object(map));
    } else {
        println!("{}", if answer { "yes" } else { "no" });
    }
    Ok(())
}

fn output_list<T, R, F>(items: &[T], json: bool, to_row: F) -> profitbricks::Result<()>
where
    T: Serialize,
    R: Tabled,
    F: Fn(&T) -> R,
{
    if json {
        println!("{}", serde_json::to_string_pretty(items)?);
    } else {
        let rows: Vec<R> = items.iter().map(to_row).collect();
        println!("{}", Table::new(rows));
        println!("\n{} item(s)", items.len());
    }
    Ok(())
}

// Table row types for non-JSON output

fn or_dash(value: Option<&str>) -> String {
    value.unwrap_or("-").to_string()
}

#[derive(Tabled)]
struct DatacenterRow {
    id: String,
    name: String,
    location: String,
    state: String,
}

impl From<&Datacenter> for DatacenterRow {
    fn from(dc: &Datacenter) -> Self {
        Self {
            id: dc.id.clone(),
            name: or_dash(dc.properties.name.as_deref()),
            location: or_dash(dc.properties.location.as_deref()),
            state: or_dash(dc.state()),
        }
    }
}

#[derive(Tabled)]
struct ServerRow {
    id: String,
    name: String,
    cores: String,
    ram: String,
    vm_state: String,
}

impl From<&Server> for ServerRow {
    fn from(s: &Server) -> Self {
        Self {
            id: s.id.clone(),
            name: or_dash(s.properties.name.as_deref()),
            cores: s.properties.cores.map(|c| c.to_string()).unwrap_or_default(),
            ram: s.properties.ram.map(|r| r.to_string()).unwrap_or_default(),
            vm_state: or_dash(s.properties.vm_state.as_deref()),
        }
    }
}

#[derive(Tabled)]
struct VolumeRow {
    id: String,
    name: String,
    size: String,
    image: String,
    state: String,
}

impl From<&Volume> for VolumeRow {
    fn from(v: &Volume) -> Self {
        Self {
            id: v.id.clone(),
            name: or_dash(v.properties.name.as_deref()),
            size: v.properties.size.map(|s| s.to_string()).unwrap_or_default(),
            image: or_dash(v.properties.image.as_deref()),
            state: or_dash(v.state()),
        }
    }
}

#[derive(Tabled)]
struct SnapshotRow {
    id: String,
    name: String,
    location: String,
    size: String,
    state: String,
}

impl From<&Snapshot> for SnapshotRow {
    fn from(s: &Snapshot) -> Self {
        Self {
            id: s.id.clone(),
            name: or_dash(s.properties.name.as_deref()),
            location: or_dash(s.properties.location.as_deref()),
            size: s.properties.size.map(|s| s.to_string()).unwrap_or_default(),
            state: or_dash(s.state()),
        }
    }
}

#[derive(Tabled)]
struct RequestRow {
    id: String,
    method: String,
    url: String,
    status: String,
}

impl From<&Request> for RequestRow {
    fn from(r: &Request) -> Self {
        Self {
            id: r.id.clone(),
            method: r.properties.method.clone(),
            url: r.properties.url.clone(),
            status: r.state().map(|s| s.to_string()).unwrap_or_default(),
        }
    }
}
