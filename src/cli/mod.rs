//! CLI argument parsing types.
//!
//! This module provides the command-line interface structure for the
//! profitbricks binary.

use clap::{Parser, Subcommand, ValueEnum};

use crate::{Method, RequestState};

/// ProfitBricks Cloud API command-line interface.
#[derive(Parser, Debug)]
#[command(name = "profitbricks", about = "ProfitBricks Cloud API CLI", version)]
pub struct Cli {
    /// Output results as JSON instead of a table.
    #[arg(long, global = true, default_value = "false")]
    pub json: bool,

    /// API username.
    #[arg(long, global = true, env = "PROFITBRICKS_USERNAME", hide_env_values = true)]
    pub username: Option<String>,

    /// API password.
    #[arg(long, global = true, env = "PROFITBRICKS_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// API base URL.
    #[arg(long, global = true, env = "PROFITBRICKS_API_URL")]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Get a single entity by ID.
    Get {
        /// The type of entity to get.
        entity: Entity,

        /// The entity ID.
        id: String,

        /// Datacenter ID (required for servers and volumes).
        #[arg(long)]
        datacenter: Option<String>,
    },

    /// List entities with optional client-side filtering.
    List {
        /// The type of entity to list.
        entity: Entity,

        /// Datacenter ID (required for servers and volumes).
        #[arg(long)]
        datacenter: Option<String>,

        /// Keep only entities with this name.
        #[arg(long)]
        name: Option<String>,

        /// Keep only entities in this metadata state (e.g. AVAILABLE).
        #[arg(long)]
        state: Option<String>,

        /// Requests only: filter by request status.
        #[arg(long, value_enum)]
        status: Option<StatusArg>,

        /// Requests only: filter by HTTP method.
        #[arg(long, value_parser = parse_method)]
        method: Option<Method>,

        /// Requests only: filter by URL substring.
        #[arg(long)]
        url: Option<String>,
    },

    /// Delete an entity.
    Delete {
        /// The type of entity to delete.
        entity: Entity,

        /// The entity ID.
        id: String,

        /// Wait for the deletion to complete.
        #[arg(long)]
        wait: bool,

        /// Seconds to wait (0 uses the default of 600).
        #[arg(long, default_value_t = 0)]
        timeout: u64,
    },

    /// Wait for a request to finish.
    Wait {
        /// Request status URL (from a `location` header).
        status_url: String,

        /// Seconds to wait (0 uses the default of 600).
        #[arg(long, default_value_t = 0)]
        timeout: u64,

        /// Milliseconds between polls (0 uses the default of 1000).
        #[arg(long, default_value_t = 1000)]
        interval: u64,
    },

    /// Check for queued or running requests against a resource.
    Pending {
        /// Resource path or URL substring (e.g. snapshots/<id>).
        resource: String,

        /// HTTP method of the requests to look for.
        #[arg(long, value_parser = parse_method)]
        method: Method,
    },

    /// Check whether a snapshot is used by a volume of a datacenter.
    InUse {
        /// Snapshot ID.
        snapshot: String,

        /// Datacenter ID.
        #[arg(long)]
        datacenter: String,

        /// Fail instead of answering "not in use" when volumes cannot be listed.
        #[arg(long)]
        strict: bool,
    },
}

/// Entity types that can be operated on.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Entity {
    /// A virtual datacenter.
    #[value(alias = "datacenters")]
    Datacenter,
    /// A server in a datacenter.
    #[value(alias = "servers")]
    Server,
    /// A volume in a datacenter.
    #[value(alias = "volumes")]
    Volume,
    /// A volume snapshot.
    #[value(alias = "snapshots")]
    Snapshot,
    /// An entry of the requests log.
    #[value(alias = "requests")]
    Request,
}

/// Request status accepted on the command line.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusArg {
    Queued,
    Running,
    Done,
    Failed,
}

impl From<StatusArg> for RequestState {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Queued => Self::Queued,
            StatusArg::Running => Self::Running,
            StatusArg::Done => Self::Done,
            StatusArg::Failed => Self::Failed,
        }
    }
}

fn parse_method(value: &str) -> Result<Method, String> {
    Method::from_bytes(value.to_ascii_uppercase().as_bytes())
        .map_err(|_| format!("invalid HTTP method '{value}'"))
}
