//! meshscope CLI library

pub mod commands;
pub mod error;

use std::path::PathBuf;

pub use error::{Error, Result};

use clap::{Parser, Subcommand};
use meshscope_common::telemetry::LogFormat;
use meshscope_common::MeshConfig;

/// meshscope - Istio hostname resolution and type lookups
#[derive(Parser, Debug)]
#[command(name = "meshscope")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Mesh config file (YAML or JSON); falls back to MESHSCOPE_CONFIG
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log output format (plain, json)
    #[arg(long, default_value = "plain", global = true)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve a single hostname
    Host(commands::host::HostArgs),
    /// Resolve every host referenced by the objects in a manifest
    Hosts(commands::hosts::HostsArgs),
    /// Print the kind for a REST plural name
    Kind {
        /// Plural resource name, e.g. virtualservices
        plural: String,
    },
    /// Print the plural for an adapter or template kind
    Plural {
        /// Singular kind, e.g. handler
        kind: String,
    },
    /// List registered Istio kinds
    Kinds(commands::kinds::KindsArgs),
}

impl Cli {
    /// Run the CLI command
    pub async fn run(self) -> Result<()> {
        let config = MeshConfig::load(self.config.as_deref())?;
        let resolver = config.resolver();

        match self.command {
            Commands::Host(args) => commands::host::run(args, &resolver),
            Commands::Hosts(args) => commands::hosts::run(args, &resolver).await,
            Commands::Kind { plural } => commands::kinds::run_kind(&plural),
            Commands::Plural { kind } => commands::kinds::run_plural(&kind),
            Commands::Kinds(args) => commands::kinds::run_list(args),
        }
    }
}
