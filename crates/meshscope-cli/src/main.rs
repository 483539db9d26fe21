//! meshscope CLI
//!
//! Resolve mesh hostnames and look up Istio kinds from the command line.

use clap::Parser;

use meshscope_cli::{Cli, Result};
use meshscope_common::telemetry::init_logging;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_format)?;
    cli.run().await
}
