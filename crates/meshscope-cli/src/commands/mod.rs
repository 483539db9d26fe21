//! CLI commands

use clap::ValueEnum;

pub mod format;
pub mod host;
pub mod hosts;
pub mod kinds;

/// Output format
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Columnar text (default)
    #[default]
    Text,
    /// JSON
    Json,
}
