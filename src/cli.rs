//! Command-line interface definitions.
//!
//! Defines all CLI arguments and subcommands using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Trellis page composition engine CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Config file name (default: trellis.toml)
    #[arg(short = 'C', long, default_value = "trellis.toml")]
    pub config: PathBuf,

    /// Override the data source preference (auto, remote, local)
    #[arg(short, long)]
    pub source: Option<String>,

    /// Override the build mode (development, production)
    #[arg(short, long)]
    pub env: Option<String>,

    /// Suppress diagnostic output
    #[arg(short, long)]
    pub quiet: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Show data source status: preference, primary store, availability
    Status,

    /// Resolve a route through the data source chain and print its JSON
    Fetch {
        /// Logical route path, e.g. "/" or "/blog/post-1"
        path: String,
    },

    /// Report the distinct component types a page references
    Check {
        /// Logical route path, e.g. "/" or "/blog/post-1"
        path: String,
    },
}
