pub mod format;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "layer-guard",
    version,
    about = "Enforce Feature-Sliced Design import boundaries and a canonical import order"
)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check files for layer and import-order violations
    Check {
        /// Paths to check (files or directories)
        #[arg(default_value = ".")]
        paths: Vec<PathBuf>,

        /// Path to layer-guard.toml (defaults to ./layer-guard.toml if present)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Pretty)]
        format: OutputFormat,

        /// Rewrite unsorted import blocks in place
        #[arg(long)]
        fix: bool,
    },

    /// Generate a starter layer-guard.toml
    Init {
        /// Output file path for the generated config
        #[arg(short, long, default_value = "layer-guard.toml")]
        output: PathBuf,

        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },

    /// List available rules
    Rules {
        /// Path to layer-guard.toml, to show configured levels
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    Pretty,
    Json,
    Compact,
    Github,
}
