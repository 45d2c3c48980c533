//! CLI argument parsing for skingen

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "skingen")]
#[command(author, version, about = "Generate density-specific UI skins from templates", long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(short = 'l', long = "log-level", global = true)]
    pub log_level: Option<String>,

    /// Directory holding the templates (overrides config)
    #[arg(short, long, global = true)]
    pub dir: Option<PathBuf>,

    /// Subcommand to execute (default: generate)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Restricts a run to some skins or densities
#[derive(Args, Debug, Clone, Default)]
pub struct Selection {
    /// Only this skin (repeatable)
    #[arg(short, long = "skin", value_name = "SKIN")]
    pub skins: Vec<String>,

    /// Only this density suffix, e.g. -hdpi (repeatable)
    #[arg(short = 'D', long = "density", value_name = "SUFFIX", allow_hyphen_values = true)]
    pub densities: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate every skin for every density
    Generate {
        #[command(flatten)]
        selection: Selection,

        /// Fail on unparseable placeholder values
        #[arg(long)]
        strict: bool,
    },

    /// Validate templates without writing anything
    Check {
        #[command(flatten)]
        selection: Selection,

        /// Fail on unparseable placeholder values
        #[arg(long)]
        strict: bool,
    },

    /// List configured skins and densities
    List,

    /// Remove generated files
    Clean {
        #[command(flatten)]
        selection: Selection,
    },

    /// Write the default configuration
    Init {
        /// Destination (default: .skingen.yml)
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}
