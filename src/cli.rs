//! Command-line argument parsing for overmind

use clap::Parser;
use std::path::PathBuf;

/// overmind - an agent orchestration controller
#[derive(Parser, Debug)]
#[command(name = "overmind")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", default_value = "overmind.toml")]
    pub config: PathBuf,

    /// Enable debug logging
    #[arg(short, long)]
    pub debug: bool,

    /// Override the result store path
    #[arg(short, long, value_name = "FILE")]
    pub store: Option<PathBuf>,

    /// Override the per-agent deadline in seconds
    #[arg(short, long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// List registered agent factories and exit
    #[arg(short, long)]
    pub list: bool,
}
