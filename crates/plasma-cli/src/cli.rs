//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;
use plasma_config::DEFAULT_CONFIG_PATH;

/// Plasma - extensible host process
#[derive(Debug, Parser)]
#[command(name = "plasma")]
#[command(author, version, about, long_about = None)]
pub(crate) struct Cli {
    /// Write the configuration file (filling in defaults) and exit
    #[arg(long = "init-settings", visible_alias = "init")]
    pub(crate) init_settings: bool,

    /// Path to the configuration file
    #[arg(short, long, env = "PLASMA_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    pub(crate) config: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    pub(crate) verbose: bool,
}
