//! Configuration management for the markdown preview language server.
//!
//! Handles:
//! - Command-line argument parsing
//! - Settings file location

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for the markdown preview language server
#[derive(Debug, Parser)]
#[command(name = "mpe-ls")]
#[command(about = "Language server driving Markdown Preview Enhanced")]
#[command(version)]
pub struct Args {
    /// Settings file to load and watch
    #[arg(long, help = "Path to a TOML settings file")]
    pub settings: Option<PathBuf>,

    /// Log level for the language server
    #[arg(
        long,
        default_value = "info",
        help = "Log level (trace, debug, info, warn, error)"
    )]
    pub log_level: String,

    /// Do not watch the settings file for changes
    #[arg(long)]
    pub no_watch: bool,
}

/// Combined configuration from all sources
#[derive(Debug, Clone)]
pub struct Config {
    /// Settings file, explicit or the default location
    pub settings_path: Option<PathBuf>,
    /// Log level
    pub log_level: String,
    /// Reload settings when the file changes
    pub watch_settings: bool,
}

impl Config {
    /// Create configuration from command-line arguments
    pub fn from_args_and_env() -> Result<Self> {
        Self::from_args(Args::parse())
    }

    /// Create configuration from explicit arguments (useful for testing)
    pub fn from_args(args: Args) -> Result<Self> {
        let settings_path = args.settings.or_else(default_settings_path);

        Ok(Config {
            settings_path,
            log_level: args.log_level,
            watch_settings: !args.no_watch,
        })
    }
}

/// `<config dir>/mpe-ls/settings.toml`
pub fn default_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("mpe-ls").join("settings.toml"))
}
