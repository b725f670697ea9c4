//! Tracing setup for the cmdkeys CLI
//!
//! Usage:
//!   cmdkeys --debug ...               # Debug logging
//!   RUST_LOG=cmdkeys_core=debug cmdkeys edit
//!
//! The editor owns the terminal while it runs, so its logs go to a file.
//! Plain commands log to stderr and keep stdout for their output.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{anyhow, Context, Result};
use tracing_subscriber::EnvFilter;

/// Tracing configuration options
#[derive(Debug, Clone, Default)]
pub struct TracingConfig {
    /// Enable debug logging (sets RUST_LOG=debug if not already set)
    pub debug: bool,
    /// Append logs to this file instead of stderr
    pub log_file: Option<PathBuf>,
}

fn env_filter(debug: bool) -> EnvFilter {
    let default = if debug { "debug" } else { "info" };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Initialize the global subscriber
pub fn init(config: &TracingConfig) -> Result<()> {
    let filter = env_filter(config.debug);

    match &config.log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create log directory: {:?}", parent))?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file: {:?}", path))?;

            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(config.debug)
                .compact()
                .try_init()
                .map_err(|err| anyhow!(err))
        }
        None => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(config.debug)
            .compact()
            .try_init()
            .map_err(|err| anyhow!(err)),
    }
}
