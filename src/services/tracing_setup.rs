//! Global tracing subscriber
//!
//! The editor owns the terminal, so log output goes to a file and is only
//! enabled when a log file is requested.

use anyhow::Context;
use std::fs::File;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the filter directives
pub const LOG_ENV: &str = "GAPEDIT_LOG";

const DEFAULT_DIRECTIVES: &str = "gapedit=info";

/// Build the filter from `GAPEDIT_LOG`, defaulting to info for this crate
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES))
}

/// Install a subscriber that writes to `log_file`, truncating it
pub fn init_global(log_file: &Path) -> anyhow::Result<()> {
    let file = File::create(log_file)
        .with_context(|| format!("Failed to create log file {}", log_file.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install tracing subscriber: {e}"))?;
    tracing::info!("Logging to {}", log_file.display());
    Ok(())
}
