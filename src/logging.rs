//! Logging setup for multipick
//!
//! The picker owns the terminal, so log output goes to a file that is
//! truncated on every run. Level filtering comes from `MULTIPICK_LOG`
//! (same syntax as `RUST_LOG`), defaulting to `info` for the file and
//! `warn` for stderr.

use crate::error::{PickError, Result};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter
pub const LOG_ENV: &str = "MULTIPICK_LOG";

/// Default log file path (same directory as executable)
pub fn default_log_path() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("multipick.log")
}

fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default))
}

/// Install the global subscriber writing to `path`.
///
/// Returns `Ok(None)` when the file cannot be opened; logging is then off
/// for this run instead of failing the picker.
pub fn init(path: &Path) -> Result<Option<PathBuf>> {
    let file = match OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true) // Start fresh each run
        .open(path)
    {
        Ok(file) => file,
        Err(_) => return Ok(None),
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter("info"))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|e| PickError::Logging(e.to_string()))?;

    tracing::info!("multipick {} logging to {}", crate::VERSION, path.display());
    Ok(Some(path.to_path_buf()))
}

/// Install the global subscriber writing to stderr (non-interactive commands)
pub fn init_stderr() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter("warn"))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| PickError::Logging(e.to_string()))
}

/// Write a separator line for readability
pub fn separator(label: &str) {
    tracing::info!("========== {} ==========", label);
}
