//! Log file setup.
//!
//! The TUI owns the terminal, so tracing output goes to a file. The filter comes
//! from `PLANREV_LOG` (same syntax as `RUST_LOG`) and defaults to `info`.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

const FILTER_ENV: &str = "PLANREV_LOG";

/// Installs the global subscriber writing to `path`, creating parent directories.
///
/// # Errors
///
/// Fails if the log file cannot be opened or a subscriber is already installed.
pub fn init(path: &Path) -> anyhow::Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating log directory {}", dir.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))?;

    let filter = EnvFilter::try_from_env(FILTER_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("installing log subscriber: {e}"))?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "planrev starting");
    Ok(())
}
