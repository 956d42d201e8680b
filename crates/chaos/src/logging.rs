//! File logging. The terminal belongs to the animation, so logs go to a file.

use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use color_eyre::eyre::{Result, eyre};
use directories::ProjectDirs;
use tracing_subscriber::EnvFilter;

/// Environment variable overriding the configured log filter.
pub const LOG_ENV: &str = "CHAOS_LOG";

/// Path of the log file inside the platform data directory.
pub fn log_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "chaos").map(|dirs| dirs.data_local_dir().join("chaos.log"))
}

/// Install a file subscriber when `$CHAOS_LOG` or `level` names a filter.
pub fn init(level: Option<&str>) -> Result<()> {
    let Some(directive) = std::env::var(LOG_ENV)
        .ok()
        .or_else(|| level.map(str::to_owned))
    else {
        return Ok(());
    };

    let path = log_path().ok_or_else(|| eyre!("no data directory available for the log file"))?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&directive)?)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| eyre!("failed to install log subscriber: {e}"))?;

    tracing::info!(path = %path.display(), filter = %directive, "logging started");
    Ok(())
}
