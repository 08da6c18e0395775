//! Log output for hosts embedding the backend.
//!
//! Library code logs through the `log` facade. `init_logging` installs a
//! `tracing-subscriber` formatter which also picks up those `log` records.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber. `RUST_LOG` takes precedence over `level`.
///
/// An invalid `level` is an error even when `RUST_LOG` is set. If a
/// subscriber is already installed it is kept.
pub fn init_logging(level: &str) -> Result<()> {
    let configured = EnvFilter::try_new(level).map_err(|e| anyhow::anyhow!("Invalid log level '{}': {}", level, e))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or(configured);

    if let Err(e) = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
    {
        log::debug!("Keeping the existing log subscriber: {}", e);
        return Ok(());
    }

    tracing::info!("Logging initialized at level {}", level);
    Ok(())
}
