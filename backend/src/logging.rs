//! Logging setup.
//!
//! Library code logs through the `log` macros; the subscriber installed
//! here receives those records through tracing-subscriber's log bridge.

use anyhow::Result;
use std::str::FromStr;
use tracing::level_filters::LevelFilter;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Install the global fmt subscriber
///
/// `RUST_LOG` wins when set; otherwise `level` ("debug", "info", ...) is
/// the default, falling back to info when it does not parse. Fails if a
/// global subscriber is already installed.
pub fn init_logging(level: &str) -> Result<()> {
    let default_level = Level::from_str(level.trim()).unwrap_or(Level::INFO);
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(default_level).into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialise logging: {}", e))?;

    tracing::info!(level = %default_level, "Logging initialised");
    Ok(())
}
