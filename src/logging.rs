use anyhow::{anyhow, Result};
use tracing::Level;

/// Installs the stderr subscriber. Safe to call once per process; a second
/// call reports an error instead of replacing the first subscriber.
pub fn init_logging(level: Level) -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow!("failed to start logger: {err}"))?;
    tracing::debug!(%level, version = env!("CARGO_PKG_VERSION"), "logging started");
    Ok(())
}
