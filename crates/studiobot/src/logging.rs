//! Logger initialization

use anyhow::Result;

/// Default filter when RUST_LOG is not set
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Initialize the console logger.
///
/// Honours `RUST_LOG`; falls back to [`DEFAULT_LOG_FILTER`].
pub fn init_logger() -> Result<()> {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string());

    pretty_env_logger::formatted_timed_builder()
        .parse_filters(&filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logger: {}", e))?;

    Ok(())
}
