//! Configuration read once from the environment (`.env` is loaded first by `main`)

use std::env;
use std::sync::LazyLock;
use std::time::Duration;

/// Bot token
/// Read from BOT_TOKEN or TELOXIDE_TOKEN environment variable
pub static BOT_TOKEN: LazyLock<String> = LazyLock::new(|| {
    env::var("BOT_TOKEN")
        .or_else(|_| env::var("TELOXIDE_TOKEN"))
        .unwrap_or_default()
});

/// Custom Bot API server URL (local telegram-bot-api instance)
/// Read from BOT_API_URL environment variable
pub static BOT_API_URL: LazyLock<Option<String>> = LazyLock::new(|| env::var("BOT_API_URL").ok());

/// Admin configuration
pub mod admin {
    use super::*;

    /// Telegram user id allowed to use admin screens and /routes
    /// Read from ADMIN_USER_ID environment variable
    /// Default: 0 (no admin)
    pub static ADMIN_USER_ID: LazyLock<u64> = LazyLock::new(|| {
        env::var("ADMIN_USER_ID")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(0)
    });
}

/// Network configuration
pub mod network {
    use super::*;

    /// Timeout for Bot API requests (seconds)
    /// Read from NETWORK_TIMEOUT_SECS environment variable
    pub static TIMEOUT_SECS: LazyLock<u64> = LazyLock::new(|| {
        env::var("NETWORK_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(30)
    });

    /// Request timeout duration
    pub fn timeout() -> Duration {
        Duration::from_secs(*TIMEOUT_SECS)
    }
}
