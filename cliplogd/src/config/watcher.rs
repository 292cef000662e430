use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct WatcherConfig {
    #[serde(default = "WatcherConfig::default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl Default for WatcherConfig {
    fn default() -> Self { Self { poll_interval_ms: Self::default_poll_interval_ms() } }
}

impl From<WatcherConfig> for cliplog_server::ClipboardWatcherOptions {
    fn from(WatcherConfig { poll_interval_ms }: WatcherConfig) -> Self {
        Self { poll_interval: Duration::from_millis(poll_interval_ms) }
    }
}

impl WatcherConfig {
    pub const fn default_poll_interval_ms() -> u64 { 800 }
}
