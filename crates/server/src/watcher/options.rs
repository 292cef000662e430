use std::time::Duration;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(800);

#[derive(Clone, Copy, Debug)]
pub struct Options {
    pub poll_interval: Duration,
}

impl Default for Options {
    fn default() -> Self { Self { poll_interval: DEFAULT_POLL_INTERVAL } }
}
