//! Runtime configuration.

use std::time::Duration;

/// Tunables for the polling and replacement machinery.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Delay between batch monitor iterations.
    pub poll_interval: Duration,
    /// Locations per monitor batch.
    pub batch_size: usize,
    /// Concurrency cap for the bulk item-lot replacement job.
    pub replacement_workers: usize,
    /// Polling cadence of the goal-completion watch.
    pub goal_poll_interval: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(500),
            batch_size: 25,
            replacement_workers: 8,
            goal_poll_interval: Duration::from_millis(500),
        }
    }
}

impl ClientConfig {
    /// Load from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            poll_interval: env_millis("DSAP_POLL_INTERVAL_MS").unwrap_or(defaults.poll_interval),
            batch_size: env_parse("DSAP_BATCH_SIZE").unwrap_or(defaults.batch_size),
            replacement_workers: env_parse("DSAP_REPLACEMENT_WORKERS")
                .unwrap_or(defaults.replacement_workers),
            goal_poll_interval: env_millis("DSAP_GOAL_POLL_INTERVAL_MS")
                .unwrap_or(defaults.goal_poll_interval),
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|s| s.parse().ok())
}

fn env_millis(key: &str) -> Option<Duration> {
    env_parse::<u64>(key).map(Duration::from_millis)
}
