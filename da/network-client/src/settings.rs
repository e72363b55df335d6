// std
use std::time::Duration;
// crates
use serde::{Deserialize, Serialize};

/// Bounded exponential backoff applied to transient network failures.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrySettings {
    /// Upper bound on attempts of a single phase (submission, status polling or retrieval).
    pub max_attempts: u32,
    #[serde(with = "humantime_serde")]
    pub initial_backoff: Duration,
    #[serde(with = "humantime_serde")]
    pub max_backoff: Duration,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(10),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaClientSettings {
    #[serde(with = "humantime_serde")]
    pub poll_interval: Duration,
    #[serde(with = "humantime_serde")]
    pub dispersal_timeout: Duration,
    #[serde(with = "humantime_serde")]
    pub retrieval_timeout: Duration,
    #[serde(default)]
    pub retry: RetrySettings,
    /// Keep polling a confirmed blob until the network reports it as finalized.
    #[serde(default)]
    pub wait_for_finalization: bool,
}

impl DaClientSettings {
    pub(crate) fn max_attempts(&self) -> u32 {
        self.retry.max_attempts.max(1)
    }
}

impl Default for DaClientSettings {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(5),
            dispersal_timeout: Duration::from_secs(10 * 60),
            retrieval_timeout: Duration::from_secs(30),
            retry: RetrySettings::default(),
            wait_for_finalization: false,
        }
    }
}
