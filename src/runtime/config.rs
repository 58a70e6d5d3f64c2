//! Runtime configuration.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::logs::DEFAULT_LOG_LIMIT;

/// Configuration for a [`FaunRuntime`](crate::runtime::FaunRuntime).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaunConfig {
    /// Environment variables seeded into every registered function.
    pub env: HashMap<String, String>,
    /// Fixed interval, in milliseconds, between result polls while waiting
    /// for an asynchronous request to reach a terminal state.
    pub result_poll_interval_ms: u64,
    /// Number of log entries returned when a fetch gives no explicit limit.
    pub default_log_limit: usize,
}

impl Default for FaunConfig {
    fn default() -> Self {
        Self {
            env: HashMap::new(),
            result_poll_interval_ms: 1_000,
            default_log_limit: DEFAULT_LOG_LIMIT,
        }
    }
}

impl FaunConfig {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a global environment variable.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Set the result poll interval in milliseconds.
    pub fn result_poll_interval_ms(mut self, interval_ms: u64) -> Self {
        self.result_poll_interval_ms = interval_ms;
        self
    }

    /// Set the default log fetch limit.
    pub fn default_log_limit(mut self, limit: usize) -> Self {
        self.default_log_limit = limit;
        self
    }
}
