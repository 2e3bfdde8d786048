use serde::Deserialize;
use std::path::PathBuf;

/// Upper bound for the parallel apply worker pool.
pub const MAX_CONCURRENCY: usize = 256;

/// Reconciliation settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Parse added/changed definitions on a bounded worker pool instead of one at a time.
    pub parallel: bool,
    /// Size of the worker pool when `parallel` is on.
    pub max_concurrency: usize,
    /// Seconds between two scheduled passes.
    pub interval_seconds: u64,
}

impl LoaderConfig {
    /// `max_concurrency` clamped to `1..=MAX_CONCURRENCY`.
    #[must_use]
    pub fn effective_concurrency(&self) -> usize {
        self.max_concurrency.clamp(1, MAX_CONCURRENCY)
    }

    /// `interval_seconds`, never below one second.
    #[must_use]
    pub fn effective_interval_seconds(&self) -> u64 {
        self.interval_seconds.max(1)
    }
}

/// Logging settings consumed by the daemon.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub env_filter: Option<String>,
    /// Directory for rolling log files; console only when absent.
    pub path: Option<PathBuf>,
    pub json: bool,
}

// --- Default ---

impl Default for LoaderConfig {
    fn default() -> Self {
        Self { parallel: false, max_concurrency: 8, interval_seconds: 30 }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_owned(), env_filter: None, path: None, json: false }
    }
}
