use accord_domain::config::{LoaderConfig, MAX_CONCURRENCY};
use std::fmt;

/// How added and changed definitions are parsed during a pass.
///
/// Both modes leave the registry in the same state: every parse targets a
/// distinct name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApplyMode {
    /// One definition at a time.
    #[default]
    Sequential,
    /// Up to `max_concurrency` parses in flight, completion order unspecified.
    Parallel { max_concurrency: usize },
}

impl ApplyMode {
    /// A parallel mode with the pool size clamped to `1..=MAX_CONCURRENCY`.
    #[must_use]
    pub fn parallel(max_concurrency: usize) -> Self {
        Self::Parallel { max_concurrency: max_concurrency.clamp(1, MAX_CONCURRENCY) }
    }
}

impl From<&LoaderConfig> for ApplyMode {
    fn from(config: &LoaderConfig) -> Self {
        if config.parallel { Self::parallel(config.effective_concurrency()) } else { Self::Sequential }
    }
}

impl fmt::Display for ApplyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sequential => f.write_str("sequential"),
            Self::Parallel { max_concurrency } => write!(f, "parallel({max_concurrency})"),
        }
    }
}
