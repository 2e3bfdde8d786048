//! Facade crate for Accord.
//! Re-exports the building blocks and wires them together from configuration.
//! Keep this crate thin: it composes other crates, it does not implement reconciliation.
//!
//! ## Usage
//! - Load an [`AccordConfig`](config::AccordConfig) with [`kernel::config::load_config`].
//! - Call [`init`] to get a registry and a loader bound to the same file.
//! - Drive the loader with [`loader::spawn_periodic`] or call `reconcile` yourself.

use accord_loader::{CredentialsLoader, LoaderBuilder};
use accord_prometheus::{ConfigDefinitionSource, PrometheusParser};
use accord_registry::{CredentialsRegistry, FallbackSource};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

pub use accord_domain as domain;
pub use accord_kernel as kernel;
pub use accord_loader as loader;
pub use accord_prometheus as prometheus;
pub use accord_registry as registry;

pub mod config {
    use accord_domain::config::{LoaderConfig, LoggingConfig};
    use accord_prometheus::PrometheusConfig;
    use serde::Deserialize;

    /// Everything the daemon reads from `accord.toml`.
    #[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
    #[serde(default)]
    pub struct AccordConfig {
        pub loader: LoaderConfig,
        pub logging: LoggingConfig,
        pub prometheus: PrometheusConfig,
    }
}

/// Loader that keeps Prometheus accounts in sync with the configuration file.
pub type PrometheusLoader = CredentialsLoader<ConfigDefinitionSource, PrometheusParser>;

/// A registry and the loader feeding it.
#[derive(Debug)]
pub struct Accord {
    pub registry: CredentialsRegistry,
    pub loader: PrometheusLoader,
}

/// Builds the registry over `fallback` and a Prometheus loader that re-reads
/// `config_path` on every pass.
///
/// Nothing is loaded yet; run `reconcile` (or [`loader::spawn_periodic`]) to
/// populate the registry.
#[must_use]
pub fn init(
    config_path: Option<PathBuf>,
    config: &config::AccordConfig,
    fallback: Arc<dyn FallbackSource>,
) -> Accord {
    let registry = CredentialsRegistry::with_fallback(fallback);
    let loader = LoaderBuilder::new()
        .source(ConfigDefinitionSource::new(config_path))
        .parser(PrometheusParser::new())
        .registry(registry.clone())
        .config(&config.loader)
        .build();

    info!(
        mode = %loader.mode(),
        configured_accounts = config.prometheus.accounts.len(),
        "Accord initialized"
    );
    Accord { registry, loader }
}
