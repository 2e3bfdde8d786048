use crate::account::{PrometheusConfig, PrometheusManagedAccount};
use accord_kernel::config::load_config;
use accord_loader::{DefinitionSource, SourceError, SourceErrorExt};
use serde::Deserialize;
use std::path::PathBuf;
use tracing::trace;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Document {
    prometheus: PrometheusConfig,
}

/// Lists the `[prometheus]` accounts of a configuration file.
///
/// The file (plus `ACCORD__` environment overrides) is read again on every
/// fetch, so edits show up on the next reconciliation pass.
#[derive(Debug, Clone)]
pub struct ConfigDefinitionSource {
    path: Option<PathBuf>,
}

impl ConfigDefinitionSource {
    /// Reads `path`, or the default `accord` file when `None`.
    #[must_use]
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    async fn read(&self) -> Result<Vec<PrometheusManagedAccount>, SourceError> {
        let path = self.path.clone();
        let loaded = tokio::task::spawn_blocking(move || load_config::<Document>(path))
            .await
            .map_err(|e| SourceError::Internal {
                message: e.to_string().into(),
                context: Some("Configuration reader task".into()),
            })?;

        let document = loaded
            .map_err(|e| SourceError::Unavailable { source: Box::new(e), context: None })
            .context("Reading Prometheus accounts")?;
        trace!(accounts = document.prometheus.accounts.len(), "Fetched Prometheus accounts");
        Ok(document.prometheus.accounts)
    }
}

impl DefinitionSource for ConfigDefinitionSource {
    type Definition = PrometheusManagedAccount;

    fn fetch_all(
        &self,
    ) -> impl Future<Output = Result<Vec<PrometheusManagedAccount>, SourceError>> + Send {
        self.read()
    }
}
