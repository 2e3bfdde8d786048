//! # Accord daemon
//!
//! Loads `accord.toml` (or the path given as the first argument), installs the
//! logger, reconciles Prometheus accounts once immediately and then every
//! `loader.interval_seconds`, and stops cleanly on Ctrl+C or SIGTERM.

use accord::config::AccordConfig;
use accord::kernel::config::{DEFAULT_CONFIG, load_config};
use accord::loader::spawn_periodic;
use accord::registry::NoFallback;
use accord_logger::{LevelFilter, Logger};
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tokio::sync::watch;
use tracing::{debug, error, info};

#[derive(Debug, Default)]
pub struct DaemonBuilder {
    config_path: Option<PathBuf>,
}

impl DaemonBuilder {
    /// Configuration file to read; `accord` in the working directory when `None`.
    #[must_use]
    pub fn config_path(mut self, path: Option<PathBuf>) -> Self {
        self.config_path = path;
        self
    }

    /// Reads and validates the configuration.
    ///
    /// # Errors
    /// Fails if the file is missing or does not match [`AccordConfig`].
    pub fn build(self) -> Result<Daemon> {
        let path = self.config_path.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG));
        let config: AccordConfig =
            load_config(Some(&path)).context("Critical: Configuration is malformed")?;
        Ok(Daemon { path, config })
    }
}

#[derive(Debug)]
pub struct Daemon {
    path: PathBuf,
    config: AccordConfig,
}

impl Daemon {
    #[must_use]
    pub fn builder() -> DaemonBuilder {
        DaemonBuilder::default()
    }

    #[must_use]
    pub const fn config(&self) -> &AccordConfig {
        &self.config
    }

    /// Runs until a shutdown signal arrives.
    ///
    /// # Errors
    /// Fails if the logger cannot be installed or the reconciliation task dies.
    pub async fn run(self) -> Result<()> {
        let _log = init_logger(&self.config)?;

        let accord = accord::init(Some(self.path.clone()), &self.config, Arc::new(NoFallback));
        let period = Duration::from_secs(self.config.loader.effective_interval_seconds());
        info!(config = %self.path.display(), period_s = period.as_secs(), "Accord daemon starting");

        let (stop, shutdown) = watch::channel(false);
        let reconciler = spawn_periodic(accord.loader, period, shutdown);

        if let Err(e) = shutdown_signal().await {
            error!("Error while waiting for shutdown signal: {e}");
        }
        info!("Shutdown signal received, finishing the current pass...");

        if stop.send(true).is_err() {
            debug!("Reconciliation loop already stopped");
        }
        let loader = reconciler.await.context("Reconciliation task failed")?;

        info!(
            accounts = accord.registry.len(),
            loaded = loader.loaded().count(),
            "Accord daemon stopped"
        );
        Ok(())
    }
}

fn level(config: &AccordConfig) -> Result<LevelFilter> {
    LevelFilter::from_str(&config.logging.level)
        .with_context(|| format!("Invalid log level '{}'", config.logging.level))
}

fn init_logger(config: &AccordConfig) -> Result<Logger> {
    let logging = &config.logging;
    let mut builder = Logger::builder().name(env!("CARGO_PKG_NAME")).level(level(config)?);
    if let Some(filter) = &logging.env_filter {
        builder = builder.env_filter(filter.clone());
    }

    let logger = match &logging.path {
        Some(dir) => builder.path(dir).json(logging.json).init()?,
        None => builder.init()?,
    };
    Ok(logger)
}

async fn shutdown_signal() -> Result<()> {
    let ctrl_c = async { signal::ctrl_c().await.context("Failed to install Ctrl+C handler") };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .context("Failed to install SIGTERM handler")?
            .recv()
            .await;
        Ok::<_, anyhow::Error>(())
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<Result<()>>();

    tokio::select! {
        res = ctrl_c => res,
        res = terminate => res,
    }
}
