//! # Prometheus accounts
//!
//! Turns `[[prometheus.accounts]]` configuration entries into live
//! credentials. Plug [`ConfigDefinitionSource`] and [`PrometheusParser`] into
//! an [`accord_loader::CredentialsLoader`] to keep a registry in sync with
//! the configuration file.
//!
//! ```toml
//! [[prometheus.accounts]]
//! name = "prod"
//! endpoint = "https://prometheus.example.com"
//! username_password_file = "/run/secrets/prometheus"
//! supported_types = ["METRICS_STORE"]
//! ```

mod account;
mod credentials;
mod parser;
mod source;

pub use crate::account::{PrometheusConfig, PrometheusManagedAccount};
pub use crate::credentials::{
    BasicAuth, PrometheusAccountCredentials, PrometheusCredentials, PrometheusRemote,
};
pub use crate::parser::PrometheusParser;
pub use crate::source::ConfigDefinitionSource;

/// Provider tag reported by Prometheus credentials.
pub const PROVIDER: &str = "prometheus";
