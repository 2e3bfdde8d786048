use accord_domain::account::AccountTypes;
use accord_loader::CredentialsDefinition;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// One `[[prometheus.accounts]]` entry.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrometheusManagedAccount {
    pub name: String,
    /// Base URL of the Prometheus HTTP API.
    pub endpoint: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    /// File holding `user:password`; takes precedence over `username`/`password`.
    #[serde(default)]
    pub username_password_file: Option<PathBuf>,
    #[serde(default)]
    pub supported_types: AccountTypes,
}

impl PrometheusManagedAccount {
    #[must_use]
    pub fn new(name: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            endpoint: endpoint.into(),
            username: None,
            password: None,
            username_password_file: None,
            supported_types: AccountTypes::empty(),
        }
    }

    #[must_use]
    pub fn with_types(mut self, supported_types: impl Into<AccountTypes>) -> Self {
        self.supported_types = supported_types.into();
        self
    }

    #[must_use]
    pub fn with_basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    #[must_use]
    pub fn with_password_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.username_password_file = Some(path.into());
        self
    }
}

impl CredentialsDefinition for PrometheusManagedAccount {
    fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for PrometheusManagedAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrometheusManagedAccount")
            .field("name", &self.name)
            .field("endpoint", &self.endpoint)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("username_password_file", &self.username_password_file)
            .field("supported_types", &self.supported_types)
            .finish()
    }
}

/// The `[prometheus]` configuration section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrometheusConfig {
    pub accounts: Vec<PrometheusManagedAccount>,
}
