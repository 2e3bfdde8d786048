use crate::account::PrometheusManagedAccount;
use crate::credentials::{PrometheusAccountCredentials, PrometheusCredentials, PrometheusRemote};
use accord_domain::account::AccountType;
use accord_loader::{DefinitionParser, ParseError, ParseErrorExt, Parsed};
use reqwest::Url;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Builds [`PrometheusAccountCredentials`] from configured accounts.
///
/// An HTTP client is created only for accounts that support `METRICS_STORE`.
/// The parser never skips: a definition either builds or fails.
#[derive(Debug, Clone)]
pub struct PrometheusParser {
    connect_timeout: Duration,
}

impl PrometheusParser {
    #[must_use]
    pub const fn new() -> Self {
        Self { connect_timeout: DEFAULT_CONNECT_TIMEOUT }
    }

    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// # Errors
    /// [`ParseError::Invalid`] for a malformed endpoint or password file,
    /// [`ParseError::Io`] for an unreadable password file,
    /// [`ParseError::Provider`] if the HTTP client cannot be built.
    pub async fn build(
        &self,
        account: &PrometheusManagedAccount,
    ) -> Result<PrometheusAccountCredentials, ParseError> {
        let endpoint = Url::parse(&account.endpoint).map_err(|e| ParseError::Invalid {
            message: format!("Invalid endpoint '{}': {e}", account.endpoint).into(),
            context: None,
        });
        let endpoint = endpoint.context(account.name.clone())?;

        let credentials = PrometheusCredentials {
            username: account.username.clone(),
            password: account.password.clone(),
            username_password_file: account.username_password_file.clone(),
        };

        let remote = if account.supported_types.contains_type(AccountType::MetricsStore) {
            let auth = credentials.resolve().await?;
            Some(PrometheusRemote::new(endpoint.clone(), auth.as_ref(), self.connect_timeout)?)
        } else {
            None
        };

        debug!(
            account = %account.name,
            endpoint = %endpoint,
            remote = remote.is_some(),
            "Built Prometheus credentials"
        );

        Ok(PrometheusAccountCredentials {
            name: account.name.clone(),
            endpoint,
            credentials,
            supported_types: account.supported_types,
            remote,
        })
    }
}

impl Default for PrometheusParser {
    fn default() -> Self {
        Self::new()
    }
}

impl DefinitionParser<PrometheusManagedAccount> for PrometheusParser {
    fn parse(
        &self,
        definition: &PrometheusManagedAccount,
    ) -> impl Future<Output = Result<Parsed, ParseError>> + Send {
        async move {
            let credentials = self.build(definition).await?;
            Ok(Parsed::Credentials(Arc::new(credentials)))
        }
    }
}
