use crate::PROVIDER;
use accord_domain::account::AccountTypes;
use accord_loader::{ParseError, ParseErrorExt};
use accord_registry::AccountCredentials;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::Url;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use std::any::Any;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Authentication settings exactly as configured.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct PrometheusCredentials {
    pub username: Option<String>,
    pub password: Option<String>,
    pub username_password_file: Option<PathBuf>,
}

impl PrometheusCredentials {
    /// Resolves the configured settings to a user/password pair.
    ///
    /// A password file wins over inline settings. Inline settings need a
    /// non-empty username; a missing password is sent as empty.
    ///
    /// # Errors
    /// [`ParseError::Io`] if the file cannot be read, [`ParseError::Invalid`]
    /// if it does not hold `user:password`.
    pub async fn resolve(&self) -> Result<Option<BasicAuth>, ParseError> {
        if let Some(path) = &self.username_password_file {
            let content = tokio::fs::read_to_string(path)
                .await
                .context(format!("Reading {}", path.display()))?;
            return BasicAuth::parse(content.trim()).map(Some);
        }

        Ok(self.username.as_deref().filter(|u| !u.is_empty()).map(|username| BasicAuth {
            username: username.to_owned(),
            password: self.password.clone().unwrap_or_default(),
        }))
    }
}

impl fmt::Debug for PrometheusCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrometheusCredentials")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("username_password_file", &self.username_password_file)
            .finish()
    }
}

/// A resolved user/password pair for HTTP basic auth.
#[derive(Clone, PartialEq, Eq)]
pub struct BasicAuth {
    pub username: String,
    pub password: String,
}

impl BasicAuth {
    /// Parses `user:password`. The password may itself contain `:`.
    ///
    /// # Errors
    /// [`ParseError::Invalid`] when there is no separator or the user is empty.
    pub fn parse(raw: &str) -> Result<Self, ParseError> {
        match raw.split_once(':') {
            Some((username, password)) if !username.is_empty() => {
                Ok(Self { username: username.to_owned(), password: password.to_owned() })
            },
            _ => Err(ParseError::Invalid {
                message: "Expected credentials in the form user:password".into(),
                context: None,
            }),
        }
    }

    fn header_value(&self) -> Result<HeaderValue, ParseError> {
        let token = STANDARD.encode(format!("{}:{}", self.username, self.password));
        let mut value =
            HeaderValue::from_str(&format!("Basic {token}")).map_err(|e| ParseError::Invalid {
                message: e.to_string().into(),
                context: Some("Encoding basic auth header".into()),
            })?;
        value.set_sensitive(true);
        Ok(value)
    }
}

impl fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuth").field("username", &self.username).finish_non_exhaustive()
    }
}

/// HTTP access to a Prometheus server.
#[derive(Debug, Clone)]
pub struct PrometheusRemote {
    base_url: Url,
    client: reqwest::Client,
    authenticated: bool,
}

impl PrometheusRemote {
    pub(crate) fn new(
        base_url: Url,
        auth: Option<&BasicAuth>,
        connect_timeout: Duration,
    ) -> Result<Self, ParseError> {
        let mut headers = HeaderMap::new();
        if let Some(auth) = auth {
            headers.insert(AUTHORIZATION, auth.header_value()?);
        }

        let client = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| ParseError::Provider {
                source: Box::new(e),
                context: Some("Building Prometheus HTTP client".into()),
            })?;

        Ok(Self { base_url, client, authenticated: auth.is_some() })
    }

    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Client with the account's basic auth preset, if any.
    #[must_use]
    pub const fn client(&self) -> &reqwest::Client {
        &self.client
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.authenticated
    }
}

/// A ready-to-use Prometheus account.
#[derive(Debug)]
pub struct PrometheusAccountCredentials {
    pub(crate) name: String,
    pub(crate) endpoint: Url,
    pub(crate) credentials: PrometheusCredentials,
    pub(crate) supported_types: AccountTypes,
    pub(crate) remote: Option<PrometheusRemote>,
}

impl PrometheusAccountCredentials {
    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    #[must_use]
    pub const fn credentials(&self) -> &PrometheusCredentials {
        &self.credentials
    }

    /// Present only for accounts that support `METRICS_STORE`.
    #[must_use]
    pub const fn remote(&self) -> Option<&PrometheusRemote> {
        self.remote.as_ref()
    }
}

impl AccountCredentials for PrometheusAccountCredentials {
    fn name(&self) -> &str {
        &self.name
    }

    fn provider(&self) -> &str {
        PROVIDER
    }

    fn supported_types(&self) -> AccountTypes {
        self.supported_types
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
