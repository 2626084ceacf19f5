use std::time::Duration;

use figment::Figment;
use figment::providers::{Env, Serialized};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::error::ClientError;

/// Default Gremlin API endpoint.
pub const DEFAULT_BASE_URI: &str = "https://api.gremlin.com/v1";

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const ENV_PREFIX: &str = "GREMLIN_";

/// Credentials used to build the `Authorization` header.
///
/// Empty strings are treated the same as absent values.
#[derive(Debug, Clone, Default)]
pub struct AuthConfig {
    pub api_key: Option<SecretString>,
    pub bearer_token: Option<SecretString>,
}

impl AuthConfig {
    /// Credentials consisting of an API key only.
    #[must_use]
    pub fn api_key(key: impl Into<String>) -> Self {
        Self {
            api_key: Some(SecretString::from(key.into())),
            bearer_token: None,
        }
    }

    /// Credentials consisting of a bearer token only.
    #[must_use]
    pub fn bearer_token(token: impl Into<String>) -> Self {
        Self {
            api_key: None,
            bearer_token: Some(SecretString::from(token.into())),
        }
    }

    /// Fill every field missing here from `fallback`.
    ///
    /// Used to merge a call-site override over the process-wide configuration.
    #[must_use]
    pub fn or(self, fallback: &Self) -> Self {
        Self {
            api_key: self.api_key.or_else(|| fallback.api_key.clone()),
            bearer_token: self.bearer_token.or_else(|| fallback.bearer_token.clone()),
        }
    }

    pub(crate) fn api_key_str(&self) -> Option<&str> {
        non_empty(self.api_key.as_ref())
    }

    pub(crate) fn bearer_token_str(&self) -> Option<&str> {
        non_empty(self.bearer_token.as_ref())
    }
}

fn non_empty(secret: Option<&SecretString>) -> Option<&str> {
    secret.map(ExposeSecret::expose_secret).filter(|s| !s.is_empty())
}

/// Configuration for [`GremlinClient`](crate::GremlinClient)
#[derive(Debug, Clone)]
pub struct GremlinApiConfig {
    /// Prefix every endpoint is appended to.
    pub base_uri: String,
    pub auth: AuthConfig,
    /// Request timeout handed to the transport backend.
    pub timeout: Duration,
}

impl Default for GremlinApiConfig {
    fn default() -> Self {
        Self {
            base_uri: DEFAULT_BASE_URI.to_owned(),
            auth: AuthConfig::default(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// Flat, serializable shape of the configuration as seen by figment.
#[derive(Debug, Serialize, Deserialize)]
struct ConfigFile {
    base_uri: String,
    api_key: Option<String>,
    bearer_token: Option<String>,
    timeout_secs: u64,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            base_uri: DEFAULT_BASE_URI.to_owned(),
            api_key: None,
            bearer_token: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl From<ConfigFile> for GremlinApiConfig {
    fn from(file: ConfigFile) -> Self {
        Self {
            base_uri: file.base_uri,
            auth: AuthConfig {
                api_key: file.api_key.map(SecretString::from),
                bearer_token: file.bearer_token.map(SecretString::from),
            },
            timeout: Duration::from_secs(file.timeout_secs),
        }
    }
}

impl GremlinApiConfig {
    /// Create configuration for the given base URI without credentials
    #[must_use]
    pub fn new(base_uri: impl Into<String>) -> Self {
        Self {
            base_uri: base_uri.into(),
            ..Self::default()
        }
    }

    /// Set the credentials
    #[must_use]
    pub fn with_auth(mut self, auth: AuthConfig) -> Self {
        self.auth = auth;
        self
    }

    /// Set the backend request timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Create configuration from environment variables
    ///
    /// Reads:
    /// - `GREMLIN_BASE_URI` (default: `https://api.gremlin.com/v1`)
    /// - `GREMLIN_API_KEY`
    /// - `GREMLIN_BEARER_TOKEN`
    /// - `GREMLIN_TIMEOUT_SECS` (default: 30)
    ///
    /// # Errors
    /// Returns `ClientError::Config` if a variable has the wrong type.
    pub fn from_env() -> Result<Self, ClientError> {
        let file: ConfigFile = Figment::from(Serialized::defaults(ConfigFile::default()))
            .merge(Env::prefixed(ENV_PREFIX))
            .extract()?;
        Ok(file.into())
    }
}
