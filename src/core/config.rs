use std::env;
use std::fmt;
use std::time::Duration;

use url::Url;

use crate::errors::RelayError;

pub const DEFAULT_HOST: &str = "open.volcengineapi.com";
pub const DEFAULT_REGION: &str = "cn-north-1";
pub const DEFAULT_SERVICE: &str = "doubao";
pub const DEFAULT_MODEL: &str = "doubao-pro";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const CHAT_COMPLETIONS_PATH: &str = "/api/v1/chat/completions";
pub const TEMPERATURE: f64 = 0.7;
pub const MAX_TOKENS: u32 = 2000;

/// Access key pair used to sign upstream requests.
#[derive(Clone)]
pub struct Credentials {
    pub access_key: String,
    pub secret_key: String,
}

impl Credentials {
    #[must_use]
    pub fn new(access_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            access_key: access_key.into(),
            secret_key: secret_key.into(),
        }
    }
}

// Keys must never reach the logs, even through `{:?}`.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key", &"<redacted>")
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

/// Where and under which scope the chat-completion request is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub host: String,
    pub path: String,
    pub region: String,
    pub service: String,
}

impl Endpoint {
    /// # Errors
    ///
    /// Returns [`RelayError::Config`] if host and path do not form a valid URL, or if
    /// the URL would not carry exactly the host and path that get signed.
    pub fn url(&self) -> Result<Url, RelayError> {
        let url = Url::parse(&format!("https://{}{}", self.host, self.path))
            .map_err(|e| RelayError::Config(format!("VOLC_HOST: {e}")))?;

        let authority = match (url.host_str(), url.port()) {
            (Some(host), Some(port)) => format!("{host}:{port}"),
            (Some(host), None) => host.to_string(),
            (None, _) => String::new(),
        };
        if authority != self.host || url.path() != self.path || url.query().is_some() {
            return Err(RelayError::Config(format!(
                "VOLC_HOST: {:?} is not a plain host[:port]",
                self.host
            )));
        }
        Ok(url)
    }
}

impl Default for Endpoint {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            path: CHAT_COMPLETIONS_PATH.to_string(),
            region: DEFAULT_REGION.to_string(),
            service: DEFAULT_SERVICE.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub credentials: Credentials,
    pub endpoint: Endpoint,
    pub model: String,
    pub request_timeout: Duration,
}

impl AppConfig {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Config`] naming the first missing or malformed variable.
    pub fn from_env() -> Result<Self, RelayError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Config`] naming the first missing or malformed variable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, RelayError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| {
            lookup(name)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| RelayError::Config(format!("{name} is not set")))
        };
        let optional = |name: &str, default: &str| {
            lookup(name)
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let request_timeout = match lookup("UPSTREAM_TIMEOUT_SECS").filter(|v| !v.is_empty()) {
            Some(raw) => {
                let secs = raw.trim().parse::<u64>().map_err(|e| {
                    RelayError::Config(format!("UPSTREAM_TIMEOUT_SECS: {e}"))
                })?;
                if secs == 0 {
                    return Err(RelayError::Config(
                        "UPSTREAM_TIMEOUT_SECS: must be greater than zero".to_string(),
                    ));
                }
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        let endpoint = Endpoint {
            host: optional("VOLC_HOST", DEFAULT_HOST),
            path: CHAT_COMPLETIONS_PATH.to_string(),
            region: optional("VOLC_REGION", DEFAULT_REGION),
            service: optional("VOLC_SERVICE", DEFAULT_SERVICE),
        };
        endpoint.url()?;

        Ok(Self {
            credentials: Credentials::new(required("VOLC_AK")?, required("VOLC_SK")?),
            endpoint,
            model: optional("DOUBAO_MODEL", DEFAULT_MODEL),
            request_timeout,
        })
    }
}
