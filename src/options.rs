//! Transport configuration shared by both clients.

use std::collections::HashMap;
use std::time::Duration;

use crate::client::ClientError;

/// Base URL of the remote API, without a trailing slash.
pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

const API_KEY_VAR: &str = "OPENAI_API_KEY";
const BASE_URL_VAR: &str = "OPENAI_BASE_URL";

/// A secret string type for sensitive data like API keys.
/// Prevents accidental logging or display of secrets.
#[derive(Clone)]
pub struct SecretString(String);

impl SecretString {
    /// Create a new secret string.
    pub fn new(s: String) -> Self {
        Self(s)
    }

    /// Get the underlying secret value.
    pub fn expose_secret(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for SecretString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecretString([REDACTED])")
    }
}

impl From<String> for SecretString {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for SecretString {
    fn from(s: &str) -> Self {
        Self::new(s.to_string())
    }
}

/// Everything a client needs to reach the API.
///
/// # Example
/// ```rust
/// use oai_client::options::TransportOptions;
/// use std::time::Duration;
///
/// let options = TransportOptions::new("sk-...")
///     .with_base_url("http://localhost:8080/v1".to_string())
///     .with_timeout(Duration::from_secs(30));
/// assert_eq!(options.api_base(), "http://localhost:8080/v1");
/// ```
#[derive(Debug, Clone)]
pub struct TransportOptions {
    /// API key sent as `Authorization: Bearer <key>`
    pub api_key: SecretString,

    /// Base URL for API endpoints, defaults to [`DEFAULT_API_BASE`]
    pub base_url: Option<String>,

    /// Whole-request timeout; unset means no timeout
    pub timeout: Option<Duration>,

    /// HTTP proxy URL
    pub proxy: Option<String>,

    /// Additional HTTP headers to include in requests
    pub extra_headers: Option<HashMap<String, String>>,
}

impl TransportOptions {
    /// Create transport options with an API key and defaults for everything else.
    pub fn new(api_key: impl Into<SecretString>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: None,
            timeout: None,
            proxy: None,
            extra_headers: None,
        }
    }

    /// Read `OPENAI_API_KEY` and, if set, `OPENAI_BASE_URL` from the environment.
    pub fn from_env() -> Result<Self, ClientError> {
        let api_key = std::env::var(API_KEY_VAR)
            .map_err(|_| ClientError::Config(format!("{API_KEY_VAR} is not set")))?;

        let mut options = Self::new(api_key);
        if let Ok(base_url) = std::env::var(BASE_URL_VAR) {
            options.base_url = Some(base_url);
        }
        Ok(options)
    }

    /// The base URL requests are joined onto.
    pub fn api_base(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_API_BASE)
    }

    /// Set the base URL.
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = Some(base_url);
        self
    }

    /// Set the timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the proxy URL.
    pub fn with_proxy(mut self, proxy: String) -> Self {
        self.proxy = Some(proxy);
        self
    }

    /// Set extra headers.
    pub fn with_extra_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.extra_headers = Some(headers);
        self
    }

    /// Add a single extra header.
    pub fn with_header(mut self, key: String, value: String) -> Self {
        self.extra_headers
            .get_or_insert_with(HashMap::new)
            .insert(key, value);
        self
    }
}
