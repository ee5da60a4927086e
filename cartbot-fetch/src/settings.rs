//! Backend connection settings.

use std::time::Duration;

use crate::retry::RetryStrategy;

/// Default backend base URL.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

// ============================================================================
// Backend Settings
// ============================================================================

/// Settings for talking to the commerce backend.
#[derive(Clone)]
pub struct BackendSettings {
    /// Base URL every endpoint is resolved against.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Bearer token for authenticated endpoints.
    pub api_token: Option<String>,
    /// Restrict requests to these domains (and their subdomains).
    pub allowed_domains: Option<Vec<String>>,
    /// Retry behavior for transient failures.
    pub retry: RetryStrategy,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            api_token: None,
            allowed_domains: None,
            retry: RetryStrategy::default(),
        }
    }
}

impl BackendSettings {
    /// Creates settings pointing at the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the bearer token.
    pub fn with_api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    /// Restricts requests to the given domains.
    pub fn with_allowed_domains(mut self, domains: Vec<String>) -> Self {
        self.allowed_domains = Some(domains);
        self
    }

    /// Sets the retry strategy.
    pub fn with_retry(mut self, retry: RetryStrategy) -> Self {
        self.retry = retry;
        self
    }
}

impl std::fmt::Debug for BackendSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendSettings")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("api_token", &self.api_token.as_ref().map(|_| "<redacted>"))
            .field("allowed_domains", &self.allowed_domains)
            .field("retry", &self.retry)
            .finish()
    }
}
