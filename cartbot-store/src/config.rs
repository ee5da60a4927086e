//! Configuration management.
//!
//! Stored as JSON at [`default_config_path`]. Every field has a default, so
//! a partial file (or no file at all) is valid.

use std::path::Path;
use std::time::Duration;

use cartbot_assistant::AssistantSettings;
use cartbot_fetch::{BackendSettings, RetryStrategy, DEFAULT_BASE_URL};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::StoreError;
use crate::persistence::{default_config_path, load_json, save_json};

/// Environment variable consulted for the API token by default.
pub const DEFAULT_API_TOKEN_ENV: &str = "CARTBOT_API_TOKEN";

// ============================================================================
// Config Types
// ============================================================================

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Commerce backend connection.
    #[serde(default)]
    pub backend: BackendConfig,
    /// Recommendation pipeline tuning.
    #[serde(default)]
    pub assistant: AssistantConfig,
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,
}

/// Commerce backend connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the REST API.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Environment variable that holds the bearer token.
    #[serde(default = "default_api_token_env")]
    pub api_token_env: String,
    /// Restrict requests to these domains. Empty allows any.
    #[serde(default)]
    pub allowed_domains: Vec<String>,
    /// Attempts per request, including the first.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

/// Recommendation pipeline tuning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistantConfig {
    /// Replaces the built-in greeting shown for empty replies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_greeting: Option<String>,
    /// Per-lookup timeout in seconds; 0 disables it.
    #[serde(default = "default_lookup_timeout_secs")]
    pub lookup_timeout_secs: u64,
}

/// General settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Turns kept in an interactive chat transcript.
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_api_token_env() -> String {
    DEFAULT_API_TOKEN_ENV.to_string()
}

fn default_max_attempts() -> u32 {
    3
}

fn default_lookup_timeout_secs() -> u64 {
    15
}

fn default_history_limit() -> usize {
    100
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            api_token_env: default_api_token_env(),
            allowed_domains: Vec::new(),
            max_attempts: default_max_attempts(),
        }
    }
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            fallback_greeting: None,
            lookup_timeout_secs: default_lookup_timeout_secs(),
        }
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            history_limit: default_history_limit(),
        }
    }
}

// ============================================================================
// Loading and Saving
// ============================================================================

impl Config {
    /// Loads configuration from the default path.
    pub async fn load() -> Result<Self, StoreError> {
        Self::load_from(&default_config_path()).await
    }

    /// Loads configuration from a specific path.
    ///
    /// A missing file yields the defaults; an invalid one is an error.
    pub async fn load_from(path: &Path) -> Result<Self, StoreError> {
        let config: Config = match load_json(path).await {
            Ok(config) => config,
            Err(e) if e.is_not_found() => {
                debug!(path = %path.display(), "Config file not found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(e),
        };

        config.validate()?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Saves configuration to the default path.
    pub async fn save(&self) -> Result<(), StoreError> {
        self.save_to(&default_config_path()).await
    }

    /// Saves configuration to a specific path.
    pub async fn save_to(&self, path: &Path) -> Result<(), StoreError> {
        save_json(path, self).await?;
        info!(path = %path.display(), "Saved configuration");
        Ok(())
    }

    /// Checks values that serde alone can't reject.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.backend.base_url.trim().is_empty() {
            return Err(StoreError::Config("backend.base_url is empty".to_string()));
        }
        if self.backend.timeout_secs == 0 {
            return Err(StoreError::Config(
                "backend.timeout_secs must be positive".to_string(),
            ));
        }
        if self.backend.max_attempts == 0 {
            return Err(StoreError::Config(
                "backend.max_attempts must be positive".to_string(),
            ));
        }
        Ok(())
    }

    // ========================================================================
    // Runtime Settings
    // ========================================================================

    /// Builds backend settings, reading the token from the process environment.
    pub fn backend_settings(&self) -> BackendSettings {
        self.backend_settings_with_env(|name| std::env::var(name).ok())
    }

    /// Builds backend settings with a custom environment lookup.
    pub fn backend_settings_with_env(
        &self,
        env: impl Fn(&str) -> Option<String>,
    ) -> BackendSettings {
        let backend = &self.backend;
        let mut settings = BackendSettings::new(backend.base_url.clone())
            .with_timeout(Duration::from_secs(backend.timeout_secs))
            .with_retry(RetryStrategy::new(backend.max_attempts));

        if !backend.allowed_domains.is_empty() {
            settings = settings.with_allowed_domains(backend.allowed_domains.clone());
        }

        match env(&backend.api_token_env).filter(|token| !token.trim().is_empty()) {
            Some(token) => settings = settings.with_api_token(token),
            None => debug!(var = %backend.api_token_env, "No API token in environment"),
        }

        settings
    }

    /// Builds assistant settings.
    pub fn assistant_settings(&self) -> AssistantSettings {
        let assistant = &self.assistant;
        let timeout = (assistant.lookup_timeout_secs > 0)
            .then(|| Duration::from_secs(assistant.lookup_timeout_secs));

        let settings = AssistantSettings::default().with_lookup_timeout(timeout);
        match &assistant.fallback_greeting {
            Some(greeting) => settings.with_fallback_greeting(greeting.clone()),
            None => settings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"backend": {"base_url": "https://shop.example.com/api"}}"#)
                .unwrap();
        assert_eq!(config.backend.base_url, "https://shop.example.com/api");
        assert_eq!(config.backend.timeout_secs, 30);
        assert_eq!(config.backend.api_token_env, DEFAULT_API_TOKEN_ENV);
        assert_eq!(config.assistant, AssistantConfig::default());
    }

    #[test]
    fn test_backend_settings_reads_named_variable() {
        let mut config = Config::default();
        config.backend.api_token_env = "SHOP_TOKEN".to_string();
        config.backend.allowed_domains = vec!["shop.example.com".to_string()];

        let settings = config.backend_settings_with_env(|name| {
            (name == "SHOP_TOKEN").then(|| "abc".to_string())
        });
        assert_eq!(settings.api_token.as_deref(), Some("abc"));
        assert_eq!(
            settings.allowed_domains,
            Some(vec!["shop.example.com".to_string()])
        );
        assert_eq!(settings.retry.max_attempts, 3);
    }

    #[test]
    fn test_blank_token_is_ignored() {
        let settings = Config::default().backend_settings_with_env(|_| Some("  ".to_string()));
        assert!(settings.api_token.is_none());
        assert!(settings.allowed_domains.is_none());
    }

    #[test]
    fn test_assistant_settings() {
        let mut config = Config::default();
        assert_eq!(
            config.assistant_settings().lookup_timeout,
            Some(Duration::from_secs(15))
        );

        config.assistant.lookup_timeout_secs = 0;
        config.assistant.fallback_greeting = Some("Hey there".to_string());
        let settings = config.assistant_settings();
        assert_eq!(settings.lookup_timeout, None);
        assert_eq!(settings.fallback_greeting, "Hey there");
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = Config::default();
        config.backend.timeout_secs = 0;
        assert!(matches!(config.validate(), Err(StoreError::Config(_))));
    }
}
