//! Configuration Types
//!
//! Serializable configuration with validated defaults. The API key is never
//! serialized to output and is redacted in debug output.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::ai::RetryPolicy;
use crate::constants::{network, retry, tokens};
use crate::types::{QuillError, Result};

/// Top-level application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub retry: RetryConfig,
}

impl Config {
    /// Reject nonsensical values after loading
    pub fn validate(&self) -> Result<()> {
        if self.api.model.trim().is_empty() {
            return Err(QuillError::Config("api.model must not be empty".into()));
        }
        if self.api.timeout_secs == 0 {
            return Err(QuillError::Config("api.timeout_secs must be > 0".into()));
        }
        if self.api.max_tokens == 0 {
            return Err(QuillError::Config("api.max_tokens must be > 0".into()));
        }
        if self.retry.max_attempts == 0 {
            return Err(QuillError::Config("retry.max_attempts must be >= 1".into()));
        }
        if self.retry.backoff_factor < 1.0 {
            return Err(QuillError::Config(
                "retry.backoff_factor must be >= 1".into(),
            ));
        }
        Ok(())
    }
}

/// Remote service configuration
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// API base URL
    pub api_base: String,
    /// Model name
    pub model: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Default maximum output tokens
    pub max_tokens: u32,
    /// Sampling temperature (0.0 = deterministic)
    pub temperature: f32,
    /// API key. Never serialized to output for security.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_base: network::DEFAULT_API_BASE.to_string(),
            model: network::DEFAULT_MODEL.to_string(),
            timeout_secs: network::DEFAULT_TIMEOUT_SECS,
            max_tokens: tokens::DEFAULT_MAX_TOKENS,
            temperature: network::DEFAULT_TEMPERATURE,
            api_key: None,
        }
    }
}

/// Retry policy configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum attempts per operation
    pub max_attempts: u32,
    /// Delay before the first retry (milliseconds)
    pub initial_delay_ms: u64,
    /// Backoff multiplier
    pub backoff_factor: f64,
    /// Optional ceiling on the backoff delay (milliseconds)
    pub max_delay_ms: Option<u64>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: retry::DEFAULT_MAX_ATTEMPTS,
            initial_delay_ms: retry::DEFAULT_INITIAL_DELAY_MS,
            backoff_factor: retry::DEFAULT_BACKOFF_FACTOR,
            max_delay_ms: None,
        }
    }
}

impl RetryConfig {
    /// Build the runtime retry policy
    pub fn policy(&self) -> RetryPolicy {
        let policy = RetryPolicy::new(
            self.max_attempts,
            Duration::from_millis(self.initial_delay_ms),
            self.backoff_factor,
        );
        match self.max_delay_ms {
            Some(cap) => policy.with_max_delay(Duration::from_millis(cap)),
            None => policy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.api.max_tokens, 4000);
        assert_eq!(config.retry.max_attempts, 3);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.retry.max_attempts = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.api.model = "  ".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.retry.backoff_factor = 0.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_retry_config_to_policy() {
        let config = RetryConfig {
            max_attempts: 5,
            initial_delay_ms: 250,
            backoff_factor: 3.0,
            max_delay_ms: Some(10_000),
        };
        let policy = config.policy();
        assert_eq!(policy.max_attempts, 5);
        assert_eq!(policy.initial_delay, Duration::from_millis(250));
        assert_eq!(policy.backoff_factor, 3.0);
        assert_eq!(policy.max_delay, Some(Duration::from_secs(10)));
    }

    #[test]
    fn test_api_key_not_serialized() {
        let config = ApiConfig {
            api_key: Some("sk-secret".to_string()),
            ..ApiConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("sk-secret"));

        let debug = format!("{:?}", config);
        assert!(debug.contains("[REDACTED]"));
    }
}
