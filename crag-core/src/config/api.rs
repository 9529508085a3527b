//! Backend API configuration

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Backend API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the catalog API
    /// Env: CRAG_API_URL
    /// Default: "http://localhost:8000"
    pub base_url: String,

    /// Whole-request timeout in seconds
    /// Env: CRAG_REQUEST_TIMEOUT
    /// Default: 30
    pub request_timeout: u64,

    /// Connect timeout in seconds
    /// Env: CRAG_CONNECT_TIMEOUT
    /// Default: 10
    pub connect_timeout: u64,

    /// Retries for idempotent GETs on network errors and 5xx
    /// Env: CRAG_MAX_RETRIES
    /// Default: 2
    pub max_retries: u32,

    /// First retry delay in milliseconds, doubled on each attempt
    /// Env: CRAG_RETRY_DELAY_MS
    /// Default: 200
    pub retry_base_delay_ms: u64,

    /// Rows per index page
    /// Env: CRAG_PAGE_SIZE
    /// Default: 25
    pub page_size: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            request_timeout: 30,
            connect_timeout: 10,
            max_retries: 2,
            retry_base_delay_ms: 200,
            page_size: 25,
        }
    }
}

impl ApiConfig {
    pub fn merge(&mut self, other: Self) {
        self.base_url = other.base_url;
        self.request_timeout = other.request_timeout;
        self.connect_timeout = other.connect_timeout;
        self.max_retries = other.max_retries;
        self.retry_base_delay_ms = other.retry_base_delay_ms;
        self.page_size = other.page_size;
    }

    pub fn apply_env_vars(&mut self) {
        if let Ok(url) = env::var("CRAG_API_URL") {
            self.base_url = url;
        }

        if let Ok(timeout) = env::var("CRAG_REQUEST_TIMEOUT") {
            if let Ok(t) = timeout.parse() {
                self.request_timeout = t;
            }
        }

        if let Ok(timeout) = env::var("CRAG_CONNECT_TIMEOUT") {
            if let Ok(t) = timeout.parse() {
                self.connect_timeout = t;
            }
        }

        if let Ok(retries) = env::var("CRAG_MAX_RETRIES") {
            if let Ok(r) = retries.parse() {
                self.max_retries = r;
            }
        }

        if let Ok(delay) = env::var("CRAG_RETRY_DELAY_MS") {
            if let Ok(d) = delay.parse() {
                self.retry_base_delay_ms = d;
            }
        }

        if let Ok(size) = env::var("CRAG_PAGE_SIZE") {
            if let Ok(s) = size.parse() {
                self.page_size = s;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            bail!("Invalid base_url \"{}\": must start with http:// or https://", self.base_url);
        }

        if self.request_timeout == 0 {
            bail!("Invalid request_timeout: must be greater than 0");
        }

        if self.connect_timeout == 0 {
            bail!("Invalid connect_timeout: must be greater than 0");
        }

        if self.page_size == 0 {
            bail!("Invalid page_size: must be greater than 0");
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout)
    }

    /// Delay before retry number `attempt` (1-based)
    pub fn retry_delay(&self, attempt: u32) -> Duration {
        let factor = 1u64 << attempt.saturating_sub(1).min(10);
        Duration::from_millis(self.retry_base_delay_ms.saturating_mul(factor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation() {
        assert!(ApiConfig::default().validate().is_ok());

        let config = ApiConfig { base_url: "localhost:8000".into(), ..ApiConfig::default() };
        assert!(config.validate().is_err());

        let config = ApiConfig { page_size: 0, ..ApiConfig::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_retry_delay_doubles() {
        let config = ApiConfig { retry_base_delay_ms: 100, ..ApiConfig::default() };
        assert_eq!(config.retry_delay(1), Duration::from_millis(100));
        assert_eq!(config.retry_delay(2), Duration::from_millis(200));
        assert_eq!(config.retry_delay(3), Duration::from_millis(400));
    }
}
