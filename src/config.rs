//! Client settings file
//!
//! HTTP transport settings loaded from YAML, e.g.:
//!
//! ```yaml
//! base_url: https://www.virustotal.com/api/v3
//! headers:
//!   x-apikey: "..."
//! timeout_secs: 60
//! max_retries: 2
//! backoff: linear
//! requests_per_second: 4
//! burst_size: 4
//! ```
//!
//! Every field is optional; omitted fields keep the client defaults.

use crate::error::{Error, Result, ResultExt};
use crate::http::{HttpClientConfig, RateLimiterConfig};
use crate::types::BackoffType;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

/// HTTP client settings as written in a settings file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientSettings {
    /// Base URL for relative page links
    #[serde(default)]
    pub base_url: Option<String>,

    /// Headers sent with every request
    #[serde(default)]
    pub headers: HashMap<String, String>,

    /// Request timeout in seconds
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Transport-level retries for transient failures
    #[serde(default)]
    pub max_retries: Option<u32>,

    /// Backoff strategy between retries
    #[serde(default)]
    pub backoff: Option<BackoffType>,

    /// Rate limit; `0` disables rate limiting
    #[serde(default)]
    pub requests_per_second: Option<u32>,

    /// Rate limiter burst size (defaults to `requests_per_second`)
    #[serde(default)]
    pub burst_size: Option<u32>,

    /// User agent override
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl ClientSettings {
    /// Parse settings from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let settings: Self = serde_yaml::from_str(yaml)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_yaml(&contents)
    }

    fn validate(&self) -> Result<()> {
        if self.timeout_secs == Some(0) {
            return Err(Error::invalid_value("timeout_secs", "must be positive"));
        }
        if let Some(base_url) = &self.base_url {
            url::Url::parse(base_url)
                .map_err(|e| Error::invalid_value("base_url", e.to_string()))?;
        }
        Ok(())
    }

    /// Build an HTTP client config on top of the defaults
    pub fn to_http_config(&self) -> HttpClientConfig {
        let defaults = HttpClientConfig::default();
        let mut builder = HttpClientConfig::builder();

        if let Some(base_url) = &self.base_url {
            builder = builder.base_url(base_url.clone());
        }
        for (key, value) in &self.headers {
            builder = builder.header(key.clone(), value.clone());
        }
        if let Some(secs) = self.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        if let Some(retries) = self.max_retries {
            builder = builder.max_retries(retries);
        }
        if let Some(backoff) = self.backoff {
            builder = builder.backoff(backoff, defaults.initial_backoff, defaults.max_backoff);
        }
        builder = match (self.requests_per_second, self.burst_size) {
            (Some(0), _) => builder.no_rate_limit(),
            (Some(rps), burst) => {
                builder.rate_limit(RateLimiterConfig::new(rps, burst.unwrap_or(rps)))
            }
            (None, Some(burst)) => builder.rate_limit(RateLimiterConfig {
                burst_size: burst,
                ..RateLimiterConfig::default()
            }),
            (None, None) => builder,
        };
        if let Some(agent) = &self.user_agent {
            builder = builder.user_agent(agent.clone());
        }

        builder.build()
    }
}
