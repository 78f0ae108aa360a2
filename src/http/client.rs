//! HTTP client with retry and rate limiting
//!
//! Transport used by the HTTP page fetcher. Retries here are a transport
//! policy for transient failures (429, 5xx, timeouts, refused connections);
//! once a request gives up, the error reaches the iterator and ends the
//! traversal.

use super::rate_limit::{RateLimiter, RateLimiterConfig};
use crate::error::{Error, Result};
use crate::types::BackoffType;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Base URL for relative page links
    pub base_url: Option<String>,
    /// Request timeout
    pub timeout: Duration,
    /// Maximum number of retries
    pub max_retries: u32,
    /// Initial delay for backoff
    pub initial_backoff: Duration,
    /// Maximum delay for backoff
    pub max_backoff: Duration,
    /// Type of backoff strategy
    pub backoff_type: BackoffType,
    /// Rate limiter configuration
    pub rate_limit: Option<RateLimiterConfig>,
    /// Default headers for all requests (API keys go here)
    pub default_headers: HashMap<String, String>,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: Duration::from_secs(30),
            max_retries: 3,
            initial_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_secs(60),
            backoff_type: BackoffType::Exponential,
            rate_limit: Some(RateLimiterConfig::default()),
            default_headers: HashMap::new(),
            user_agent: format!("pagewalk/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpClientConfig {
    /// Create a new config builder
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }
}

/// Builder for HTTP client config
#[derive(Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = Some(url.into());
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set max retries
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.config.max_retries = retries;
        self
    }

    /// Set backoff configuration
    pub fn backoff(mut self, backoff_type: BackoffType, initial: Duration, max: Duration) -> Self {
        self.config.backoff_type = backoff_type;
        self.config.initial_backoff = initial;
        self.config.max_backoff = max;
        self
    }

    /// Set rate limiter
    pub fn rate_limit(mut self, config: RateLimiterConfig) -> Self {
        self.config.rate_limit = Some(config);
        self
    }

    /// Disable rate limiting
    pub fn no_rate_limit(mut self) -> Self {
        self.config.rate_limit = None;
        self
    }

    /// Add a default header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(key.into(), value.into());
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

/// Outcome of a single attempt
enum Attempt {
    /// Response is usable
    Done(Response),
    /// Transient failure; wait and try again
    Retry { error: Error, delay: Duration },
    /// Permanent failure
    Fail(Error),
}

/// HTTP client with retry and rate limiting
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
    rate_limiter: Option<RateLimiter>,
}

impl HttpClient {
    /// Create a new HTTP client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(HttpClientConfig::default())
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        let rate_limiter = config.rate_limit.as_ref().map(RateLimiter::new);

        Ok(Self {
            client,
            config,
            rate_limiter,
        })
    }

    /// Make a GET request
    ///
    /// Transient failures are retried up to `max_retries` times. When they
    /// run out the last failure is wrapped in [`Error::MaxRetriesExceeded`].
    pub async fn get(&self, url: &str) -> Result<Response> {
        let full_url = self.build_url(url)?;
        let max_retries = self.config.max_retries;

        let mut attempt = 0;
        loop {
            if let Some(ref limiter) = self.rate_limiter {
                limiter.wait().await;
            }

            let mut req = self.client.get(full_url.clone());
            for (key, value) in &self.config.default_headers {
                req = req.header(key.as_str(), value.as_str());
            }

            let outcome = match req.send().await {
                Ok(response) => self.classify_response(response, attempt).await,
                Err(e) => self.classify_transport_error(e, attempt),
            };

            match outcome {
                Attempt::Done(response) => {
                    debug!("GET {} succeeded", full_url);
                    return Ok(response);
                }
                Attempt::Fail(error) => return Err(error),
                Attempt::Retry { error, .. } if attempt >= max_retries => {
                    if max_retries == 0 {
                        return Err(error);
                    }
                    return Err(Error::MaxRetriesExceeded {
                        max_retries,
                        error: Box::new(error),
                    });
                }
                Attempt::Retry { error, delay } => {
                    warn!(
                        "GET {} failed ({}), attempt {}/{}, retrying in {:?}",
                        full_url,
                        error,
                        attempt + 1,
                        max_retries + 1,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }

    /// Make a GET request and parse the JSON body
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self.get(url).await?;
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn classify_response(&self, response: Response, attempt: u32) -> Attempt {
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            // Honor retry-after in seconds, never beyond max_backoff
            let delay = extract_retry_after(&response)
                .map_or_else(|| self.calculate_backoff(attempt), Duration::from_secs)
                .min(self.config.max_backoff);
            return Attempt::Retry {
                error: Error::RateLimited {
                    retry_after_seconds: delay.as_secs(),
                },
                delay,
            };
        }

        if is_retryable_status(status) {
            return Attempt::Retry {
                error: Error::http_status(status.as_u16(), ""),
                delay: self.calculate_backoff(attempt),
            };
        }

        if status.is_client_error() || status.is_server_error() {
            let body = response.text().await.unwrap_or_default();
            return Attempt::Fail(Error::http_status(status.as_u16(), body));
        }

        Attempt::Done(response)
    }

    fn classify_transport_error(&self, e: reqwest::Error, attempt: u32) -> Attempt {
        if e.is_timeout() {
            return Attempt::Retry {
                error: Error::Timeout {
                    timeout_ms: self.config.timeout.as_millis() as u64,
                },
                delay: self.calculate_backoff(attempt),
            };
        }
        if e.is_connect() {
            return Attempt::Retry {
                error: Error::Http(e),
                delay: self.calculate_backoff(attempt),
            };
        }
        Attempt::Fail(Error::Http(e))
    }

    /// Build full URL from a page link
    ///
    /// Absolute links are used as-is; relative ones are appended to `base_url`.
    fn build_url(&self, link: &str) -> Result<Url> {
        if link.starts_with("http://") || link.starts_with("https://") {
            return Ok(Url::parse(link)?);
        }

        let full = match &self.config.base_url {
            Some(base) => {
                let base = base.trim_end_matches('/');
                let link = link.trim_start_matches('/');
                format!("{base}/{link}")
            }
            None => link.to_string(),
        };
        Ok(Url::parse(&full)?)
    }

    /// Calculate backoff delay for a given attempt
    pub fn calculate_backoff(&self, attempt: u32) -> Duration {
        let delay = match self.config.backoff_type {
            BackoffType::Constant => self.config.initial_backoff,
            BackoffType::Linear => self.config.initial_backoff * (attempt + 1),
            BackoffType::Exponential => {
                let factor = 2u32.saturating_pow(attempt);
                self.config.initial_backoff * factor
            }
        };

        std::cmp::min(delay, self.config.max_backoff)
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .field("has_rate_limiter", &self.rate_limiter.is_some())
            .finish_non_exhaustive()
    }
}

/// Check if an HTTP status is retryable (429 is handled separately)
fn is_retryable_status(status: StatusCode) -> bool {
    matches!(
        status.as_u16(),
        500 | 502 | 503 | 504 | 520 | 521 | 522 | 523 | 524
    )
}

/// Extract a `retry-after` value given in seconds
fn extract_retry_after(response: &Response) -> Option<u64> {
    response
        .headers()
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse().ok())
}
