//! HTTP transport for the Rezka CDN-lookup endpoint
//!
//! [`CdnTransport`] is the seam the scraper talks through. [`RezkaClient`] is
//! the default implementation: a rate-limited reqwest client that posts
//! form-encoded AJAX requests and retries transient failures with
//! exponential backoff.

use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, REFERER};
use tokio::sync::Mutex;
use tokio::time::sleep;

use crate::error::{RezkaError, Result};

/// Default mirror of the site
pub const DEFAULT_BASE_URL: &str = "https://rezka.ag";

/// AJAX endpoint serving streams and episode listings
pub const CDN_SERIES_PATH: &str = "/ajax/get_cdn_series/";

/// Default User-Agent mimicking a modern browser
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Outbound transport used by [`crate::RezkaScraper`]
///
/// Implementations submit a form to the CDN-lookup endpoint and return the
/// raw response body bytes, undecoded. Retries, timeouts and sessions are
/// the implementation's business.
#[async_trait]
pub trait CdnTransport: Send + Sync {
    /// Post `form` to the CDN-lookup endpoint and return the response body.
    async fn submit(&self, form: &[(&str, &str)]) -> Result<Vec<u8>>;
}

/// Rate limiter to control request frequency
///
/// Spaces requests at least `min_interval` apart.
pub struct RateLimiter {
    min_interval: Duration,
    last_request: Arc<Mutex<Option<Instant>>>,
}

impl RateLimiter {
    /// Create a rate limiter allowing `requests_per_second` requests.
    ///
    /// # Errors
    /// Returns `InvalidConfig` unless the rate is positive, finite and large
    /// enough for the interval to fit in a [`Duration`].
    ///
    /// # Example
    /// ```
    /// use rezka_core::client::RateLimiter;
    ///
    /// let limiter = RateLimiter::new(2.0).unwrap();
    /// assert_eq!(limiter.min_interval().as_millis(), 500);
    /// assert!(RateLimiter::new(0.0).is_err());
    /// ```
    pub fn new(requests_per_second: f64) -> Result<Self> {
        if !(requests_per_second.is_finite() && requests_per_second > 0.0) {
            return Err(RezkaError::InvalidConfig(format!(
                "requests_per_second must be positive, got {}",
                requests_per_second
            )));
        }
        let min_interval = Duration::try_from_secs_f64(1.0 / requests_per_second).map_err(|e| {
            RezkaError::InvalidConfig(format!(
                "requests_per_second {} is too small: {}",
                requests_per_second, e
            ))
        })?;

        Ok(Self {
            min_interval,
            last_request: Arc::new(Mutex::new(None)),
        })
    }

    /// Wait until the next request is allowed, then claim the slot.
    pub async fn acquire(&self) {
        let mut last = self.last_request.lock().await;

        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.min_interval {
                sleep(self.min_interval - elapsed).await;
            }
        }

        *last = Some(Instant::now());
    }

    /// Minimum interval between requests
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }
}

/// Configuration for [`RezkaClient`]
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Site mirror to talk to (default: `https://rezka.ag`)
    pub base_url: String,
    /// Maximum requests per second (default: 2.0)
    pub requests_per_second: f64,
    /// Request timeout in seconds (default: 30)
    pub timeout_secs: u64,
    /// Retry attempts for 429 and 5xx responses (default: 3)
    pub max_retries: u32,
    /// First backoff delay in milliseconds, doubled per attempt (default: 1000)
    pub retry_delay_ms: u64,
    /// User-Agent header
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            requests_per_second: 2.0,
            timeout_secs: 30,
            max_retries: 3,
            retry_delay_ms: 1000,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ClientConfig {
    /// Default configuration pointed at another mirror
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }
}

/// Rate-limited HTTP client for the Rezka AJAX endpoints
///
/// Keeps a cookie store for the lifetime of the client and sends the
/// headers the site expects on XHR requests.
pub struct RezkaClient {
    client: reqwest::Client,
    rate_limiter: RateLimiter,
    base_url: String,
    max_retries: u32,
    retry_delay: Duration,
}

impl RezkaClient {
    /// Create a new client with default configuration
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new client with custom configuration
    ///
    /// # Errors
    /// - `RezkaError::InvalidConfig` - base URL does not parse or rate is unusable
    /// - `RezkaError::Http` - the reqwest client cannot be built
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let base = reqwest::Url::parse(&config.base_url).map_err(|e| {
            RezkaError::InvalidConfig(format!("base URL '{}': {}", config.base_url, e))
        })?;
        let rate_limiter = RateLimiter::new(config.requests_per_second)?;

        let base_url = base.as_str().trim_end_matches('/').to_string();

        let mut headers = HeaderMap::new();
        headers.insert("X-Requested-With", HeaderValue::from_static("XMLHttpRequest"));
        let referer = HeaderValue::from_str(&format!("{}/", base_url))
            .map_err(|e| RezkaError::InvalidConfig(format!("referer header: {}", e)))?;
        headers.insert(REFERER, referer);

        let client = reqwest::Client::builder()
            .user_agent(config.user_agent)
            .default_headers(headers)
            .cookie_store(true)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            rate_limiter,
            base_url,
            max_retries: config.max_retries,
            retry_delay: Duration::from_millis(config.retry_delay_ms),
        })
    }

    /// Base URL requests are sent to, without a trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Post a form to a path on the site and return the raw response body.
    ///
    /// The body is not decoded here; invalid UTF-8 is left for the caller to
    /// reject.
    ///
    /// # Errors
    /// - `RezkaError::Http` - network error, 4xx, or 5xx after all retries
    /// - `RezkaError::RateLimited` - 429 after all retries
    /// - `RezkaError::NotFound` - 404
    /// - `RezkaError::UnexpectedStatus` - non-success status outside 4xx/5xx
    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> Result<Vec<u8>> {
        let url = format!("{}{}", self.base_url, path);
        let mut attempt = 0;

        loop {
            self.rate_limiter.acquire().await;

            tracing::debug!(%url, attempt, "posting form");
            let response = self.client.post(&url).form(form).send().await?;
            let status = response.status();

            if status.is_success() {
                return Ok(response.bytes().await?.to_vec());
            }

            if status == reqwest::StatusCode::NOT_FOUND {
                return Err(RezkaError::NotFound(url));
            }

            let retryable =
                status == reqwest::StatusCode::TOO_MANY_REQUESTS || status.is_server_error();
            if retryable && attempt < self.max_retries {
                let delay = self.backoff_delay(attempt);
                tracing::warn!(%url, %status, ?delay, "retrying request");
                sleep(delay).await;
                attempt += 1;
                continue;
            }

            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                return Err(RezkaError::RateLimited);
            }

            return Err(match response.error_for_status() {
                Err(err) => RezkaError::Http(err),
                Ok(_) => RezkaError::UnexpectedStatus(status.as_u16()),
            });
        }
    }

    /// Exponential backoff: base, 2x base, 4x base, ...
    fn backoff_delay(&self, attempt: u32) -> Duration {
        self.retry_delay.saturating_mul(2u32.saturating_pow(attempt))
    }

    #[cfg(test)]
    pub(crate) fn rate_limiter(&self) -> &RateLimiter {
        &self.rate_limiter
    }
}

#[async_trait]
impl CdnTransport for RezkaClient {
    async fn submit(&self, form: &[(&str, &str)]) -> Result<Vec<u8>> {
        let path = format!("{}?t={}", CDN_SERIES_PATH, timestamp_millis());
        self.post_form(&path, form).await
    }
}

/// Cache-busting timestamp the site's own player appends
fn timestamp_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}
