//! Configuration types for cms-feed

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::{path::PathBuf, time::Duration};

/// Content API endpoint settings
///
/// The access token and space id are not part of the configuration; they come from a
/// [`CredentialsProvider`](crate::credentials::CredentialsProvider).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the content management API (default: "https://api.contentful.com")
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Environment within the space (default: "main")
    #[serde(default = "default_environment")]
    pub environment: String,

    /// Per-request timeout (default: 30 seconds)
    #[serde(default = "default_request_timeout", with = "duration_serde")]
    pub timeout: Duration,

    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            environment: default_environment(),
            timeout: default_request_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

/// Retry configuration for rate-limited requests
///
/// Only `429 Too Many Requests` responses are retried. The defaults give a fixed
/// one-second delay between attempts; set `backoff_multiplier` above 1.0 for
/// exponential growth.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of retry attempts after the first request (default: 3)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay before the first retry (default: 1 second)
    #[serde(default = "default_initial_delay", with = "duration_serde")]
    pub initial_delay: Duration,

    /// Maximum delay between retries (default: 60 seconds)
    #[serde(default = "default_max_delay", with = "duration_serde")]
    pub max_delay: Duration,

    /// Multiplier applied to the delay after each retry (default: 1.0, fixed delay)
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,

    /// Add random jitter to delays (default: false)
    #[serde(default)]
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_delay: default_initial_delay(),
            max_delay: default_max_delay(),
            backoff_multiplier: default_backoff_multiplier(),
            jitter: false,
        }
    }
}

/// Response cache configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Serve cached responses before the network result arrives (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// In-memory cache capacity in bytes (default: 50 MiB)
    #[serde(default = "default_memory_capacity")]
    pub memory_capacity_bytes: u64,

    /// Directory for the on-disk cache (None = memory only)
    #[serde(default)]
    pub disk_dir: Option<PathBuf>,

    /// On-disk cache capacity in bytes (default: 150 MiB)
    #[serde(default = "default_disk_capacity")]
    pub disk_capacity_bytes: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            memory_capacity_bytes: default_memory_capacity(),
            disk_dir: None,
            disk_capacity_bytes: default_disk_capacity(),
        }
    }
}

/// Pagination defaults
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Items requested per page (default: 100)
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

/// Main configuration for [`ContentClient`](crate::client::ContentClient)
///
/// Every field has a sensible default, so `Config::default()` works out of the box
/// once credentials are supplied.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Content API endpoint settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Rate-limit retry policy
    #[serde(default)]
    pub retry: RetryConfig,

    /// Response cache settings
    #[serde(default)]
    pub cache: CacheConfig,

    /// Pagination defaults
    #[serde(default)]
    pub pagination: PaginationConfig,
}

impl Config {
    /// Check values that would make the pipeline unusable
    pub fn validate(&self) -> Result<()> {
        if self.pagination.page_size == 0 {
            return Err(Error::Config {
                message: "page size must be greater than zero".into(),
                key: Some("pagination.page_size".into()),
            });
        }
        if self.api.timeout.is_zero() {
            return Err(Error::Config {
                message: "request timeout must be greater than zero".into(),
                key: Some("api.timeout".into()),
            });
        }
        if url::Url::parse(&self.api.api_base).is_err() {
            return Err(Error::Config {
                message: format!("api base '{}' is not a valid URL", self.api.api_base),
                key: Some("api.api_base".into()),
            });
        }
        if self.retry.backoff_multiplier < 1.0 {
            return Err(Error::Config {
                message: "backoff multiplier must be at least 1.0".into(),
                key: Some("retry.backoff_multiplier".into()),
            });
        }
        Ok(())
    }
}

fn default_api_base() -> String {
    "https://api.contentful.com".into()
}

fn default_environment() -> String {
    "main".into()
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_user_agent() -> String {
    concat!("cms-feed/", env!("CARGO_PKG_VERSION")).into()
}

fn default_max_attempts() -> u32 {
    3
}

fn default_initial_delay() -> Duration {
    Duration::from_secs(1)
}

fn default_max_delay() -> Duration {
    Duration::from_secs(60)
}

fn default_backoff_multiplier() -> f64 {
    1.0
}

fn default_true() -> bool {
    true
}

fn default_memory_capacity() -> u64 {
    50 * 1024 * 1024 // 50 MB
}

fn default_disk_capacity() -> u64 {
    150 * 1024 * 1024 // 150 MB
}

fn default_page_size() -> u32 {
    100
}

// Duration serialization helper (whole seconds)
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
