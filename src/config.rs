//! Runtime configuration for the portal data layer
//!
//! The content API base URL and the image host are read from the environment
//! and can be overridden from the command line.

use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

/// Environment variable holding the content API base URL
pub const API_URL_VAR: &str = "BERITA_API_URL";

/// Environment variable holding the image host base URL
pub const IMAGE_URL_VAR: &str = "BERITA_IMAGE_URL";

/// Environment variable holding the request timeout in seconds
pub const TIMEOUT_VAR: &str = "BERITA_TIMEOUT_SECS";

/// Request timeout used when none is configured
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Error types for configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No content API URL was provided
    #[error("Missing content API URL: set {0} or pass --api-url")]
    MissingApiUrl(&'static str),

    /// Timeout value is not a positive integer
    #[error("Invalid timeout '{0}': expected a positive number of seconds")]
    InvalidTimeout(String),

    /// The HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Where the content API and its images live
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortalConfig {
    /// Base URL of the content API, without a trailing slash
    pub api_url: String,
    /// Base URL prepended to image paths; may be empty for same-origin paths
    pub image_base: String,
    /// Timeout applied to every outbound request
    pub request_timeout: Duration,
}

impl PortalConfig {
    /// Creates a config for `api_url` with no image host and the default timeout
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: trim_base(api_url.into()),
            image_base: String::new(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_image_base(mut self, image_base: impl Into<String>) -> Self {
        self.image_base = trim_base(image_base.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Reads configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads configuration through `lookup`, which maps a variable name to its value
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup(API_URL_VAR)
            .filter(|value| !value.trim().is_empty())
            .ok_or(ConfigError::MissingApiUrl(API_URL_VAR))?;

        let mut config = Self::new(api_url.trim());

        if let Some(image_base) = lookup(IMAGE_URL_VAR) {
            config = config.with_image_base(image_base.trim());
        }

        if let Some(raw) = lookup(TIMEOUT_VAR) {
            config = config.with_timeout(parse_timeout(&raw)?);
        }

        Ok(config)
    }

    /// Builds the HTTP client used for every content API request
    pub fn http_client(&self) -> Result<Client, ConfigError> {
        Ok(Client::builder().timeout(self.request_timeout).build()?)
    }
}

/// Parses a timeout given in whole seconds
pub fn parse_timeout(raw: &str) -> Result<Duration, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::InvalidTimeout(raw.to_string())),
    }
}

fn trim_base(url: String) -> String {
    url.trim_end_matches('/').to_string()
}
