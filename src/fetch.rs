//! Cache-aware fetch pipeline
//!
//! Every read against the content API goes through [`ContentFetcher`]. A
//! request is keyed by its URL and parameters; a valid cached payload is
//! returned without touching the network, otherwise the URL is fetched, parsed
//! as JSON and stored. Failures are propagated and never cached. The pipeline
//! does not retry and does not coalesce concurrent requests for the same key.

use chrono::Duration;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::cache::{derive_key, CacheParams, CacheStats, TtlCache, DEFAULT_TTL_MINUTES};

/// Errors that can occur when fetching from the content API
///
/// Callers are expected to treat every variant the same way: the fetch failed
/// and nothing was cached.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection, timeout, or body read failure
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Upstream answered with a non-2xx status
    #[error("HTTP error! status: {0}")]
    Status(u16),

    /// Body was not valid JSON
    #[error("Failed to parse JSON response: {0}")]
    Parse(#[source] serde_json::Error),

    /// Body was valid JSON but not the shape the caller asked for
    #[error("Unexpected response shape: {0}")]
    Shape(#[source] serde_json::Error),
}

/// Per-call options for [`ContentFetcher::fetch_with_cache`]
#[derive(Debug, Clone, PartialEq)]
pub struct FetchOptions {
    /// When false the store is neither read nor written
    pub use_cache: bool,
    /// Lifetime of the stored payload on success
    pub ttl: Duration,
    /// Logical request parameters, used only to derive the cache key
    pub params: CacheParams,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            use_cache: true,
            ttl: Duration::minutes(DEFAULT_TTL_MINUTES),
            params: CacheParams::new(),
        }
    }
}

impl FetchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bypasses the store entirely
    pub fn no_cache(mut self) -> Self {
        self.use_cache = false;
        self
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_params(mut self, params: CacheParams) -> Self {
        self.params = params;
        self
    }
}

/// Operational handle for inspecting and invalidating cached responses
#[derive(Debug, Clone)]
pub struct CacheControl {
    cache: TtlCache<Value>,
}

impl CacheControl {
    /// Removes the entry stored under `key`, returning whether it existed
    pub fn clear(&self, key: &str) -> bool {
        self.cache.remove(key)
    }

    /// Removes every cached response
    pub fn clear_all(&self) {
        self.cache.clear();
    }

    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }
}

/// Single entry point for content API reads
#[derive(Debug, Clone)]
pub struct ContentFetcher {
    client: Client,
    cache: TtlCache<Value>,
}

impl Default for ContentFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentFetcher {
    /// Creates a fetcher with a default HTTP client and a fresh cache
    pub fn new() -> Self {
        Self::with_cache(Client::new(), TtlCache::new())
    }

    /// Creates a fetcher around an existing client and cache
    ///
    /// The cache is shared with any other handle cloned from it.
    pub fn with_cache(client: Client, cache: TtlCache<Value>) -> Self {
        Self { client, cache }
    }

    /// The backing store
    pub fn cache(&self) -> &TtlCache<Value> {
        &self.cache
    }

    pub fn cache_control(&self) -> CacheControl {
        CacheControl {
            cache: self.cache.clone(),
        }
    }

    /// Fetches `url` as JSON, serving from and populating the cache
    ///
    /// # Returns
    /// * `Ok(Value)` - the parsed payload, which is now cached when `use_cache` is set
    /// * `Err(FetchError)` - the request failed; nothing was cached
    pub async fn fetch_with_cache(
        &self,
        url: &str,
        options: &FetchOptions,
    ) -> Result<Value, FetchError> {
        let cache_key = derive_key(url, &options.params);

        if options.use_cache {
            if let Some(cached) = self.cache.get(&cache_key) {
                debug!(url, "cache hit");
                return Ok(cached);
            }
            debug!(url, "cache miss");
        } else {
            debug!(url, "cache bypassed");
        }

        let payload = match self.fetch_from_api(url).await {
            Ok(payload) => payload,
            Err(error) => {
                warn!(url, %error, "fetch error");
                return Err(error);
            }
        };

        if options.use_cache {
            self.cache.set_with_ttl(cache_key, payload.clone(), options.ttl);
        }

        Ok(payload)
    }

    /// Like [`ContentFetcher::fetch_with_cache`], then converts the payload to `T`
    ///
    /// The raw payload is cached before conversion, so a shape mismatch does
    /// not prevent later callers with a different target type from using it.
    pub async fn fetch_json<T: DeserializeOwned>(
        &self,
        url: &str,
        options: &FetchOptions,
    ) -> Result<T, FetchError> {
        let payload = self.fetch_with_cache(url, options).await?;
        serde_json::from_value(payload).map_err(FetchError::Shape)
    }

    /// Performs the GET and parses the body
    async fn fetch_from_api(&self, url: &str) -> Result<Value, FetchError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(FetchError::Parse)
    }
}
