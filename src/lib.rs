//! Berita Portal data layer
//!
//! A TTL response cache and a cache-aware fetch pipeline for a news portal's
//! content API, with endpoint adapters that shape API records into view
//! models.

pub mod cache;
pub mod cli;
pub mod config;
pub mod data;
pub mod fetch;
pub mod portal;

pub use cache::{derive_key, CacheParams, TtlCache};
pub use config::{ConfigError, PortalConfig};
pub use fetch::{CacheControl, ContentFetcher, FetchError, FetchOptions};
pub use portal::PortalClient;
