//! Cache module for content API responses
//!
//! This module provides an in-memory TTL store and the key derivation used by
//! the fetch pipeline. Entries live for the lifetime of the process; expired
//! entries are dropped lazily when read, and failures are never stored.

mod key;
mod store;

pub use key::{derive_key, CacheParams};
pub use store::{
    CacheEntry, CacheStats, Clock, ManualClock, SystemClock, TtlCache, DEFAULT_TTL_MINUTES,
};
