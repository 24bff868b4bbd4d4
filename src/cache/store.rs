//! In-memory TTL store for API responses
//!
//! Entries carry their own time-to-live and are checked on read: an expired
//! entry is removed by the lookup that finds it and reported as absent. There
//! is no background sweep and no size bound.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// Default time-to-live for cached responses, in minutes
pub const DEFAULT_TTL_MINUTES: i64 = 5;

/// Source of the current time for expiry checks
pub trait Clock: Send + Sync + fmt::Debug {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to
///
/// Clones share the same instant, so a test can hand one clone to a cache and
/// advance time through another.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    /// Creates a clock frozen at `start`
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    /// Moves the clock forward (or backward, for a negative duration)
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += by;
    }

    /// Sets the clock to an absolute instant
    pub fn set(&self, to: DateTime<Utc>) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) = to;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A stored value with the metadata needed to decide whether it is still fresh
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry<T> {
    /// The cached payload
    pub value: T,
    /// When the payload was stored; set on a successful fetch, never on a hit
    pub stored_at: DateTime<Utc>,
    /// How long the payload stays valid
    pub ttl: Duration,
}

impl<T> CacheEntry<T> {
    pub fn new(value: T, stored_at: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            value,
            stored_at,
            ttl,
        }
    }

    /// Valid iff `now - stored_at <= ttl`. A non-positive ttl is never valid.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.ttl > Duration::zero() && now - self.stored_at <= self.ttl
    }
}

/// Read-only snapshot of the store, for diagnostics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Number of entries currently held, expired ones included
    pub size: usize,
    /// Keys currently held, sorted
    pub keys: Vec<String>,
}

/// Shared TTL cache keyed by string
///
/// Cloning yields another handle onto the same entries. Every operation takes
/// the inner lock for its whole duration, so `get`/`set`/`remove` are atomic
/// with respect to one another even across threads.
pub struct TtlCache<T> {
    entries: Arc<Mutex<HashMap<String, CacheEntry<T>>>>,
    default_ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl<T> Clone for TtlCache<T> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
            default_ttl: self.default_ttl,
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<T> fmt::Debug for TtlCache<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TtlCache")
            .field("len", &self.len())
            .field("default_ttl", &self.default_ttl)
            .field("clock", &self.clock)
            .finish()
    }
}

impl<T> Default for TtlCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TtlCache<T> {
    /// Creates an empty cache with the default five minute ttl and the wall clock
    pub fn new() -> Self {
        Self::with_clock(Duration::minutes(DEFAULT_TTL_MINUTES), Arc::new(SystemClock))
    }

    /// Creates an empty cache with a custom default ttl
    pub fn with_default_ttl(default_ttl: Duration) -> Self {
        Self::with_clock(default_ttl, Arc::new(SystemClock))
    }

    /// Creates an empty cache reading time from `clock`
    pub fn with_clock(default_ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            default_ttl,
            clock,
        }
    }

    /// The ttl applied by [`TtlCache::set`]
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Returns the value for `key` if present and still valid
    ///
    /// An expired entry is deleted before `None` is returned.
    pub fn get(&self, key: &str) -> Option<T>
    where
        T: Clone,
    {
        let now = self.clock.now();
        let mut entries = self.lock();

        let valid = entries.get(key).map(|entry| entry.is_valid_at(now));
        match valid {
            Some(true) => entries.get(key).map(|entry| entry.value.clone()),
            Some(false) => {
                debug!(key, "cache entry expired, removing");
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Stores `value` under `key` with the default ttl
    pub fn set(&self, key: impl Into<String>, value: T) {
        self.set_with_ttl(key, value, self.default_ttl);
    }

    /// Stores `value` under `key`, overwriting any existing entry
    ///
    /// A zero or negative ttl is accepted; the entry reads as absent.
    pub fn set_with_ttl(&self, key: impl Into<String>, value: T, ttl: Duration) {
        let entry = CacheEntry::new(value, self.clock.now(), ttl);
        self.lock().insert(key.into(), entry);
    }

    /// Removes one entry, returning whether it existed
    pub fn remove(&self, key: &str) -> bool {
        self.lock().remove(key).is_some()
    }

    /// Removes every entry
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Number of entries held, expired ones included
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of the current size and keys; has no side effects
    pub fn stats(&self) -> CacheStats {
        let entries = self.lock();
        let mut keys: Vec<String> = entries.keys().cloned().collect();
        keys.sort();
        CacheStats {
            size: entries.len(),
            keys,
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, CacheEntry<T>>> {
        // Entries are only ever inserted or removed whole, so a poisoned map is still consistent
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
