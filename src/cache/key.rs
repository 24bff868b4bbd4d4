//! Cache key derivation
//!
//! A cache key is the request URL followed by a canonical JSON rendering of
//! the request parameters. Object keys are always emitted in sorted order, at
//! every nesting level, so two parameter sets that differ only in insertion
//! order map to the same key.

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Parameters identifying a logical request, used only for key derivation.
///
/// Parameters never alter the URL; callers build the URL themselves and pass
/// the same logical inputs here so that the key reflects them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheParams(BTreeMap<String, Value>);

impl CacheParams {
    /// Creates an empty parameter set
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a parameter, replacing any previous value under the same name
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    /// Adds an optional parameter; `None` is recorded as JSON `null`
    ///
    /// Recording absent values keeps `{page: 1, startDate: null}` distinct
    /// from `{page: 1}`.
    pub fn with_opt<V: Into<Value>>(self, name: impl Into<String>, value: Option<V>) -> Self {
        let value = value.map(Into::into).unwrap_or(Value::Null);
        self.with(name, value)
    }

    /// Returns true when no parameters have been added
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Canonical JSON rendering with sorted object keys
    ///
    /// The top level is a `BTreeMap`, and nested objects are sorted because
    /// `serde_json` is built without `preserve_order`.
    pub fn canonical(&self) -> String {
        serde_json::to_string(&self.0).unwrap_or_else(|_| "{}".to_string())
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for CacheParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |params, (name, value)| params.with(name, value))
    }
}

/// Derives the cache key for a request
///
/// Pure and total: the same URL and logically equal parameters always yield
/// the same key, and any differing parameter value yields a different key.
pub fn derive_key(url: &str, params: &CacheParams) -> String {
    format!("{}{}", url, params.canonical())
}
