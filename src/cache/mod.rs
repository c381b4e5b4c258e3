//! Time-boxed result cache
//!
//! One process-wide instance guards every adapter call and the
//! aggregate layer. Entries expire on a fixed TTL and the store evicts
//! beyond a maximum entry count; neither condition is ever surfaced to
//! callers.

use crate::config::CacheSettings;
use crate::locales::Locale;
use crate::results::{SearchData, SearchKind};
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Shared cache for per-source and aggregate results
pub struct SearchCache {
    cache: Cache<String, Arc<SearchData>>,
}

impl SearchCache {
    /// Create a cache with the given TTL and capacity bound
    pub fn new(ttl_seconds: u64, max_capacity: u64) -> Self {
        let cache = Cache::builder()
            .time_to_live(Duration::from_secs(ttl_seconds))
            .max_capacity(max_capacity)
            .build();

        Self { cache }
    }

    pub fn with_settings(settings: &CacheSettings) -> Self {
        Self::new(settings.ttl_seconds, settings.max_capacity)
    }

    /// Get a cached payload
    pub async fn get(&self, key: &str) -> Option<Arc<SearchData>> {
        self.cache.get(key).await
    }

    /// Store a payload.
    ///
    /// Empty payloads are a no-op: transient failures must self-heal on
    /// the next request instead of pinning an empty list for a full TTL.
    /// `Wiki(None)` is not empty (confirmed not-found) and is stored.
    pub async fn set(&self, key: String, value: SearchData) {
        if value.is_empty() {
            debug!("skipping cache write for empty payload: {}", key);
            return;
        }
        self.cache.insert(key, Arc::new(value)).await;
    }

    pub async fn remove(&self, key: &str) {
        self.cache.remove(key).await;
    }

    pub fn clear(&self) {
        self.cache.invalidate_all();
    }

    /// Current entry count (after housekeeping)
    pub async fn size(&self) -> u64 {
        self.cache.run_pending_tasks().await;
        self.cache.entry_count()
    }

    /// Cache key for one source fetch
    pub fn source_key(source: &str, locale: &Locale, offset: u32, query: &str) -> String {
        hash_key(&["src", source, &locale.cache_tag(), &offset.to_string(), query])
    }

    /// Cache key for an aggregate: deliberately excludes pagination so
    /// later pages slice the stored full list.
    pub fn aggregate_key(kind: SearchKind, locale: &Locale, query: &str) -> String {
        hash_key(&["agg", kind.as_str(), &locale.cache_tag(), query])
    }
}

impl Default for SearchCache {
    fn default() -> Self {
        Self::with_settings(&CacheSettings::default())
    }
}

fn hash_key(parts: &[&str]) -> String {
    use sha2::{Digest, Sha256};

    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part.as_bytes());
        hasher.update([0u8]);
    }
    format!("{:x}", hasher.finalize())
}
