//! LRU cache for classifier results.
//!
//! Comment threads repeat short texts ("this", "lol", quoted titles), so
//! identical inputs skip inference. Default: 1000 entries, 1-hour TTL.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::classifier::Classification;

struct CacheEntry {
    result: Classification,
    inserted_at: Instant,
}

/// Thread-safe LRU cache keyed by the (truncated) input text.
pub struct ClassificationCache {
    inner: Mutex<CacheInner>,
}

struct CacheInner {
    entries: HashMap<String, CacheEntry>,
    order: Vec<String>,
    max_size: usize,
    ttl: Duration,
}

impl ClassificationCache {
    /// Create a new cache with the given capacity and TTL.
    pub fn new(max_size: usize, ttl: Duration) -> Self {
        Self {
            inner: Mutex::new(CacheInner {
                entries: HashMap::with_capacity(max_size),
                order: Vec::with_capacity(max_size),
                max_size,
                ttl,
            }),
        }
    }

    /// Create a cache with default settings (1000 entries, 1hr TTL).
    pub fn default_cache() -> Self {
        Self::new(1000, Duration::from_secs(3600))
    }

    /// Get a cached result. Returns None on miss or expired entry.
    pub fn get(&self, text: &str) -> Option<Classification> {
        let mut inner = self.inner.lock();
        let ttl = inner.ttl;

        let cached = inner
            .entries
            .get(text)
            .map(|e| (e.inserted_at.elapsed() >= ttl, e.result.clone()));

        match cached {
            Some((false, result)) => {
                if let Some(pos) = inner.order.iter().position(|k| k == text) {
                    let key = inner.order.remove(pos);
                    inner.order.push(key);
                }
                Some(result)
            }
            Some((true, _)) => {
                inner.entries.remove(text);
                inner.order.retain(|k| k != text);
                None
            }
            None => None,
        }
    }

    /// Insert a result into the cache.
    pub fn put(&self, text: String, result: Classification) {
        let mut inner = self.inner.lock();

        if inner.entries.contains_key(&text) {
            inner.order.retain(|k| k != &text);
        } else {
            while inner.entries.len() >= inner.max_size && !inner.order.is_empty() {
                let oldest = inner.order.remove(0);
                inner.entries.remove(&oldest);
            }
        }

        inner.order.push(text.clone());
        inner.entries.insert(
            text,
            CacheEntry {
                result,
                inserted_at: Instant::now(),
            },
        );
    }

    /// Number of entries in the cache.
    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clear all entries.
    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.entries.clear();
        inner.order.clear();
    }
}
