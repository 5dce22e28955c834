//! Page cache with LRU eviction
//!
//! Rendered pages and text geometry are cached per page number. The first
//! few pages of the bibliography are requested by nearly every visitor, so
//! they live in a pinned store that is never evicted; every other page goes
//! through a bounded LRU.
//!
//! # Thread Safety
//!
//! Both stores sit behind `parking_lot::Mutex`. The lock is never held while
//! a value is being produced, so two requests racing on the same cold page
//! may both render it; the second insert simply overwrites the first.

use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};

use lru::LruCache;
use parking_lot::Mutex;

/// Default LRU capacity
pub const DEFAULT_CAPACITY: usize = 128;
/// Default number of leading pages kept resident
pub const DEFAULT_PINNED_PAGES: usize = 5;

/// Cache keyed by 1-based page number
pub struct PageCache<V> {
    /// Pages `1..=pinned_pages` go here and are never evicted
    pinned: Mutex<HashMap<usize, V>>,
    pinned_pages: usize,
    lru: Mutex<LruCache<usize, V>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<V: Clone> PageCache<V> {
    /// Create a cache with an LRU of `capacity` entries and `pinned_pages` resident pages
    pub fn new(capacity: usize, pinned_pages: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);

        Self {
            pinned: Mutex::new(HashMap::with_capacity(pinned_pages)),
            pinned_pages,
            lru: Mutex::new(LruCache::new(capacity)),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    fn is_pinned(&self, page: usize) -> bool {
        (1..=self.pinned_pages).contains(&page)
    }

    /// Look up a page without producing it
    pub fn get(&self, page: usize) -> Option<V> {
        let found = if self.is_pinned(page) {
            self.pinned.lock().get(&page).cloned()
        } else {
            self.lru.lock().get(&page).cloned()
        };

        match found {
            Some(value) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(value)
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Store a page
    pub fn insert(&self, page: usize, value: V) {
        if self.is_pinned(page) {
            self.pinned.lock().insert(page, value);
        } else {
            self.lru.lock().put(page, value);
        }
    }

    /// Return the cached page or produce, store and return it
    ///
    /// Errors from `produce` are returned unchanged and nothing is cached.
    pub fn get_or_try_insert_with<E, F>(&self, page: usize, produce: F) -> Result<V, E>
    where
        F: FnOnce() -> Result<V, E>,
    {
        if let Some(value) = self.get(page) {
            return Ok(value);
        }

        let value = produce()?;
        self.insert(page, value.clone());
        Ok(value)
    }

    /// Cache statistics
    pub fn stats(&self) -> CacheStats {
        let lru = self.lru.lock();
        CacheStats {
            pinned_used: self.pinned.lock().len(),
            pinned_capacity: self.pinned_pages,
            lru_used: lru.len(),
            lru_capacity: lru.cap().get(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

impl<V: Clone> Default for PageCache<V> {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY, DEFAULT_PINNED_PAGES)
    }
}

/// Cache statistics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStats {
    /// Resident pinned pages
    pub pinned_used: usize,
    /// Number of leading pages eligible for pinning
    pub pinned_capacity: usize,
    /// Pages in the LRU
    pub lru_used: usize,
    /// LRU capacity
    pub lru_capacity: usize,
    pub hits: u64,
    pub misses: u64,
}
