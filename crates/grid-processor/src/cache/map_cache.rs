//! LRU cache for decoded surface maps.

use chrono::NaiveDate;
use lru::LruCache;
use netcdf_parser::{MapKind, NetCdfResult, SurfaceMap};
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

use crate::error::Result;
use crate::types::CacheStats;

/// Cache key for maps: one file per variable kind per day.
pub type MapKey = (MapKind, NaiveDate);

/// Shared LRU cache of decoded maps, bounded by entry count.
///
/// Entries are immutable once inserted and handed out as `Arc`s, so workers
/// keep using a map even after it has been evicted. Failed loads are not
/// cached. Two workers missing on the same key at once both load the file;
/// the second insert replaces the first.
pub struct MapCache {
    cache: Mutex<LruCache<MapKey, Arc<SurfaceMap>>>,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

impl MapCache {
    /// Create a cache holding at most `capacity` maps (at least one).
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: Mutex::new(LruCache::new(capacity)),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    fn lock(&self) -> MutexGuard<'_, LruCache<MapKey, Arc<SurfaceMap>>> {
        // Poisoning is ignored; entries are never left half-written
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Try to get a map from the cache.
    pub fn get(&self, key: &MapKey) -> Option<Arc<SurfaceMap>> {
        let found = self.lock().get(key).cloned();
        if found.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
        }
        found
    }

    /// Insert a map, evicting the least recently used entry if full.
    pub fn insert(&self, key: MapKey, map: SurfaceMap) -> Arc<SurfaceMap> {
        let map = Arc::new(map);
        let mut cache = self.lock();
        if let Some((evicted, _)) = cache.push(key, Arc::clone(&map)) {
            if evicted != key {
                self.evictions.fetch_add(1, Ordering::Relaxed);
            }
        }
        map
    }

    /// Return the cached map for `key`, loading and caching it on a miss.
    ///
    /// The lock is not held while `load` runs.
    pub fn get_or_load<F>(&self, key: MapKey, load: F) -> Result<Arc<SurfaceMap>>
    where
        F: FnOnce() -> NetCdfResult<SurfaceMap>,
    {
        if let Some(map) = self.get(&key) {
            return Ok(map);
        }

        let map = load()?;
        debug!(kind = %key.0, date = %key.1, nlat = map.nlat(), nlon = map.nlon(), "Cached map");
        Ok(self.insert(key, map))
    }

    /// Get cache statistics.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.lock().len(),
            evictions: self.evictions.load(Ordering::Relaxed),
        }
    }

    /// Get the number of entries in the cache.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Check if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
