//! Process-lifetime cache of geocoding results.
//!
//! Caches both successful geocodes and fallback sentinels so we don't
//! re-query the same location names — an unresolvable name stays
//! unresolvable until a forced refresh rewrites it or the cache is
//! cleared.

use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::GeoPoint;

/// Shared map of `location name -> GeoPoint`.
///
/// Keys are case-sensitive exact matches. Entries never expire; they
/// are only replaced by an explicit [`store`](Self::store) (the
/// resolver's bypass path) or removed by [`clear`](Self::clear). Every
/// mutation replaces a whole entry, so readers never observe a partial
/// write.
#[derive(Debug, Default)]
pub struct GeocodeCache {
    entries: RwLock<BTreeMap<String, GeoPoint>>,
}

impl GeocodeCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up the cached point for a location name.
    ///
    /// # Panics
    ///
    /// Panics if the lock is poisoned.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<GeoPoint> {
        self.entries
            .read()
            .expect("geocode cache lock poisoned")
            .get(key)
            .copied()
    }

    /// Stores a point for a location name, overwriting any prior entry.
    ///
    /// # Panics
    ///
    /// Panics if the lock is poisoned.
    pub fn store(&self, key: &str, point: GeoPoint) {
        self.entries
            .write()
            .expect("geocode cache lock poisoned")
            .insert(key.to_string(), point);
    }

    /// Removes all entries.
    ///
    /// # Panics
    ///
    /// Panics if the lock is poisoned.
    pub fn clear(&self) {
        self.entries
            .write()
            .expect("geocode cache lock poisoned")
            .clear();
    }

    /// Number of cached location names.
    ///
    /// # Panics
    ///
    /// Panics if the lock is poisoned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .expect("geocode cache lock poisoned")
            .len()
    }

    /// Whether the cache holds no entries.
    ///
    /// # Panics
    ///
    /// Panics if the lock is poisoned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELHI: GeoPoint = GeoPoint {
        lat: 28.6139,
        lng: 77.2090,
        is_default: false,
    };

    #[test]
    fn lookup_misses_on_empty_cache() {
        let cache = GeocodeCache::new();
        assert!(cache.lookup("Delhi").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn store_then_lookup_round_trips() {
        let cache = GeocodeCache::new();
        cache.store("Delhi", DELHI);
        assert_eq!(cache.lookup("Delhi"), Some(DELHI));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn keys_are_case_sensitive() {
        let cache = GeocodeCache::new();
        cache.store("Delhi", DELHI);
        assert!(cache.lookup("delhi").is_none());
    }

    #[test]
    fn store_overwrites_existing_entry() {
        let cache = GeocodeCache::new();
        cache.store("Delhi", DELHI);
        let updated = GeoPoint {
            lat: 28.7,
            lng: 77.1,
            is_default: false,
        };
        cache.store("Delhi", updated);
        assert_eq!(cache.lookup("Delhi"), Some(updated));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn clear_removes_all_entries() {
        let cache = GeocodeCache::new();
        cache.store("Delhi", DELHI);
        cache.store("Mumbai", DELHI);
        cache.clear();
        assert!(cache.is_empty());
        assert!(cache.lookup("Delhi").is_none());
    }
}
