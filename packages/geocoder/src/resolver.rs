//! Cache-fronted, paced, fallback-on-failure geocoding.
//!
//! The resolver is the only component that talks to the geocoding
//! backend. It never fails outward: timeouts, network errors, and
//! zero-match responses all degrade to the configured fallback
//! coordinate flagged with `is_default = true`, so enrichment always
//! completes with best-effort data.

use std::sync::Arc;

use crate::cache::GeocodeCache;
use crate::pacing::Pacing;
use crate::{GeoPoint, Geocoder};

/// Resolves location names to coordinates through a cache and a paced
/// external backend.
pub struct GeocodeResolver {
    backend: Arc<dyn Geocoder>,
    cache: Arc<GeocodeCache>,
    pacing: Arc<dyn Pacing>,
    fallback: GeoPoint,
}

impl GeocodeResolver {
    /// Creates a resolver.
    ///
    /// `fallback` is returned (and cached) whenever the backend fails
    /// or has no match; it should carry `is_default = true`.
    #[must_use]
    pub fn new(
        backend: Arc<dyn Geocoder>,
        cache: Arc<GeocodeCache>,
        pacing: Arc<dyn Pacing>,
        fallback: GeoPoint,
    ) -> Self {
        Self {
            backend,
            cache,
            pacing,
            fallback,
        }
    }

    /// The cache this resolver reads and writes through.
    #[must_use]
    pub fn cache(&self) -> &Arc<GeocodeCache> {
        &self.cache
    }

    /// Resolves a location name to a coordinate.
    ///
    /// With `bypass_cache = false`, a cached entry is returned as-is
    /// with no external call. Otherwise the resolver waits out the
    /// pacing delay, queries the backend, and stores the outcome —
    /// including fallbacks — overwriting any prior entry, so a forced
    /// refresh can correct a previously cached fallback once the
    /// provider recovers.
    pub async fn resolve(&self, location: &str, bypass_cache: bool) -> GeoPoint {
        if !bypass_cache && let Some(hit) = self.cache.lookup(location) {
            log::debug!("Using cached geocode for '{location}'");
            return hit;
        }

        self.pacing.pause().await;

        let point = match self.backend.search(location).await {
            Ok(matches) => matches.first().map_or_else(
                || {
                    log::warn!("Location not found: '{location}'");
                    self.fallback
                },
                |first| GeoPoint {
                    lat: first.lat,
                    lng: first.lng,
                    is_default: false,
                },
            ),
            Err(e) => {
                log::warn!("Geocoding error for '{location}': {e}");
                self.fallback
            }
        };

        self.cache.store(location, point);
        point
    }
}
