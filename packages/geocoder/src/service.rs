//! Compile-time embedded geocoding service configuration.
//!
//! The Nominatim provider settings are defined in
//! `services/nominatim.toml` and embedded at compile time, so a
//! malformed config fails the first test run rather than a production
//! lookup.

use std::time::Duration;

use serde::Deserialize;

use crate::GeoPoint;

/// A geocoding service configuration loaded from TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct GeocodingService {
    /// Unique identifier (e.g., `"nominatim"`).
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Search endpoint base URL.
    pub base_url: String,
    /// `User-Agent` header sent with every request (Nominatim requires
    /// an identifying agent).
    pub user_agent: String,
    /// Minimum delay between requests in milliseconds.
    pub rate_limit_ms: u64,
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Coordinate substituted when a location cannot be resolved.
    pub fallback: FallbackCoordinate,
}

/// The sentinel coordinate used when geocoding fails or has no match.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct FallbackCoordinate {
    /// Latitude (WGS84).
    pub lat: f64,
    /// Longitude (WGS84).
    pub lng: f64,
}

impl GeocodingService {
    /// The pacing delay between consecutive provider requests.
    #[must_use]
    pub const fn pacing_delay(&self) -> Duration {
        Duration::from_millis(self.rate_limit_ms)
    }

    /// The per-request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// The fallback [`GeoPoint`], flagged as a default.
    #[must_use]
    pub const fn fallback_point(&self) -> GeoPoint {
        GeoPoint {
            lat: self.fallback.lat,
            lng: self.fallback.lng,
            is_default: true,
        }
    }
}

const NOMINATIM_TOML: &str = include_str!("../services/nominatim.toml");

/// Returns the Nominatim service configuration.
///
/// # Panics
///
/// Panics if the embedded TOML config is malformed (this is a
/// compile-time guarantee since the config is embedded).
#[must_use]
pub fn nominatim_service() -> GeocodingService {
    toml::de::from_str(NOMINATIM_TOML)
        .unwrap_or_else(|e| panic!("Failed to parse geocoding service 'nominatim': {e}"))
}
