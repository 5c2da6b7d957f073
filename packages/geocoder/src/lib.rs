#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Geocoding service for the AQI tracker.
//!
//! Converts customer location names to latitude/longitude coordinates
//! using the Nominatim / `OpenStreetMap` free-form search API, configured
//! via a TOML file embedded from `services/`.
//!
//! Lookups are expensive (Nominatim enforces strict rate limits), so the
//! [`GeocodeResolver`] fronts every lookup with a process-lifetime
//! [`GeocodeCache`] and a pacing delay, and degrades to a configured
//! fallback coordinate instead of failing when the provider is
//! unreachable or returns no match.

pub mod cache;
pub mod nominatim;
pub mod pacing;
pub mod resolver;
pub mod service;

pub use cache::GeocodeCache;
pub use nominatim::NominatimGeocoder;
pub use resolver::GeocodeResolver;

use thiserror::Error;

/// A resolved coordinate for a location name.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    /// Latitude (WGS84).
    pub lat: f64,
    /// Longitude (WGS84).
    pub lng: f64,
    /// Whether this is the fallback sentinel substituted when true
    /// geocoding was unavailable or returned no match.
    pub is_default: bool,
}

/// A single candidate returned by a geocoding provider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeocodeMatch {
    /// Latitude (WGS84).
    pub lat: f64,
    /// Longitude (WGS84).
    pub lng: f64,
}

/// Errors from geocoding operations.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response parsing failed.
    #[error("Parse error: {message}")]
    Parse {
        /// Description of the parsing failure.
        message: String,
    },

    /// Rate limit exceeded.
    #[error("Rate limit exceeded")]
    RateLimited,
}

/// A geocoding backend that resolves a free-form query to zero or more
/// candidate coordinates.
///
/// The production implementation is [`NominatimGeocoder`]; tests
/// substitute stubs to exercise the resolver and cache without network
/// access.
#[async_trait::async_trait]
pub trait Geocoder: Send + Sync {
    /// Searches for a location by free-form query.
    ///
    /// Returns candidates in provider ranking order (best first), or an
    /// empty list when the provider has no match.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError`] if the request or response parsing fails.
    async fn search(&self, query: &str) -> Result<Vec<GeocodeMatch>, GeocodeError>;
}
