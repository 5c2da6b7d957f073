#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the AQI tracker server.
//!
//! These types are serialized to JSON for the REST API. They are
//! separate from the pipeline's internal types to allow independent
//! evolution of the API contract (the map client depends on these
//! exact field names).

use aqi_tracker_dataset::EnrichedRecord;
use serde::{Deserialize, Serialize};

/// An enriched customer AQI reading as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiAqiRecord {
    /// Customer display name.
    pub customer_name: String,
    /// Location name as it appeared in the source CSV.
    pub location: String,
    /// Air Quality Index reading.
    pub aqi: u32,
    /// Latitude (WGS84).
    pub lat: f64,
    /// Longitude (WGS84).
    pub lng: f64,
    /// Whether the coordinate is the fallback sentinel rather than a
    /// real geocoding match.
    pub is_default_location: bool,
}

impl From<EnrichedRecord> for ApiAqiRecord {
    fn from(record: EnrichedRecord) -> Self {
        Self {
            customer_name: record.customer_name,
            location: record.location_name,
            aqi: record.aqi,
            lat: record.point.lat,
            lng: record.point.lng,
            is_default_location: record.point.is_default,
        }
    }
}

/// Query parameters for the AQI data endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AqiQueryParams {
    /// When `true`, invalidate the CSV snapshot and bypass the geocode
    /// cache for this request.
    #[serde(default)]
    pub refresh: bool,
}

/// Login request body.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    /// Account username.
    pub username: String,
    /// Account password.
    pub password: String,
}

/// Successful login response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Bearer token for subsequent requests.
    pub token: String,
}

/// Generic informational response (`{message}`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiMessage {
    /// Human-readable outcome.
    pub message: String,
}

/// Error response body (`{message, error}`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// What the server was doing when it failed.
    pub message: String,
    /// The underlying error description.
    pub error: String,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiHealth {
    /// Always `true` when the server is responding.
    pub healthy: bool,
    /// Crate version string.
    pub version: String,
}
