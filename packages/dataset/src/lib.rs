#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Data-refresh and enrichment pipeline for the AQI tracker.
//!
//! The customer dataset is published as a CSV file that is re-exported
//! periodically. This crate fetches and parses it behind a TTL'd
//! [`SnapshotCache`], joins each row with a geocoded coordinate from
//! [`aqi_tracker_geocoder`], and produces the ordered
//! [`EnrichedRecord`] sequence the API serves.
//!
//! Rows are geocoded in fixed-size batches — concurrent within a batch,
//! strictly sequential across batches — to bound simultaneous load on
//! the geocoding provider while still overlapping its pacing delay.

pub mod pipeline;
pub mod refresh;
pub mod snapshot;
pub mod source;

pub use pipeline::EnrichmentPipeline;
pub use refresh::RefreshOptions;
pub use snapshot::SnapshotCache;
pub use source::{RemoteCsvSource, RowSource};

pub use aqi_tracker_geocoder::GeoPoint;
use thiserror::Error;

/// One parsed CSV row: a customer, their location, and an AQI reading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AqiRow {
    /// Customer display name.
    pub customer_name: String,
    /// Free-form location name, the join key into the geocode cache.
    pub location_name: String,
    /// Air Quality Index reading.
    pub aqi: u32,
}

/// A CSV row joined with its resolved coordinate. Built per request,
/// never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedRecord {
    /// Customer display name.
    pub customer_name: String,
    /// Location name as it appeared in the CSV.
    pub location_name: String,
    /// Air Quality Index reading.
    pub aqi: u32,
    /// Resolved (or fallback) coordinate.
    pub point: GeoPoint,
}

/// Errors from fetching or parsing the customer dataset.
///
/// These are fatal to a request: no data is better than definitely
/// stale or corrupt data. Per-location geocoding problems never
/// surface here — they degrade to fallback coordinates inside the
/// resolver.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// HTTP transport failed while fetching the CSV.
    #[error("Fetch error: {0}")]
    Fetch(#[from] reqwest::Error),

    /// The CSV body could not be parsed.
    #[error("Parse error: {message}")]
    Parse {
        /// Description of the parsing failure.
        message: String,
    },
}
