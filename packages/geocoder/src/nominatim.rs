//! Nominatim / OpenStreetMap geocoder client.
//!
//! Resolves free-form location names (e.g., `"Sector 62, Noida"`) via
//! the public search endpoint. Nominatim has strict rate limits:
//! **1 request per second** maximum — the caller is responsible for
//! pacing (see [`crate::pacing`] and `rate_limit_ms` in the service
//! TOML configuration).
//!
//! See <https://nominatim.org/release-docs/develop/api/Search/>

use std::time::Duration;

use crate::service::GeocodingService;
use crate::{GeocodeError, GeocodeMatch, Geocoder};

/// Client for the Nominatim free-form search endpoint.
#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    client: reqwest::Client,
    base_url: String,
    user_agent: String,
    timeout: Duration,
}

impl NominatimGeocoder {
    /// Creates a client from a service configuration.
    #[must_use]
    pub fn new(client: reqwest::Client, service: &GeocodingService) -> Self {
        Self {
            client,
            base_url: service.base_url.clone(),
            user_agent: service.user_agent.clone(),
            timeout: service.timeout(),
        }
    }
}

#[async_trait::async_trait]
impl Geocoder for NominatimGeocoder {
    async fn search(&self, query: &str) -> Result<Vec<GeocodeMatch>, GeocodeError> {
        let resp = self
            .client
            .get(&self.base_url)
            .query(&[("format", "json"), ("q", query)])
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .timeout(self.timeout)
            .send()
            .await?;

        if resp.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(GeocodeError::RateLimited);
        }

        let body: serde_json::Value = resp.json().await?;
        parse_response(&body)
    }
}

/// Parses a Nominatim JSON search response into candidate coordinates.
///
/// Nominatim encodes `lat`/`lon` as strings; entries missing either
/// field or carrying non-numeric values are rejected as parse errors
/// rather than silently skipped.
fn parse_response(body: &serde_json::Value) -> Result<Vec<GeocodeMatch>, GeocodeError> {
    let results = body.as_array().ok_or_else(|| GeocodeError::Parse {
        message: "Nominatim response is not an array".to_string(),
    })?;

    results
        .iter()
        .map(|entry| {
            let lat = entry["lat"]
                .as_str()
                .and_then(|s| s.parse::<f64>().ok())
                .ok_or_else(|| GeocodeError::Parse {
                    message: "Missing lat in Nominatim response".to_string(),
                })?;

            let lng = entry["lon"]
                .as_str()
                .and_then(|s| s.parse::<f64>().ok())
                .ok_or_else(|| GeocodeError::Parse {
                    message: "Missing lon in Nominatim response".to_string(),
                })?;

            Ok(GeocodeMatch { lat, lng })
        })
        .collect()
}
