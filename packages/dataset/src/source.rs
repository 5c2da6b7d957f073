//! Fetching and parsing the customer AQI CSV.
//!
//! The dataset is published as a plain CSV export (the deployment uses
//! a Google Drive download link) with `Customer Name`, `Location Name`,
//! and `AQI` columns. Structural problems — unreachable file, missing
//! columns, malformed CSV framing — fail the whole fetch; individual
//! rows with unusable field values are skipped with a warning so one
//! bad entry cannot blank the dataset.

use async_trait::async_trait;

use crate::{AqiRow, DatasetError};

const CUSTOMER_COLUMN: &str = "Customer Name";
const LOCATION_COLUMN: &str = "Location Name";
const AQI_COLUMN: &str = "AQI";

/// Source of parsed dataset rows.
///
/// The production implementation is [`RemoteCsvSource`]; tests
/// substitute stubs to drive the snapshot cache and pipeline without
/// network access.
#[async_trait]
pub trait RowSource: Send + Sync {
    /// Fetches and parses a fresh generation of the dataset.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError`] on transport or format problems.
    async fn fetch_rows(&self) -> Result<Vec<AqiRow>, DatasetError>;
}

/// Fetches the CSV over HTTP and parses it.
#[derive(Debug, Clone)]
pub struct RemoteCsvSource {
    client: reqwest::Client,
    url: String,
}

impl RemoteCsvSource {
    /// Creates a source that downloads from `url`.
    #[must_use]
    pub const fn new(client: reqwest::Client, url: String) -> Self {
        Self { client, url }
    }
}

#[async_trait]
impl RowSource for RemoteCsvSource {
    async fn fetch_rows(&self) -> Result<Vec<AqiRow>, DatasetError> {
        log::info!("Fetching CSV from {}", self.url);
        let resp = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?;
        let body = resp.bytes().await?;
        parse_rows(&body)
    }
}

/// Parses CSV bytes into dataset rows.
///
/// # Errors
///
/// Returns [`DatasetError::Parse`] if the headers are missing or a
/// record cannot be read at all. Rows with an unparseable AQI value or
/// missing fields are skipped, not fatal.
pub fn parse_rows(data: &[u8]) -> Result<Vec<AqiRow>, DatasetError> {
    let mut reader = csv::Reader::from_reader(data);

    let headers = reader
        .headers()
        .map_err(|e| DatasetError::Parse {
            message: format!("Failed to read CSV headers: {e}"),
        })?
        .clone();

    let customer_idx = column_index(&headers, CUSTOMER_COLUMN)?;
    let location_idx = column_index(&headers, LOCATION_COLUMN)?;
    let aqi_idx = column_index(&headers, AQI_COLUMN)?;

    let mut rows = Vec::new();

    for (i, record) in reader.records().enumerate() {
        let record = record.map_err(|e| DatasetError::Parse {
            message: format!("Failed to read CSV record {}: {e}", i + 1),
        })?;

        let Some(customer_name) = record.get(customer_idx) else {
            log::warn!("Skipping CSV record {}: missing customer name", i + 1);
            continue;
        };
        let Some(location_name) = record.get(location_idx) else {
            log::warn!("Skipping CSV record {}: missing location name", i + 1);
            continue;
        };

        let aqi_field = record.get(aqi_idx).unwrap_or("").trim();
        let Ok(aqi) = aqi_field.parse::<u32>() else {
            log::warn!(
                "Skipping CSV record {}: invalid AQI value '{aqi_field}'",
                i + 1
            );
            continue;
        };

        rows.push(AqiRow {
            customer_name: customer_name.trim().to_string(),
            location_name: location_name.trim().to_string(),
            aqi,
        });
    }

    Ok(rows)
}

fn column_index(headers: &csv::StringRecord, name: &str) -> Result<usize, DatasetError> {
    headers
        .iter()
        .position(|h| h.trim() == name)
        .ok_or_else(|| DatasetError::Parse {
            message: format!("CSV is missing required column '{name}'"),
        })
}
