//! Batched-concurrent enrichment of CSV rows with geocoded coordinates.

use std::sync::Arc;

use aqi_tracker_geocoder::GeocodeResolver;
use futures::future::join_all;

use crate::refresh::RefreshOptions;
use crate::snapshot::SnapshotCache;
use crate::source::RowSource;
use crate::{AqiRow, DatasetError, EnrichedRecord};

/// Default number of rows geocoded concurrently per batch.
pub const DEFAULT_BATCH_SIZE: usize = 5;

/// Joins CSV rows with geocoded coordinates into [`EnrichedRecord`]s.
///
/// Rows are processed in contiguous batches: all resolutions within a
/// batch are issued together and the next batch starts only once the
/// current one has fully completed. This bounds simultaneous load on
/// the geocoding provider while overlapping its pacing delay across
/// several rows. Output order always matches CSV row order.
pub struct EnrichmentPipeline {
    source: Arc<dyn RowSource>,
    snapshots: Arc<SnapshotCache>,
    resolver: Arc<GeocodeResolver>,
    batch_size: usize,
}

impl EnrichmentPipeline {
    /// Creates a pipeline. A `batch_size` of zero is treated as one.
    #[must_use]
    pub fn new(
        source: Arc<dyn RowSource>,
        snapshots: Arc<SnapshotCache>,
        resolver: Arc<GeocodeResolver>,
        batch_size: usize,
    ) -> Self {
        Self {
            source,
            snapshots,
            resolver,
            batch_size: batch_size.max(1),
        }
    }

    /// Builds the enriched dataset.
    ///
    /// A failed or unresolvable geocode never fails the request — the
    /// affected records carry the fallback coordinate. A row that
    /// cannot be enriched at all (empty location name) is dropped with
    /// a warning; users get the remaining rows.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError`] only when the CSV snapshot itself
    /// cannot be obtained.
    pub async fn build(&self, opts: RefreshOptions) -> Result<Vec<EnrichedRecord>, DatasetError> {
        if opts.invalidate_snapshot {
            log::info!("Snapshot cache cleared due to force refresh request");
            self.snapshots.invalidate().await;
        }

        let rows = self.snapshots.get(self.source.as_ref()).await?;
        log::info!("Processing {} CSV entries", rows.len());

        let mut records = Vec::with_capacity(rows.len());

        for batch in rows.chunks(self.batch_size) {
            let resolved = join_all(
                batch
                    .iter()
                    .map(|row| self.enrich_row(row, opts.bypass_geocode_cache)),
            )
            .await;
            records.extend(resolved.into_iter().flatten());
        }

        log::info!("Built {} enriched records", records.len());
        Ok(records)
    }

    async fn enrich_row(&self, row: &AqiRow, bypass_cache: bool) -> Option<EnrichedRecord> {
        if row.location_name.is_empty() {
            log::warn!(
                "Dropping row for customer '{}': empty location name",
                row.customer_name
            );
            return None;
        }

        let point = self.resolver.resolve(&row.location_name, bypass_cache).await;

        Some(EnrichedRecord {
            customer_name: row.customer_name.clone(),
            location_name: row.location_name.clone(),
            aqi: row.aqi,
            point,
        })
    }
}
