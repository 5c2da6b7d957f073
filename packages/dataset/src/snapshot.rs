//! TTL'd cache of the most recent CSV snapshot.
//!
//! Staleness is checked lazily at read time; there is no background
//! refresh. The whole snapshot is replaced on refresh, never mutated
//! in place, and a failed refresh leaves the previous snapshot
//! untouched while the error propagates — the caller decides whether
//! stale data is acceptable.

use std::time::{Duration, Instant};

use tokio::sync::Mutex;

use crate::source::RowSource;
use crate::{AqiRow, DatasetError};

/// One fetched-and-parsed generation of the dataset.
#[derive(Debug, Clone)]
struct Snapshot {
    rows: Vec<AqiRow>,
    fetched_at: Instant,
}

/// Holds the most recent snapshot and refreshes it through a
/// [`RowSource`] when stale or invalidated.
///
/// The interior `tokio::sync::Mutex` is held across the fetch await,
/// so concurrent readers that race a refresh wait for the single
/// in-flight fetch instead of issuing their own.
#[derive(Debug)]
pub struct SnapshotCache {
    ttl: Duration,
    state: Mutex<Option<Snapshot>>,
}

impl SnapshotCache {
    /// Creates an empty cache whose snapshots stay fresh for `ttl`.
    #[must_use]
    pub const fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            state: Mutex::const_new(None),
        }
    }

    /// Returns the cached rows, refreshing through `source` first when
    /// the snapshot is absent, invalidated, or older than the TTL.
    ///
    /// # Errors
    ///
    /// Propagates the [`DatasetError`] from `source` when a refresh is
    /// needed and fails; the previously held snapshot (if any) is left
    /// unchanged.
    pub async fn get(&self, source: &dyn RowSource) -> Result<Vec<AqiRow>, DatasetError> {
        self.get_at(Instant::now(), source).await
    }

    async fn get_at(
        &self,
        now: Instant,
        source: &dyn RowSource,
    ) -> Result<Vec<AqiRow>, DatasetError> {
        let mut state = self.state.lock().await;

        if let Some(snapshot) = state.as_ref()
            && now.duration_since(snapshot.fetched_at) < self.ttl
        {
            log::debug!("Using cached CSV snapshot");
            return Ok(snapshot.rows.clone());
        }

        let rows = source.fetch_rows().await?;
        log::info!("Loaded {} rows from CSV", rows.len());

        *state = Some(Snapshot {
            rows: rows.clone(),
            fetched_at: now,
        });

        Ok(rows)
    }

    /// Drops the held snapshot so the next [`get`](Self::get) always
    /// re-fetches, regardless of elapsed time.
    pub async fn invalidate(&self) {
        *self.state.lock().await = None;
        log::debug!("Snapshot cache invalidated");
    }

    /// When the held snapshot was fetched, if one is held.
    pub async fn fetched_at(&self) -> Option<Instant> {
        self.state.lock().await.as_ref().map(|s| s.fetched_at)
    }
}
