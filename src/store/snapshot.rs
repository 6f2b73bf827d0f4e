//! Snapshot store trait: per-day raw unit records on demand.

use std::collections::BTreeMap;

use async_trait::async_trait;

use super::error::StoreResult;
use crate::models::{DayStamp, RawUnitRecord};

/// Read side of the external snapshot database.
///
/// A snapshot is one day's set of per-unit records for one venue. The store
/// returns only the days it actually has data for; an absent key means "no
/// snapshot for this day", never an error. Partial records inside a day are
/// the store's responsibility to avoid — a returned day is complete.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Check that the backing store is reachable.
    async fn health_check(&self) -> StoreResult<bool>;

    /// Fetch the snapshots for the given days of one venue.
    ///
    /// # Arguments
    /// * `venue` - Venue identifier the documents are keyed under
    /// * `days` - Days to fetch; order is irrelevant
    ///
    /// # Returns
    /// * `Ok(map)` - Only the days that have data, each with its records
    /// * `Err(StoreError)` - The fetch failed as a whole
    async fn fetch_snapshots(
        &self,
        venue: &str,
        days: &[DayStamp],
    ) -> StoreResult<BTreeMap<DayStamp, Vec<RawUnitRecord>>>;
}
