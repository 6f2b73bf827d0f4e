//! Annotation store trait: the persisted flag overlay.

use std::collections::HashMap;

use async_trait::async_trait;

use super::error::StoreResult;
use crate::models::{DayStamp, Flag};

/// Persistence side of the flag overlay, keyed by (venue, day, unit).
///
/// Writes address the day document as a whole: a multi-unit update for one
/// day either applies completely or not at all. Writing against a day whose
/// document does not exist is a no-op, not an error — the edit stays local
/// until the day is next fetched fresh.
#[async_trait]
pub trait AnnotationStore: Send + Sync {
    /// Read the persisted flags for one day of one venue.
    ///
    /// # Returns
    /// * `Ok(map)` - Flags keyed by unit key; empty when the document is
    ///   missing or carries no flags
    async fn read_flags(&self, venue: &str, day: DayStamp) -> StoreResult<HashMap<String, Flag>>;

    /// Apply a batch of flag updates to one day's document atomically.
    ///
    /// # Arguments
    /// * `updates` - Flag per unit key; all applied or none
    ///
    /// # Returns
    /// * `Ok(applied)` - Number of entries actually updated (0 when the day
    ///   document does not exist)
    async fn write_flags(
        &self,
        venue: &str,
        day: DayStamp,
        updates: &HashMap<String, Flag>,
    ) -> StoreResult<usize>;
}
