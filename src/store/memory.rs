//! In-memory store implementation.
//!
//! Implements both store traits over plain maps, suitable for unit testing
//! and local development: fast, deterministic, and isolated. Seeding
//! helpers let tests author snapshot days directly.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use super::annotation::AnnotationStore;
use super::error::{StoreError, StoreResult};
use super::snapshot::SnapshotStore;
use crate::models::{DayStamp, Flag, RawUnitRecord};

/// In-memory snapshot and annotation store.
#[derive(Clone)]
pub struct MemoryStore {
    data: Arc<RwLock<MemoryData>>,
}

struct MemoryData {
    // Day documents per venue; the inner Vec is one day's snapshot.
    days: HashMap<String, BTreeMap<DayStamp, Vec<RawUnitRecord>>>,
    is_healthy: bool,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(MemoryData {
                days: HashMap::new(),
                is_healthy: true,
            })),
        }
    }

    /// Author one day's snapshot for a venue, replacing any previous seed.
    pub fn seed_snapshot(&self, venue: &str, day: DayStamp, records: Vec<RawUnitRecord>) {
        let mut data = self.data.write();
        data.days
            .entry(venue.to_string())
            .or_default()
            .insert(day, records);
    }

    /// Toggle the health status for failure-path tests.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().is_healthy = healthy;
    }

    /// Drop everything held for every venue.
    pub fn clear(&self) {
        let mut data = self.data.write();
        data.days.clear();
    }

    /// Number of snapshot days held for a venue.
    pub fn day_count(&self, venue: &str) -> usize {
        self.data
            .read()
            .days
            .get(venue)
            .map(|m| m.len())
            .unwrap_or(0)
    }

    fn check_health(&self) -> StoreResult<()> {
        if !self.data.read().is_healthy {
            return Err(StoreError::Unavailable(
                "memory store marked unhealthy".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl SnapshotStore for MemoryStore {
    async fn health_check(&self) -> StoreResult<bool> {
        Ok(self.data.read().is_healthy)
    }

    async fn fetch_snapshots(
        &self,
        venue: &str,
        days: &[DayStamp],
    ) -> StoreResult<BTreeMap<DayStamp, Vec<RawUnitRecord>>> {
        self.check_health()?;

        let data = self.data.read();
        let Some(venue_days) = data.days.get(venue) else {
            return Ok(BTreeMap::new());
        };

        let mut out = BTreeMap::new();
        for day in days {
            if let Some(records) = venue_days.get(day) {
                out.insert(*day, records.clone());
            }
        }
        Ok(out)
    }
}

#[async_trait]
impl AnnotationStore for MemoryStore {
    async fn read_flags(&self, venue: &str, day: DayStamp) -> StoreResult<HashMap<String, Flag>> {
        self.check_health()?;

        let data = self.data.read();
        let flags = data
            .days
            .get(venue)
            .and_then(|days| days.get(&day))
            .map(|records| {
                records
                    .iter()
                    .filter_map(|r| r.flag.map(|f| (r.unit_key.clone(), f)))
                    .collect()
            })
            .unwrap_or_default();
        Ok(flags)
    }

    async fn write_flags(
        &self,
        venue: &str,
        day: DayStamp,
        updates: &HashMap<String, Flag>,
    ) -> StoreResult<usize> {
        self.check_health()?;

        let mut data = self.data.write();
        // Missing day document: edits stay local until the day exists.
        let Some(records) = data.days.get_mut(venue).and_then(|days| days.get_mut(&day)) else {
            return Ok(0);
        };

        let mut applied = 0;
        for record in records.iter_mut() {
            if let Some(flag) = updates.get(&record.unit_key) {
                record.flag = Some(*flag);
                applied += 1;
            }
        }
        Ok(applied)
    }
}
