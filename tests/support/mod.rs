//! Shared fixtures for the integration test suite.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use diffgrid::config::GridSettings;
use diffgrid::models::{DayStamp, Flag, RawUnitRecord};
use diffgrid::store::{
    AnnotationStore, MemoryStore, SnapshotStore, StoreResult,
};

pub fn day(s: &str) -> DayStamp {
    DayStamp::parse(s).expect("valid day stamp")
}

pub fn rec(key: &str, number: &str, model: &str, diff: i64) -> RawUnitRecord {
    RawUnitRecord {
        unit_key: key.to_string(),
        unit_number: number.to_string(),
        model_name: model.to_string(),
        diff: Some(diff),
        flag: None,
    }
}

pub fn flagged(key: &str, number: &str, model: &str, diff: i64, flag: Flag) -> RawUnitRecord {
    RawUnitRecord {
        flag: Some(flag),
        ..rec(key, number, model, diff)
    }
}

/// Grid settings with a small window so tests page quickly.
pub fn settings(window_size: usize) -> GridSettings {
    GridSettings {
        window_size,
        ..GridSettings::default()
    }
}

/// Memory store wrapper that delays every snapshot fetch, for exercising
/// the in-flight guard and stale-result paths.
pub struct SlowStore {
    pub inner: MemoryStore,
    pub delay: Duration,
}

impl SlowStore {
    pub fn new(inner: MemoryStore, delay: Duration) -> Arc<Self> {
        Arc::new(Self { inner, delay })
    }
}

#[async_trait]
impl SnapshotStore for SlowStore {
    async fn health_check(&self) -> StoreResult<bool> {
        self.inner.health_check().await
    }

    async fn fetch_snapshots(
        &self,
        venue: &str,
        days: &[DayStamp],
    ) -> StoreResult<BTreeMap<DayStamp, Vec<RawUnitRecord>>> {
        tokio::time::sleep(self.delay).await;
        self.inner.fetch_snapshots(venue, days).await
    }
}

#[async_trait]
impl AnnotationStore for SlowStore {
    async fn read_flags(&self, venue: &str, day: DayStamp) -> StoreResult<HashMap<String, Flag>> {
        self.inner.read_flags(venue, day).await
    }

    async fn write_flags(
        &self,
        venue: &str,
        day: DayStamp,
        updates: &HashMap<String, Flag>,
    ) -> StoreResult<usize> {
        self.inner.write_flags(venue, day, updates).await
    }
}
