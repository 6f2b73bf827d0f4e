//! JSON-document store backed by the local filesystem.
//!
//! One document per (venue, day), named `{venue}_{day}.json`, mirroring the
//! layout of the production document database: a `data` map keyed by unit
//! key. Flag writes rewrite the whole document through a temp file and
//! rename, so a multi-unit update for one day is all-or-nothing.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::{json, Value};

use super::annotation::AnnotationStore;
use super::decode;
use super::error::{StoreError, StoreResult};
use super::snapshot::SnapshotStore;
use crate::models::{DayStamp, Flag, RawUnitRecord};

/// Filesystem-backed snapshot and annotation store.
#[derive(Clone)]
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    pub fn open<P: AsRef<Path>>(root: P) -> StoreResult<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Write one day's snapshot document. Primarily for seeding and tools.
    pub fn put_snapshot(
        &self,
        venue: &str,
        day: DayStamp,
        records: &[RawUnitRecord],
    ) -> StoreResult<()> {
        let doc = json!({
            "storeId": venue,
            "date": day.to_string(),
            "data": decode::encode_day(records),
        });
        write_atomic(&self.day_path(venue, day), &doc)
    }

    fn day_path(&self, venue: &str, day: DayStamp) -> PathBuf {
        self.root.join(format!("{venue}_{day}.json"))
    }
}

fn read_document(path: &Path) -> StoreResult<Option<Value>> {
    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    Ok(Some(serde_json::from_str(&content)?))
}

fn write_atomic(path: &Path, doc: &Value) -> StoreResult<()> {
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, serde_json::to_vec_pretty(doc)?)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

fn join_error(e: tokio::task::JoinError) -> StoreError {
    StoreError::Internal(format!("blocking task failed: {e}"))
}

#[async_trait]
impl SnapshotStore for JsonFileStore {
    async fn health_check(&self) -> StoreResult<bool> {
        Ok(self.root.is_dir())
    }

    async fn fetch_snapshots(
        &self,
        venue: &str,
        days: &[DayStamp],
    ) -> StoreResult<BTreeMap<DayStamp, Vec<RawUnitRecord>>> {
        let paths: Vec<(DayStamp, PathBuf)> =
            days.iter().map(|d| (*d, self.day_path(venue, *d))).collect();

        tokio::task::spawn_blocking(move || {
            let mut out = BTreeMap::new();
            for (day, path) in paths {
                if let Some(doc) = read_document(&path)? {
                    let data = doc.get("data").cloned().unwrap_or(Value::Null);
                    out.insert(day, decode::decode_day(&data));
                }
            }
            Ok(out)
        })
        .await
        .map_err(join_error)?
    }
}

#[async_trait]
impl AnnotationStore for JsonFileStore {
    async fn read_flags(&self, venue: &str, day: DayStamp) -> StoreResult<HashMap<String, Flag>> {
        let path = self.day_path(venue, day);

        tokio::task::spawn_blocking(move || {
            let Some(doc) = read_document(&path)? else {
                return Ok(HashMap::new());
            };
            let data = doc.get("data").cloned().unwrap_or(Value::Null);
            let flags = decode::decode_day(&data)
                .into_iter()
                .filter_map(|r| r.flag.map(|f| (r.unit_key, f)))
                .collect();
            Ok(flags)
        })
        .await
        .map_err(join_error)?
    }

    async fn write_flags(
        &self,
        venue: &str,
        day: DayStamp,
        updates: &HashMap<String, Flag>,
    ) -> StoreResult<usize> {
        let path = self.day_path(venue, day);
        let updates = updates.clone();

        tokio::task::spawn_blocking(move || {
            // Missing day document: the edit stays local until the day is
            // written fresh.
            let Some(mut doc) = read_document(&path)? else {
                return Ok(0);
            };

            let Some(data) = doc.get_mut("data").and_then(Value::as_object_mut) else {
                return Err(StoreError::Decode(format!(
                    "document {} has no data map",
                    path.display()
                )));
            };

            let mut applied = 0;
            for (unit_key, flag) in &updates {
                if let Some(entry) = data.get_mut(unit_key) {
                    entry["flag"] = json!(u8::from(*flag));
                    applied += 1;
                }
            }

            if applied > 0 {
                write_atomic(&path, &doc)?;
            }
            Ok(applied)
        })
        .await
        .map_err(join_error)?
    }
}
