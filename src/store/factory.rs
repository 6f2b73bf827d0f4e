//! Store factory for backend selection.

use std::str::FromStr;
use std::sync::Arc;

use super::error::{StoreError, StoreResult};
use super::file::JsonFileStore;
use super::memory::MemoryStore;
use super::FullStore;
use crate::config::StoreSettings;

/// Store backend type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreType {
    /// In-memory store for tests and local development
    Memory,
    /// JSON document per (venue, day) on the local filesystem
    File,
}

impl FromStr for StoreType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" | "mem" | "local" => Ok(Self::Memory),
            "file" | "json" => Ok(Self::File),
            other => Err(format!(
                "unknown store type '{other}' (expected 'memory' or 'file')"
            )),
        }
    }
}

/// Factory for creating store instances from configuration.
pub struct StoreFactory;

impl StoreFactory {
    /// Create a store from settings.
    pub fn create(settings: &StoreSettings) -> StoreResult<Arc<dyn FullStore>> {
        let store_type =
            StoreType::from_str(&settings.store_type).map_err(StoreError::Configuration)?;

        match store_type {
            StoreType::Memory => Ok(Self::create_memory()),
            StoreType::File => {
                let root = settings.root.as_ref().ok_or_else(|| {
                    StoreError::Configuration(
                        "file store requires 'store.root' setting".to_string(),
                    )
                })?;
                let store = JsonFileStore::open(root)?;
                Ok(Arc::new(store))
            }
        }
    }

    /// Create an in-memory store directly.
    pub fn create_memory() -> Arc<dyn FullStore> {
        Arc::new(MemoryStore::new())
    }
}
