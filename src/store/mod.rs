//! External store boundary: snapshot fetches and flag persistence.
//!
//! The engine never talks to a database directly; it goes through two small
//! async traits so backends can be swapped:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │  WindowedLoader / overlay (in-memory state)          │
//! └───────────────────┬──────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────┐
//! │  SnapshotStore + AnnotationStore traits              │
//! └───────────────────┬──────────────────────────────────┘
//!                     │
//!     ┌───────────────┴───────────────┐
//!     │  MemoryStore   JsonFileStore  │
//!     └───────────────────────────────┘
//! ```
//!
//! Loosely typed wire documents are coerced into [`RawUnitRecord`] in
//! [`decode`], at this boundary; malformed entries are dropped here and the
//! aggregation engine only ever sees well-formed records.
//!
//! [`RawUnitRecord`]: crate::models::RawUnitRecord

pub mod annotation;
pub mod decode;
pub mod error;
pub mod factory;
pub mod file;
pub mod memory;
pub mod snapshot;

pub use annotation::AnnotationStore;
pub use error::{StoreError, StoreResult};
pub use factory::{StoreFactory, StoreType};
pub use file::JsonFileStore;
pub use memory::MemoryStore;
pub use snapshot::SnapshotStore;

/// Composite trait bound for a complete store implementation.
///
/// Automatically implemented for any type implementing both store traits.
pub trait FullStore: SnapshotStore + AnnotationStore {}

impl<T> FullStore for T where T: SnapshotStore + AnnotationStore {}
