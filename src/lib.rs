//! # DiffGrid Backend
//!
//! Incremental time-series aggregation engine for a venue's per-machine
//! daily "diff" metrics.
//!
//! The engine maintains a rolling window of daily snapshots: an operator
//! pages backward through history, views the data per individual unit or
//! averaged per model, and annotates (date, unit) cells with a categorical
//! flag that is persisted and survives later refetches of the same days.
//!
//! ## Architecture
//!
//! - [`models`]: Day keys, raw snapshot records, and materialized row types
//! - [`store`]: Async store traits and the memory/file backends
//! - [`engine`]: Pure view computation and the flag-preserving row merge
//! - [`loader`]: Per-venue session driving windowed loads and flag edits
//! - [`overlay`]: Flag edit planning and the single in-memory patch routine
//! - [`view`]: Active-view projection and model-name filtering
//! - [`config`]: TOML configuration for the grid and the store backend
//! - [`http`]: Axum-based REST API (feature `http-server`)
//!
//! ## Data flow
//!
//! ```text
//! scroll ──▶ WindowedLoader ──fetch──▶ SnapshotStore
//!               │   accumulate days (append-only)
//!               │   recompute both views (engine)
//!               │   merge, local flags win (engine::merge)
//!               ▼
//!           ViewProjector ──▶ display
//!
//! flag edit ──▶ overlay::plan_edit ──▶ write-set ──▶ AnnotationStore
//!                  └── patch_rows on both in-memory views
//! ```

pub mod config;
pub mod engine;
pub mod loader;
pub mod models;
pub mod overlay;
pub mod store;
pub mod view;

#[cfg(feature = "http-server")]
pub mod http;
