//! HTTP server module for the diffgrid backend.
//!
//! This module provides an axum-based HTTP server that exposes the grid
//! engine as a REST API. It reuses the loader sessions, store traits, and
//! view projection from the core library.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  HTTP Layer (axum handlers)                               │
//! │  - Request parsing and validation                         │
//! │  - JSON serialization/deserialization                     │
//! │  - CORS, compression, error handling                      │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Session Layer (loader.rs)                                │
//! │  - Per-venue windowed loading                             │
//! │  - View recomputation and flag edits                      │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Store Layer (store/)                                     │
//! │  - Snapshot and annotation persistence                    │
//! │  - MemoryStore / JsonFileStore                            │
//! └──────────────────────────────────────────────────────────┘
//! ```

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::create_router;
pub use state::AppState;
