//! Aggregation engine: pure view computation and flag-preserving merge.

pub mod aggregate;
pub mod merge;

pub use aggregate::{compute_model_view, compute_unit_view};
pub use merge::{merge_model_views, merge_rows, merge_unit_views, MergeableRow};
