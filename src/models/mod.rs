//! Core data model: day keys, raw snapshot records, and materialized rows.

pub mod day;
pub mod record;
pub mod rows;

pub use day::{newest_complete_day, window_ending_at, DayStamp, DayStampError};
pub use record::{Flag, RawUnitRecord, UnknownFlag};
pub use rows::{
    CellValue, ModelRow, ModelView, TotalsRow, UnitRow, UnitView, MODEL_ROW_PREFIX, TOTAL_ROW_ID,
};

use std::collections::BTreeMap;

/// Accumulated raw snapshots keyed by day.
///
/// Append-only at the day level: a day, once fetched, is never overwritten.
/// `BTreeMap` keeps the keys in chronological order, so the newest loaded
/// day is always the last key.
pub type AccumulatedDays = BTreeMap<DayStamp, Vec<RawUnitRecord>>;
