//! Materialized grid rows produced by the aggregation engine.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::day::DayStamp;
use super::record::Flag;

/// Row id of the synthetic totals/average row, always element 0 of a view.
pub const TOTAL_ROW_ID: &str = "__total__";

/// Row id prefix for per-model averaged rows.
pub const MODEL_ROW_PREFIX: &str = "avg_";

/// One grid cell: a concrete number or "no value".
///
/// Serializes as a plain nullable integer so DTOs can reuse the type
/// directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<i64>", into = "Option<i64>")]
pub enum CellValue {
    Missing,
    Number(i64),
}

impl CellValue {
    pub fn number(self) -> Option<i64> {
        match self {
            CellValue::Missing => None,
            CellValue::Number(n) => Some(n),
        }
    }
}

impl From<Option<i64>> for CellValue {
    fn from(v: Option<i64>) -> Self {
        match v {
            Some(n) => CellValue::Number(n),
            None => CellValue::Missing,
        }
    }
}

impl From<CellValue> for Option<i64> {
    fn from(v: CellValue) -> Self {
        v.number()
    }
}

/// Synthetic totals row carried at the head of each view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TotalsRow {
    pub values: BTreeMap<DayStamp, CellValue>,
}

/// One physical unit's row in the per-unit view.
///
/// Identity is the composite `unit_number + model_name`; `unit_key` is the
/// persistence key of the unit inside the latest day's document, kept so a
/// single-cell flag edit can address the right entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitRow {
    pub row_id: String,
    pub unit_key: String,
    pub unit_number: String,
    pub model_name: String,
    pub values: BTreeMap<DayStamp, CellValue>,
    pub flags: BTreeMap<DayStamp, Flag>,
}

/// One model's averaged row in the per-model view.
///
/// The only flag that ever appears here is [`Flag::WholeModel`], surfaced
/// when any unit of the model carries it for that day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelRow {
    pub row_id: String,
    pub model_name: String,
    pub values: BTreeMap<DayStamp, CellValue>,
    pub flags: BTreeMap<DayStamp, Flag>,
}

impl ModelRow {
    pub fn row_id_for(model_name: &str) -> String {
        format!("{MODEL_ROW_PREFIX}{model_name}")
    }
}

/// Per-unit projection: totals row plus unit rows sorted by cabinet number.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnitView {
    pub totals: TotalsRow,
    pub rows: Vec<UnitRow>,
}

/// Per-model projection: overall-average row plus model rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelView {
    pub totals: TotalsRow,
    pub rows: Vec<ModelRow>,
}
