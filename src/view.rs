//! View selection and filtering for the display layer.
//!
//! Stateless over the already-computed views: pick the active projection,
//! apply the model-name filter, and flatten both row families into one
//! serializable row shape. The totals row is always element 0 and is never
//! filtered out.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::{CellValue, DayStamp, Flag, ModelView, UnitView, TOTAL_ROW_ID};

/// Which projection the grid is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// One row per physical unit.
    #[default]
    Unit,
    /// One averaged row per model.
    Model,
}

/// One displayable row, shared by both projections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridRow {
    pub id: String,
    pub is_total: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
    pub cells: BTreeMap<DayStamp, CellValue>,
    pub flags: BTreeMap<DayStamp, Flag>,
}

/// A projected page of the grid: the active rows plus the day columns,
/// newest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridPage {
    pub mode: ViewMode,
    pub days: Vec<DayStamp>,
    pub rows: Vec<GridRow>,
}

/// Project the active view, applying an optional exact model-name filter.
pub fn project(
    unit_view: &UnitView,
    model_view: &ModelView,
    mode: ViewMode,
    model_filter: Option<&str>,
) -> GridPage {
    let (days, mut rows) = match mode {
        ViewMode::Unit => (
            day_columns(&unit_view.totals.values),
            std::iter::once(totals_row(&unit_view.totals.values))
                .chain(unit_view.rows.iter().map(|r| GridRow {
                    id: r.row_id.clone(),
                    is_total: false,
                    unit_number: Some(r.unit_number.clone()),
                    model_name: Some(r.model_name.clone()),
                    cells: r.values.clone(),
                    flags: r.flags.clone(),
                }))
                .collect::<Vec<_>>(),
        ),
        ViewMode::Model => (
            day_columns(&model_view.totals.values),
            std::iter::once(totals_row(&model_view.totals.values))
                .chain(model_view.rows.iter().map(|r| GridRow {
                    id: r.row_id.clone(),
                    is_total: false,
                    unit_number: None,
                    model_name: Some(r.model_name.clone()),
                    cells: r.values.clone(),
                    flags: r.flags.clone(),
                }))
                .collect::<Vec<_>>(),
        ),
    };

    if let Some(name) = model_filter {
        rows.retain(|row| row.is_total || row.model_name.as_deref() == Some(name));
    }

    GridPage { mode, days, rows }
}

/// Distinct model names for the filter control, sorted.
pub fn model_names(unit_view: &UnitView) -> Vec<String> {
    let mut names: Vec<String> = unit_view
        .rows
        .iter()
        .map(|r| r.model_name.clone())
        .collect();
    names.sort();
    names.dedup();
    names
}

fn day_columns(values: &BTreeMap<DayStamp, CellValue>) -> Vec<DayStamp> {
    values.keys().rev().copied().collect()
}

fn totals_row(values: &BTreeMap<DayStamp, CellValue>) -> GridRow {
    GridRow {
        id: TOTAL_ROW_ID.to_string(),
        is_total: true,
        unit_number: None,
        model_name: None,
        cells: values.clone(),
        flags: BTreeMap::new(),
    }
}
