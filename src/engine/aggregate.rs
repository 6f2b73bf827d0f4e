//! Pure view computation over the accumulated raw days.
//!
//! Both functions take the whole accumulated store and rebuild their view
//! from scratch; merging with previously materialized rows (and the flag
//! overlay precedence that comes with it) happens afterwards in
//! [`merge`](super::merge). Recomputing both views on every window load is
//! deliberate — windows are small and it keeps the inactive view from ever
//! going stale.

use std::collections::{BTreeMap, HashMap};

use crate::models::{
    AccumulatedDays, CellValue, Flag, ModelRow, ModelView, RawUnitRecord, TotalsRow, UnitRow,
    UnitView,
};

/// Reshape the accumulated days into the per-unit grid.
///
/// Rows are keyed by the composite `unit_number + model_name` identity,
/// restricted to identities present on the latest loaded day, and sorted by
/// cabinet number interpreted numerically (non-numeric labels sort after
/// all numeric ones, by string).
pub fn compute_unit_view(accumulated: &AccumulatedDays) -> UnitView {
    let Some(latest) = accumulated.keys().next_back().copied() else {
        return UnitView::default();
    };

    let mut by_id: HashMap<String, UnitRow> = HashMap::new();

    for (day, records) in accumulated {
        for rec in records.iter().filter(|r| has_identity(r)) {
            let row = by_id.entry(rec.row_id()).or_insert_with(|| UnitRow {
                row_id: rec.row_id(),
                unit_key: rec.unit_key.clone(),
                unit_number: rec.unit_number.clone(),
                model_name: rec.model_name.clone(),
                values: BTreeMap::new(),
                flags: BTreeMap::new(),
            });

            row.values.insert(*day, CellValue::from(rec.diff));
            if let Some(flag) = rec.flag {
                row.flags.insert(*day, flag);
            }
            // The latest day's document key is the one flag edits address.
            if *day == latest {
                row.unit_key = rec.unit_key.clone();
            }
        }
    }

    // A row survives only if the latest day has a slot for it. A null diff
    // still counts as a slot; a unit entirely absent from the latest
    // snapshot does not.
    let mut rows: Vec<UnitRow> = by_id
        .into_values()
        .filter(|row| row.values.contains_key(&latest))
        .collect();

    rows.sort_by_cached_key(|row| unit_sort_key(&row.unit_number));

    UnitView {
        totals: unit_totals(accumulated),
        rows,
    }
}

/// Reshape the accumulated days into the per-model averaged grid.
pub fn compute_model_view(accumulated: &AccumulatedDays) -> ModelView {
    let Some(latest) = accumulated.keys().next_back().copied() else {
        return ModelView::default();
    };

    let mut by_model: HashMap<String, ModelRow> = HashMap::new();

    for (day, records) in accumulated {
        let mut groups: HashMap<&str, DayGroup> = HashMap::new();
        for rec in records.iter().filter(|r| has_identity(r)) {
            let group = groups.entry(rec.model_name.as_str()).or_default();
            if let Some(diff) = rec.diff {
                group.count += 1;
                group.sum += diff;
            }
            if rec.flag == Some(Flag::WholeModel) {
                group.any_whole_model = true;
            }
        }

        for (model, group) in groups {
            let row = by_model
                .entry(model.to_string())
                .or_insert_with(|| ModelRow {
                    row_id: ModelRow::row_id_for(model),
                    model_name: model.to_string(),
                    values: BTreeMap::new(),
                    flags: BTreeMap::new(),
                });

            row.values.insert(*day, group.average());
            if group.any_whole_model {
                row.flags.insert(*day, Flag::WholeModel);
            }
        }
    }

    let mut rows: Vec<ModelRow> = by_model
        .into_values()
        .filter(|row| row.values.contains_key(&latest))
        .collect();

    // Order models by the smallest cabinet number they occupy on the latest
    // day; ties (and purely non-numeric labels) fall back to the name.
    let min_units = min_unit_by_model(accumulated.get(&latest));
    rows.sort_by_cached_key(|row| {
        (
            min_units.get(&row.model_name).copied().unwrap_or(i64::MAX),
            row.model_name.clone(),
        )
    });

    ModelView {
        totals: model_totals(accumulated),
        rows,
    }
}

#[derive(Default)]
struct DayGroup {
    count: i64,
    sum: i64,
    any_whole_model: bool,
}

impl DayGroup {
    fn average(&self) -> CellValue {
        if self.count == 0 {
            CellValue::Missing
        } else {
            CellValue::Number(round_half_away(self.sum, self.count))
        }
    }
}

fn has_identity(rec: &RawUnitRecord) -> bool {
    !rec.unit_number.is_empty() && !rec.model_name.is_empty()
}

/// Rounded mean, half away from zero (matches `f64::round`).
fn round_half_away(sum: i64, count: i64) -> i64 {
    (sum as f64 / count as f64).round() as i64
}

fn unit_sort_key(number: &str) -> (u8, i64, String) {
    match number.trim().parse::<i64>() {
        Ok(n) => (0, n, String::new()),
        Err(_) => (1, 0, number.to_string()),
    }
}

fn min_unit_by_model(latest_records: Option<&Vec<RawUnitRecord>>) -> HashMap<String, i64> {
    let mut mins: HashMap<String, i64> = HashMap::new();
    for rec in latest_records.into_iter().flatten() {
        if let Ok(n) = rec.unit_number.trim().parse::<i64>() {
            mins.entry(rec.model_name.clone())
                .and_modify(|m| *m = (*m).min(n))
                .or_insert(n);
        }
    }
    mins
}

/// Per-day sum over every unit. An exact-zero sum renders as a missing
/// cell; this is the grid's display convention, not a data-absence signal.
fn unit_totals(accumulated: &AccumulatedDays) -> TotalsRow {
    let mut values = BTreeMap::new();
    for (day, records) in accumulated {
        let sum: i64 = records.iter().filter_map(|r| r.diff).sum();
        let cell = if sum == 0 {
            CellValue::Missing
        } else {
            CellValue::Number(sum)
        };
        values.insert(*day, cell);
    }
    TotalsRow { values }
}

/// Per-day mean over every unit with a concrete diff, across all models.
/// Unlike the per-unit totals, a true zero mean is shown as zero.
fn model_totals(accumulated: &AccumulatedDays) -> TotalsRow {
    let mut values = BTreeMap::new();
    for (day, records) in accumulated {
        let mut group = DayGroup::default();
        for rec in records {
            if let Some(diff) = rec.diff {
                group.count += 1;
                group.sum += diff;
            }
        }
        values.insert(*day, group.average());
    }
    TotalsRow { values }
}
