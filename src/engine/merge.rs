//! Flag-preserving merge of freshly computed rows into materialized rows.
//!
//! A window load recomputes both views from the accumulated raw store. The
//! recomputed rows are authoritative for every non-flag field, but flag
//! entries the session already holds must win over what the fresh fetch
//! reports for the same day — otherwise a local edit racing a refetch of
//! that day would be silently overwritten.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::models::{DayStamp, Flag, ModelRow, ModelView, UnitRow, UnitView};

/// A row family the merge applies to.
pub trait MergeableRow {
    fn row_id(&self) -> &str;
    fn flags(&self) -> &BTreeMap<DayStamp, Flag>;
    fn flags_mut(&mut self) -> &mut BTreeMap<DayStamp, Flag>;
}

impl MergeableRow for UnitRow {
    fn row_id(&self) -> &str {
        &self.row_id
    }
    fn flags(&self) -> &BTreeMap<DayStamp, Flag> {
        &self.flags
    }
    fn flags_mut(&mut self) -> &mut BTreeMap<DayStamp, Flag> {
        &mut self.flags
    }
}

impl MergeableRow for ModelRow {
    fn row_id(&self) -> &str {
        &self.row_id
    }
    fn flags(&self) -> &BTreeMap<DayStamp, Flag> {
        &self.flags
    }
    fn flags_mut(&mut self) -> &mut BTreeMap<DayStamp, Flag> {
        &mut self.flags
    }
}

/// Merge fresh rows over previous ones.
///
/// Fresh rows keep their order and all their data, except that per-day flag
/// entries already present on the matching previous row take precedence.
/// Previous rows with no fresh counterpart are retained at the tail so no
/// locally known row vanishes mid-session.
pub fn merge_rows<R: MergeableRow + Clone>(previous: &[R], fresh: Vec<R>) -> Vec<R> {
    let prev_by_id: HashMap<&str, &R> = previous.iter().map(|r| (r.row_id(), r)).collect();

    let mut fresh_ids: HashSet<String> = HashSet::with_capacity(fresh.len());
    let mut merged: Vec<R> = fresh
        .into_iter()
        .map(|mut row| {
            fresh_ids.insert(row.row_id().to_string());
            if let Some(prev) = prev_by_id.get(row.row_id()) {
                for (day, flag) in prev.flags() {
                    row.flags_mut().insert(*day, *flag);
                }
            }
            row
        })
        .collect();

    for prev in previous {
        if !fresh_ids.contains(prev.row_id()) {
            merged.push(prev.clone());
        }
    }

    merged
}

/// Merge a freshly computed per-unit view into the previous one.
pub fn merge_unit_views(previous: &UnitView, fresh: UnitView) -> UnitView {
    UnitView {
        totals: fresh.totals,
        rows: merge_rows(&previous.rows, fresh.rows),
    }
}

/// Merge a freshly computed per-model view into the previous one.
pub fn merge_model_views(previous: &ModelView, fresh: ModelView) -> ModelView {
    ModelView {
        totals: fresh.totals,
        rows: merge_rows(&previous.rows, fresh.rows),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CellValue;

    fn day(s: &str) -> DayStamp {
        DayStamp::parse(s).unwrap()
    }

    fn unit_row(id: &str, flags: &[(&str, Flag)]) -> UnitRow {
        UnitRow {
            row_id: id.to_string(),
            unit_key: format!("key_{id}"),
            unit_number: "1".to_string(),
            model_name: "M".to_string(),
            values: BTreeMap::from([(day("20240101"), CellValue::Number(1))]),
            flags: flags.iter().map(|(d, f)| (day(d), *f)).collect(),
        }
    }

    #[test]
    fn test_previous_flags_win_over_fresh() {
        // Session holds 6 for the day; the refetched snapshot reports
        // nothing for it. The merged row must still show 6.
        let previous = vec![unit_row("1_M", &[("20240101", Flag::Setting6)])];
        let fresh = vec![unit_row("1_M", &[])];

        let merged = merge_rows(&previous, fresh);
        assert_eq!(merged[0].flags.get(&day("20240101")), Some(&Flag::Setting6));
    }

    #[test]
    fn test_previous_cleared_flag_wins_too() {
        // An explicit local clear must not be resurrected by a stale 9.
        let previous = vec![unit_row("1_M", &[("20240101", Flag::Cleared)])];
        let fresh = vec![unit_row("1_M", &[("20240101", Flag::WholeModel)])];

        let merged = merge_rows(&previous, fresh);
        assert_eq!(merged[0].flags.get(&day("20240101")), Some(&Flag::Cleared));
    }

    #[test]
    fn test_fresh_flags_kept_for_new_days() {
        let previous = vec![unit_row("1_M", &[("20240102", Flag::Setting6)])];
        let fresh = vec![unit_row("1_M", &[("20240101", Flag::Setting456)])];

        let merged = merge_rows(&previous, fresh);
        assert_eq!(
            merged[0].flags.get(&day("20240101")),
            Some(&Flag::Setting456)
        );
        assert_eq!(merged[0].flags.get(&day("20240102")), Some(&Flag::Setting6));
    }

    #[test]
    fn test_non_flag_fields_taken_from_fresh() {
        let mut prev = unit_row("1_M", &[]);
        prev.values.insert(day("20240101"), CellValue::Number(999));
        let fresh = vec![unit_row("1_M", &[])];

        let merged = merge_rows(&[prev], fresh);
        assert_eq!(
            merged[0].values.get(&day("20240101")),
            Some(&CellValue::Number(1))
        );
    }

    #[test]
    fn test_previous_only_rows_retained_at_tail() {
        let previous = vec![unit_row("9_M", &[("20240101", Flag::Setting56)])];
        let fresh = vec![unit_row("1_M", &[])];

        let merged = merge_rows(&previous, fresh);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].row_id, "1_M");
        assert_eq!(merged[1].row_id, "9_M");
    }

    #[test]
    fn test_fresh_order_preserved() {
        let previous = vec![unit_row("2_M", &[]), unit_row("1_M", &[])];
        let fresh = vec![unit_row("1_M", &[]), unit_row("2_M", &[])];

        let merged = merge_rows(&previous, fresh);
        let ids: Vec<&str> = merged.iter().map(|r| r.row_id.as_str()).collect();
        assert_eq!(ids, vec!["1_M", "2_M"]);
    }
}
