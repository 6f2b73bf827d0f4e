//! Property tests for the aggregation engine and merge.

use std::collections::HashSet;

use proptest::prelude::*;

use diffgrid::engine::{compute_model_view, compute_unit_view, merge_unit_views};
use diffgrid::models::{AccumulatedDays, CellValue, DayStamp, Flag, RawUnitRecord};
use diffgrid::view::{self, ViewMode};

const MODELS: [&str; 3] = ["Alpha", "Beta", "Gamma"];

fn acc_strategy() -> impl Strategy<Value = AccumulatedDays> {
    let record = (1u8..=20, 0usize..MODELS.len(), prop::option::of(-500i64..500));
    let day_records = prop::collection::vec(record, 0..25);

    prop::collection::vec(day_records, 1..4).prop_map(|days| {
        let mut acc = AccumulatedDays::new();
        for (i, raw) in days.into_iter().enumerate() {
            let day = DayStamp::parse(&format!("202401{:02}", i + 1)).unwrap();
            let mut seen = HashSet::new();
            let mut records = Vec::new();
            for (unit, model_idx, diff) in raw {
                if seen.insert((unit, model_idx)) {
                    let model = MODELS[model_idx];
                    records.push(RawUnitRecord {
                        unit_key: format!("k{unit}{model}"),
                        unit_number: unit.to_string(),
                        model_name: model.to_string(),
                        diff,
                        flag: None,
                    });
                }
            }
            acc.insert(day, records);
        }
        acc
    })
}

proptest! {
    #[test]
    fn prop_unit_totals_match_day_sums(acc in acc_strategy()) {
        let view = compute_unit_view(&acc);
        for (day, records) in &acc {
            let sum: i64 = records.iter().filter_map(|r| r.diff).sum();
            let expected = if sum == 0 {
                CellValue::Missing
            } else {
                CellValue::Number(sum)
            };
            prop_assert_eq!(view.totals.values.get(day), Some(&expected));
        }
    }

    #[test]
    fn prop_rows_restricted_to_latest_day(acc in acc_strategy()) {
        let view = compute_unit_view(&acc);
        let latest = *acc.keys().next_back().unwrap();
        for row in &view.rows {
            prop_assert!(row.values.contains_key(&latest));
        }
        let on_latest: HashSet<String> = acc[&latest].iter().map(|r| r.row_id()).collect();
        prop_assert_eq!(view.rows.len(), on_latest.len());
    }

    #[test]
    fn prop_merge_with_self_is_identity(acc in acc_strategy()) {
        let view = compute_unit_view(&acc);
        let merged = merge_unit_views(&view, view.clone());
        prop_assert_eq!(&merged, &view);
    }

    #[test]
    fn prop_merge_keeps_previous_flag_entries(acc in acc_strategy()) {
        let fresh = compute_unit_view(&acc);
        prop_assume!(!fresh.rows.is_empty());

        let day = *acc.keys().next_back().unwrap();
        let mut previous = fresh.clone();
        previous.rows[0].flags.insert(day, Flag::Setting6);
        let row_id = previous.rows[0].row_id.clone();

        let merged = merge_unit_views(&previous, fresh);
        let row = merged.rows.iter().find(|r| r.row_id == row_id).unwrap();
        prop_assert_eq!(row.flags.get(&day), Some(&Flag::Setting6));
    }

    #[test]
    fn prop_model_average_stays_within_group_bounds(acc in acc_strategy()) {
        let view = compute_model_view(&acc);
        for (day, records) in &acc {
            for row in &view.rows {
                let diffs: Vec<i64> = records
                    .iter()
                    .filter(|r| r.model_name == row.model_name)
                    .filter_map(|r| r.diff)
                    .collect();
                let Some(CellValue::Number(avg)) = row.values.get(day).copied() else {
                    continue;
                };
                let min = *diffs.iter().min().unwrap();
                let max = *diffs.iter().max().unwrap();
                prop_assert!(min <= avg && avg <= max);
            }
        }
    }

    #[test]
    fn prop_projection_totals_first_and_filter_exact(acc in acc_strategy()) {
        let unit = compute_unit_view(&acc);
        let model = compute_model_view(&acc);

        let page = view::project(&unit, &model, ViewMode::Unit, Some("Alpha"));
        prop_assert!(page.rows[0].is_total);
        for row in page.rows.iter().skip(1) {
            prop_assert_eq!(row.model_name.as_deref(), Some("Alpha"));
        }

        let page = view::project(&unit, &model, ViewMode::Model, None);
        prop_assert!(page.rows[0].is_total);
        prop_assert_eq!(page.rows.len(), model.rows.len() + 1);
    }
}
