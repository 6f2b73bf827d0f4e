//! Flag edit planning and the single in-memory patch routine.
//!
//! Every flag mutation flows through here: [`plan_edit`] turns an edit
//! gesture into a deterministic per-day write-set for the annotation store,
//! and [`patch_rows`] applies the same edit to both materialized views so
//! they never disagree. Persistence itself is the caller's job.

use std::collections::HashMap;

use crate::models::{DayStamp, Flag, ModelView, RawUnitRecord, UnitRow, UnitView};

/// A planned flag edit: the write-set plus what the in-memory patch needs.
#[derive(Debug, Clone)]
pub struct EditPlan {
    pub day: DayStamp,
    pub previous: Flag,
    pub new_flag: Flag,
    pub model_name: String,
    pub target_row_id: String,
    /// Flag per unit key, addressed to the day's document. All-or-nothing
    /// at the store.
    pub writes: HashMap<String, Flag>,
}

impl EditPlan {
    /// Whether the edit propagates across every unit of the model.
    ///
    /// Setting `WholeModel` spreads it; clearing a unit that currently
    /// carries `WholeModel` retracts it from the whole model. Every other
    /// value targets the single unit.
    pub fn is_whole_model(&self) -> bool {
        self.new_flag == Flag::WholeModel
            || (self.previous == Flag::WholeModel && self.new_flag == Flag::Cleared)
    }
}

/// Plan a flag edit against a unit row of the per-unit view.
///
/// `day_records` is the day's raw snapshot; the whole-model write-set covers
/// exactly the units of the model present in it. When the day was never
/// fetched the write-set falls back to the edited unit alone — persistence
/// then no-ops on the missing document while the in-memory patch still
/// applies.
pub fn plan_edit(
    day: DayStamp,
    target: &UnitRow,
    new_flag: Flag,
    day_records: &[RawUnitRecord],
) -> EditPlan {
    let previous = target.flags.get(&day).copied().unwrap_or(Flag::Cleared);

    let mut plan = EditPlan {
        day,
        previous,
        new_flag,
        model_name: target.model_name.clone(),
        target_row_id: target.row_id.clone(),
        writes: HashMap::new(),
    };

    if plan.is_whole_model() {
        for rec in day_records {
            if rec.model_name == plan.model_name {
                plan.writes.insert(rec.unit_key.clone(), new_flag);
            }
        }
    }
    if plan.writes.is_empty() {
        plan.writes.insert(target.unit_key.clone(), new_flag);
    }

    plan
}

/// Apply a planned edit to both in-memory views.
pub fn patch_rows(plan: &EditPlan, unit_view: &mut UnitView, model_view: &mut ModelView) {
    let whole_model = plan.is_whole_model();

    for row in &mut unit_view.rows {
        let hit = if whole_model {
            row.model_name == plan.model_name
        } else {
            row.row_id == plan.target_row_id
        };
        if hit {
            row.flags.insert(plan.day, plan.new_flag);
        }
    }

    // The model row only ever shows the whole-model flag: set on spread,
    // removed on retraction, untouched by single-unit edits.
    if whole_model {
        for row in &mut model_view.rows {
            if row.model_name == plan.model_name {
                if plan.new_flag == Flag::WholeModel {
                    row.flags.insert(plan.day, Flag::WholeModel);
                } else {
                    row.flags.remove(&plan.day);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{compute_model_view, compute_unit_view};
    use crate::models::AccumulatedDays;

    fn day(s: &str) -> DayStamp {
        DayStamp::parse(s).unwrap()
    }

    fn rec(key: &str, number: &str, model: &str, flag: Option<Flag>) -> RawUnitRecord {
        RawUnitRecord {
            unit_key: key.to_string(),
            unit_number: number.to_string(),
            model_name: model.to_string(),
            diff: Some(100),
            flag,
        }
    }

    fn fixture() -> (AccumulatedDays, UnitView, ModelView) {
        let mut acc = AccumulatedDays::new();
        acc.insert(
            day("20240101"),
            vec![
                rec("a", "1", "M", None),
                rec("b", "2", "M", None),
                rec("c", "3", "M", None),
                rec("d", "4", "N", None),
            ],
        );
        let unit = compute_unit_view(&acc);
        let model = compute_model_view(&acc);
        (acc, unit, model)
    }

    #[test]
    fn test_whole_model_set_covers_every_unit_of_model() {
        let (acc, unit, _) = fixture();
        let d = day("20240101");
        let target = unit.rows.iter().find(|r| r.unit_key == "b").unwrap();

        let plan = plan_edit(d, target, Flag::WholeModel, &acc[&d]);

        assert!(plan.is_whole_model());
        assert_eq!(plan.writes.len(), 3);
        for key in ["a", "b", "c"] {
            assert_eq!(plan.writes.get(key), Some(&Flag::WholeModel));
        }
        assert!(!plan.writes.contains_key("d"));
    }

    #[test]
    fn test_whole_model_retraction_covers_every_unit_of_model() {
        let mut acc = AccumulatedDays::new();
        let d = day("20240101");
        acc.insert(
            d,
            vec![
                rec("a", "1", "M", Some(Flag::WholeModel)),
                rec("b", "2", "M", Some(Flag::WholeModel)),
                rec("d", "4", "N", None),
            ],
        );
        let unit = compute_unit_view(&acc);
        let target = unit.rows.iter().find(|r| r.unit_key == "a").unwrap();

        let plan = plan_edit(d, target, Flag::Cleared, &acc[&d]);

        assert!(plan.is_whole_model());
        assert_eq!(plan.writes.len(), 2);
        assert_eq!(plan.writes.get("a"), Some(&Flag::Cleared));
        assert_eq!(plan.writes.get("b"), Some(&Flag::Cleared));
    }

    #[test]
    fn test_single_unit_edit_targets_one_key() {
        let (acc, unit, _) = fixture();
        let d = day("20240101");
        let target = unit.rows.iter().find(|r| r.unit_key == "b").unwrap();

        let plan = plan_edit(d, target, Flag::Setting6, &acc[&d]);

        assert!(!plan.is_whole_model());
        assert_eq!(plan.writes.len(), 1);
        assert_eq!(plan.writes.get("b"), Some(&Flag::Setting6));
    }

    #[test]
    fn test_clear_without_prior_whole_model_is_single() {
        let (acc, unit, _) = fixture();
        let d = day("20240101");
        let target = unit.rows.iter().find(|r| r.unit_key == "b").unwrap();

        let plan = plan_edit(d, target, Flag::Cleared, &acc[&d]);
        assert!(!plan.is_whole_model());
        assert_eq!(plan.writes.len(), 1);
    }

    #[test]
    fn test_patch_updates_both_views() {
        let (acc, mut unit, mut model) = fixture();
        let d = day("20240101");
        let target = unit.rows.iter().find(|r| r.unit_key == "b").unwrap().clone();

        let plan = plan_edit(d, &target, Flag::WholeModel, &acc[&d]);
        patch_rows(&plan, &mut unit, &mut model);

        for row in unit.rows.iter().filter(|r| r.model_name == "M") {
            assert_eq!(row.flags.get(&d), Some(&Flag::WholeModel));
        }
        let other = unit.rows.iter().find(|r| r.model_name == "N").unwrap();
        assert_eq!(other.flags.get(&d), None);

        let m = model.rows.iter().find(|r| r.model_name == "M").unwrap();
        assert_eq!(m.flags.get(&d), Some(&Flag::WholeModel));
    }

    #[test]
    fn test_patch_retraction_clears_model_row() {
        let (acc, mut unit, mut model) = fixture();
        let d = day("20240101");
        let target = unit.rows.iter().find(|r| r.unit_key == "b").unwrap().clone();

        let set = plan_edit(d, &target, Flag::WholeModel, &acc[&d]);
        patch_rows(&set, &mut unit, &mut model);

        let target = unit.rows.iter().find(|r| r.unit_key == "b").unwrap().clone();
        let clear = plan_edit(d, &target, Flag::Cleared, &acc[&d]);
        assert!(clear.is_whole_model());
        patch_rows(&clear, &mut unit, &mut model);

        for row in unit.rows.iter().filter(|r| r.model_name == "M") {
            assert_eq!(row.flags.get(&d), Some(&Flag::Cleared));
        }
        let m = model.rows.iter().find(|r| r.model_name == "M").unwrap();
        assert_eq!(m.flags.get(&d), None);
    }

    #[test]
    fn test_single_patch_leaves_model_row_untouched() {
        let (acc, mut unit, mut model) = fixture();
        let d = day("20240101");
        let target = unit.rows.iter().find(|r| r.unit_key == "b").unwrap().clone();

        let plan = plan_edit(d, &target, Flag::Setting56, &acc[&d]);
        patch_rows(&plan, &mut unit, &mut model);

        let edited = unit.rows.iter().find(|r| r.unit_key == "b").unwrap();
        assert_eq!(edited.flags.get(&d), Some(&Flag::Setting56));
        let untouched = unit.rows.iter().find(|r| r.unit_key == "a").unwrap();
        assert_eq!(untouched.flags.get(&d), None);

        let m = model.rows.iter().find(|r| r.model_name == "M").unwrap();
        assert_eq!(m.flags.get(&d), None);
    }

    #[test]
    fn test_edit_on_unfetched_day_falls_back_to_target() {
        let (_, unit, _) = fixture();
        let d = day("20231201");
        let target = unit.rows.iter().find(|r| r.unit_key == "b").unwrap();

        let plan = plan_edit(d, target, Flag::WholeModel, &[]);
        assert_eq!(plan.writes.len(), 1);
        assert_eq!(plan.writes.get("b"), Some(&Flag::WholeModel));
    }
}
