//! Windowed history loading and session state.
//!
//! A [`WindowedLoader`] owns everything one venue view needs: the
//! accumulated raw days, the set of days already requested, and the two
//! materialized views. Paging backward fetches the next window of days,
//! folds them into the accumulated store, recomputes both views, and
//! merges the result flag-preservingly. Switching venue means a new loader;
//! nothing is shared across venues.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;

use crate::config::GridSettings;
use crate::engine;
use crate::models::{
    newest_complete_day, window_ending_at, AccumulatedDays, DayStamp, Flag, ModelView, UnitView,
};
use crate::overlay::{self, EditPlan};
use crate::store::{FullStore, StoreError};

/// Error type for loader operations.
#[derive(Debug, thiserror::Error)]
pub enum LoaderError {
    #[error("window fetch failed: {0}")]
    Fetch(#[from] StoreError),

    #[error("no row '{0}' in the current per-unit view")]
    UnknownRow(String),
}

/// What a window-load attempt did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The window was fetched and merged.
    Loaded {
        /// Days requested, newest first. All of them are now marked loaded,
        /// including days the store had no snapshot for.
        requested: Vec<DayStamp>,
        /// How many of the requested days actually carried data.
        fetched: usize,
    },
    /// Another fetch was already in flight; this trigger was dropped.
    AlreadyLoading,
    /// The loader was reset while the fetch was in flight; the result was
    /// discarded.
    Stale,
}

/// Result of a flag edit: the plan that was applied plus how many entries
/// the store actually persisted (0 when the day document does not exist —
/// the in-memory patch still applied).
#[derive(Debug, Clone)]
pub struct AnnotateOutcome {
    pub plan: EditPlan,
    pub persisted: usize,
}

#[derive(Default)]
struct LoaderState {
    accumulated: AccumulatedDays,
    loaded: BTreeSet<DayStamp>,
    unit_view: UnitView,
    model_view: ModelView,
}

/// Per-venue session: windowed loading, materialized views, flag edits.
pub struct WindowedLoader {
    venue: String,
    store: Arc<dyn FullStore>,
    settings: GridSettings,
    /// Fixed newest day for the first window; when unset the rollover rule
    /// against the current time decides.
    anchor: Option<DayStamp>,
    state: RwLock<LoaderState>,
    in_flight: AtomicBool,
    epoch: AtomicU64,
}

impl WindowedLoader {
    /// Create a loader for one venue.
    pub fn new(venue: impl Into<String>, store: Arc<dyn FullStore>, settings: GridSettings) -> Self {
        Self {
            venue: venue.into(),
            store,
            settings,
            anchor: None,
            state: RwLock::new(LoaderState::default()),
            in_flight: AtomicBool::new(false),
            epoch: AtomicU64::new(0),
        }
    }

    /// Pin the newest day of the first window instead of deriving it from
    /// the clock. Useful for tools and tests that replay a fixed range.
    pub fn anchored_at(mut self, newest: DayStamp) -> Self {
        self.anchor = Some(newest);
        self
    }

    pub fn venue(&self) -> &str {
        &self.venue
    }

    /// Whether a window fetch is currently in flight.
    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Snapshot of the per-unit view. The display layer reads snapshots and
    /// never holds a second copy of the truth.
    pub fn unit_view(&self) -> UnitView {
        self.state.read().unit_view.clone()
    }

    /// Snapshot of the per-model view.
    pub fn model_view(&self) -> ModelView {
        self.state.read().model_view.clone()
    }

    /// Days requested so far, newest first.
    pub fn loaded_days(&self) -> Vec<DayStamp> {
        self.state.read().loaded.iter().rev().copied().collect()
    }

    /// Discard all session state and invalidate any in-flight fetch.
    pub fn reset(&self) {
        self.epoch.fetch_add(1, Ordering::AcqRel);
        *self.state.write() = LoaderState::default();
        log::info!("loader for venue {} reset", self.venue);
    }

    /// Load the next window of days going further back in time.
    ///
    /// At most one fetch is in flight; a second trigger while one is
    /// running is dropped (not queued) and reported as
    /// [`LoadOutcome::AlreadyLoading`]. On fetch failure nothing is
    /// recorded, so the next call requests the same days again.
    pub async fn load_next_window(&self) -> Result<LoadOutcome, LoaderError> {
        if self.in_flight.swap(true, Ordering::AcqRel) {
            log::debug!("venue {}: window load already in flight, dropping", self.venue);
            return Ok(LoadOutcome::AlreadyLoading);
        }
        let _guard = InFlightGuard(&self.in_flight);

        let epoch = self.epoch.load(Ordering::Acquire);
        let requested = self.next_window();

        let fetched = self.store.fetch_snapshots(&self.venue, &requested).await?;
        let fetched_days = fetched.len();

        let mut state = self.state.write();
        // The epoch is checked under the write lock: a reset racing the end
        // of the fetch must never see its result merged into the new state.
        if self.epoch.load(Ordering::Acquire) != epoch {
            log::warn!(
                "venue {}: discarding stale window fetch of {} days",
                self.venue,
                fetched_days
            );
            return Ok(LoadOutcome::Stale);
        }

        let state = &mut *state;
        for (day, records) in fetched {
            // A day, once accumulated, is never overwritten.
            state.accumulated.entry(day).or_insert(records);
        }
        state.loaded.extend(requested.iter().copied());

        let fresh_unit = engine::compute_unit_view(&state.accumulated);
        let fresh_model = engine::compute_model_view(&state.accumulated);
        state.unit_view = engine::merge_unit_views(&state.unit_view, fresh_unit);
        state.model_view = engine::merge_model_views(&state.model_view, fresh_model);

        log::info!(
            "venue {}: loaded window of {} days ({} with data), {} days total",
            self.venue,
            requested.len(),
            fetched_days,
            state.loaded.len()
        );

        Ok(LoadOutcome::Loaded {
            requested,
            fetched: fetched_days,
        })
    }

    /// Apply a flag edit to a unit row.
    ///
    /// The in-memory patch goes through the overlay routine against the
    /// most recently merged rows; persistence follows afterwards and is a
    /// no-op when the day's document does not exist. Edits may run while a
    /// window fetch is in flight.
    pub async fn annotate(
        &self,
        day: DayStamp,
        row_id: &str,
        new_flag: Flag,
    ) -> Result<AnnotateOutcome, LoaderError> {
        let plan = {
            let mut state = self.state.write();
            let state = &mut *state;
            let target = state
                .unit_view
                .rows
                .iter()
                .find(|r| r.row_id == row_id)
                .cloned()
                .ok_or_else(|| LoaderError::UnknownRow(row_id.to_string()))?;

            let day_records = state.accumulated.get(&day).cloned().unwrap_or_default();
            let plan = overlay::plan_edit(day, &target, new_flag, &day_records);
            overlay::patch_rows(&plan, &mut state.unit_view, &mut state.model_view);
            plan
        };

        let persisted = self.store.write_flags(&self.venue, day, &plan.writes).await?;
        if persisted == 0 {
            log::warn!(
                "venue {}: flag edit for {} not persisted (no document); kept locally",
                self.venue,
                day
            );
        }

        Ok(AnnotateOutcome { plan, persisted })
    }

    /// The next `window_size` days to request, newest first: strictly older
    /// than everything loaded, or the rollover-rule window when nothing is
    /// loaded yet.
    fn next_window(&self) -> Vec<DayStamp> {
        let newest = {
            let state = self.state.read();
            match state.loaded.iter().next() {
                Some(oldest) => oldest.pred(),
                None => self.anchor.unwrap_or_else(|| {
                    newest_complete_day(
                        Utc::now(),
                        self.settings.utc_offset_hours,
                        self.settings.cutoff_hour,
                        self.settings.cutoff_minute,
                    )
                }),
            }
        };
        window_ending_at(newest, self.settings.window_size)
    }
}

struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
