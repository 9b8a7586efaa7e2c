//! Per-dimension animation state
//!
//! A [`DimensionState`] is an immutable-by-convention record: every update
//! produces a fresh copy that the [`StateStore`] writes back in one step. The
//! per-tick update is therefore a pure function of the old record and the
//! current time.

use std::fmt;

use rustc_hash::FxHashMap;

use crate::dimension::Dimension;
use crate::easing::EasingFunction;

/// Timing and progress for one animated dimension
#[derive(Clone)]
pub struct DimensionState {
    phase: f64,
    duration: f64,
    start_time: f64,
    end_time: f64,
    enabled: bool,
    easing: Option<EasingFunction>,
}

impl DimensionState {
    /// A freshly armed record starting at `start_time`
    ///
    /// A zero duration yields a record that is already settled.
    pub(crate) fn armed(duration: f64, start_time: f64, easing: Option<EasingFunction>) -> Self {
        let running = duration > 0.0;
        Self {
            phase: if running { 0.0 } else { 1.0 },
            duration,
            start_time,
            end_time: start_time + duration,
            enabled: running,
            easing,
        }
    }

    /// The record as it should look at `now`
    ///
    /// Disabled records are returned unchanged. Progress is recomputed from
    /// the clamped elapsed time, never accumulated, so skipped or uneven
    /// ticks land on the same value.
    pub(crate) fn advanced(&self, now: f64) -> Self {
        if !self.enabled {
            return self.clone();
        }

        let elapsed = (now - self.start_time).clamp(0.0, self.duration);
        if elapsed >= self.duration {
            return self.settled();
        }

        let raw = match &self.easing {
            Some(easing) => easing(elapsed, self.duration),
            None => elapsed / self.duration,
        };
        let phase = if raw.is_nan() { 0.0 } else { raw.clamp(0.0, 1.0) };

        if phase >= 1.0 {
            self.settled()
        } else {
            Self {
                phase,
                ..self.clone()
            }
        }
    }

    /// The record forced to its terminal state
    pub(crate) fn settled(&self) -> Self {
        Self {
            phase: 1.0,
            enabled: false,
            ..self.clone()
        }
    }

    /// The record with ticking switched off and progress left where it is
    pub(crate) fn disabled(&self) -> Self {
        Self {
            enabled: false,
            ..self.clone()
        }
    }

    /// Normalized progress in `[0, 1]`
    pub fn phase(&self) -> f64 {
        self.phase
    }

    /// Total length in seconds
    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    pub fn end_time(&self) -> f64 {
        self.end_time
    }

    /// Whether ticks still advance this dimension
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Whether the dimension reached its terminal state
    pub fn is_settled(&self) -> bool {
        !self.enabled && self.phase >= 1.0
    }

    pub fn easing(&self) -> Option<&EasingFunction> {
        self.easing.as_ref()
    }
}

impl fmt::Debug for DimensionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DimensionState")
            .field("phase", &self.phase)
            .field("duration", &self.duration)
            .field("start_time", &self.start_time)
            .field("end_time", &self.end_time)
            .field("enabled", &self.enabled)
            .field("easing", &self.easing.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

/// Dimension → state mapping owned by the animator
///
/// Entries are inserted or replaced, never removed.
#[derive(Default)]
pub(crate) struct StateStore {
    states: FxHashMap<Dimension, DimensionState>,
}

impl StateStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the record for `dimension`
    pub(crate) fn insert(&mut self, dimension: Dimension, state: DimensionState) {
        self.states.insert(dimension, state);
    }

    pub(crate) fn get(&self, dimension: Dimension) -> Option<&DimensionState> {
        self.states.get(&dimension)
    }

    /// Stored phase, or `1.0` for a dimension that was never armed
    pub(crate) fn phase(&self, dimension: Dimension) -> f64 {
        self.get(dimension).map_or(1.0, DimensionState::phase)
    }

    /// Read-copy-write update of every record
    fn update_all<F>(&mut self, f: F)
    where
        F: Fn(&DimensionState) -> DimensionState,
    {
        for state in self.states.values_mut() {
            *state = f(state);
        }
    }

    /// Recompute every enabled record for `now`
    ///
    /// Returns how many records were advanced.
    pub(crate) fn advance_enabled(&mut self, now: f64) -> usize {
        let mut advanced = 0;
        for state in self.states.values_mut() {
            if state.is_enabled() {
                *state = state.advanced(now);
                advanced += 1;
            }
        }
        advanced
    }

    pub(crate) fn any_enabled(&self) -> bool {
        self.states.values().any(DimensionState::is_enabled)
    }

    /// Whether any record is still short of `1.0`
    pub(crate) fn any_unfinished(&self) -> bool {
        self.states.values().any(|state| state.phase() < 1.0)
    }

    pub(crate) fn disable_all(&mut self) {
        self.update_all(DimensionState::disabled);
    }

    pub(crate) fn settle_all(&mut self) {
        self.update_all(DimensionState::settled);
    }

    /// Latest end time across all records
    pub(crate) fn max_end_time(&self) -> Option<f64> {
        self.states
            .values()
            .map(DimensionState::end_time)
            .reduce(f64::max)
    }

    /// Armed dimensions in declaration order
    pub(crate) fn dimensions(&self) -> Vec<Dimension> {
        let mut dimensions: Vec<_> = self.states.keys().copied().collect();
        dimensions.sort();
        dimensions
    }

    pub(crate) fn len(&self) -> usize {
        self.states.len()
    }
}
