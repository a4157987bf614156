//! Scroll-wheel settling.
//!
//! A [`WheelResolver`] turns a stream of scroll offsets into one discrete index per
//! quiet period. Time only moves through [`WheelResolver::tick`], so the same code
//! runs under Bevy's `Time` and under a test that advances a fake clock.

use std::time::Duration;

use bevy_time::{Stopwatch, Timer, TimerMode};
use tracing::trace;

use crate::{
    config::{PickerConfig, WheelConfig},
    value::{PickerUnit, PickerValue},
};

/// Debounced offset→index resolver for one wheel.
#[derive(Debug, Clone)]
pub struct WheelResolver {
    unit_height: f32,
    debounce: Duration,
    grace: Duration,
    since_open: Stopwatch,
    offset: f32,
    resolved_index: usize,
    pending: Option<(usize, Timer)>,
}

impl WheelResolver {
    /// Start a resolver at `resolved_index`; the grace period starts now.
    #[must_use]
    pub fn new(config: &WheelConfig, resolved_index: usize) -> Self {
        Self {
            unit_height: config.unit_height,
            debounce: config.debounce(),
            grace: config.grace(),
            since_open: Stopwatch::new(),
            offset: resolved_index as f32 * config.unit_height,
            resolved_index,
            pending: None,
        }
    }

    #[must_use]
    pub fn offset(&self) -> f32 {
        self.offset
    }

    #[must_use]
    pub fn resolved_index(&self) -> usize {
        self.resolved_index
    }

    /// Offset that puts `resolved_index` in the selection slot.
    #[must_use]
    pub fn scroll_target(&self) -> f32 {
        self.resolved_index as f32 * self.unit_height
    }

    #[must_use]
    pub fn is_suppressed(&self) -> bool {
        self.since_open.elapsed() < self.grace
    }

    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Nearest row for `offset`, clamped into a list of `len` options.
    #[must_use]
    pub fn index_for_offset(&self, offset: f32, len: usize) -> usize {
        let row = (offset / self.unit_height).round();
        let row = if row.is_finite() && row > 0.0 {
            row as usize
        } else {
            0
        };
        row.min(len.saturating_sub(1))
    }

    /// Record a new offset. Restarts the debounce timer unless the grace period
    /// is still running. Returns whether the offset was scheduled.
    pub fn on_offset_change<T>(&mut self, offset: f32, options: &[T]) -> bool {
        self.offset = offset;

        if options.is_empty() {
            return false;
        }

        if self.is_suppressed() {
            trace!(
                offset,
                since_open = ?self.since_open.elapsed(),
                "wheel offset ignored during open grace period"
            );
            return false;
        }

        let index = self.index_for_offset(offset, options.len());
        self.pending = Some((index, Timer::new(self.debounce, TimerMode::Once)));
        true
    }

    /// Advance the clock. Yields the settled option once the debounce elapses, if
    /// it differs from the current selection.
    pub fn tick<'a, T>(&mut self, delta: Duration, options: &'a [T]) -> Option<(usize, &'a T)> {
        self.since_open.tick(delta);

        let (_, timer) = self.pending.as_mut()?;
        timer.tick(delta);
        if !timer.just_finished() {
            return None;
        }

        let (index, _) = self.pending.take()?;
        if options.is_empty() {
            return None;
        }
        let index = index.min(options.len() - 1);
        if index == self.resolved_index {
            return None;
        }

        self.resolved_index = index;
        options.get(index).map(|option| (index, option))
    }

    /// Move the selection without user input. A pending settle is kept; it still
    /// wins if it lands on a different row.
    pub fn sync_to(&mut self, index: usize) {
        self.resolved_index = index;
    }

    /// Drop any pending settle.
    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

/// The wheels of one open overlay, one resolver per unit.
#[derive(Debug, Clone)]
pub struct WheelSet<V: PickerValue> {
    anchor: V,
    wheels: Vec<(PickerUnit, WheelResolver)>,
}

impl<V: PickerValue> WheelSet<V> {
    /// Build resolvers positioned on `draft`.
    #[must_use]
    pub fn open(draft: &V, config: &PickerConfig) -> Self {
        let anchor = draft.clone();
        let wheels = V::units(&config.mask)
            .into_iter()
            .map(|unit| {
                let index = index_of(draft, unit, &anchor, config);
                (unit, WheelResolver::new(&config.wheel, index))
            })
            .collect();
        Self { anchor, wheels }
    }

    /// Draft captured when the overlay opened.
    #[must_use]
    pub fn anchor(&self) -> &V {
        &self.anchor
    }

    #[must_use]
    pub fn resolver(&self, unit: PickerUnit) -> Option<&WheelResolver> {
        self.wheels
            .iter()
            .find_map(|(u, resolver)| (*u == unit).then_some(resolver))
    }

    /// Feed a scroll offset to the wheel for `unit`.
    pub fn on_offset(
        &mut self,
        unit: PickerUnit,
        offset: f32,
        draft: &V,
        config: &PickerConfig,
    ) -> bool {
        let options = draft.unit_options(unit, &self.anchor, config);
        match self.wheels.iter_mut().find(|(u, _)| *u == unit) {
            Some((_, resolver)) => resolver.on_offset_change(offset, &options),
            None => false,
        }
    }

    /// Advance every wheel and fold settled units into a new draft.
    ///
    /// Units are applied in order against the draft built so far, so a day that
    /// settles in the same tick as its month is clamped against the new month.
    pub fn tick(&mut self, delta: Duration, draft: &V, config: &PickerConfig) -> Option<V> {
        let mut next = draft.clone();
        let mut changed = false;

        for (unit, resolver) in &mut self.wheels {
            let options = next.unit_options(*unit, &self.anchor, config);
            let Some((index, option)) = resolver.tick(delta, &options) else {
                continue;
            };
            if next.unit_value(*unit) == Some(option.value) {
                continue;
            }

            trace!(unit = ?unit, index, value = option.value, "wheel settled");
            next = next.with_unit(*unit, option.value, &config.mask);
            changed = true;
        }

        if changed {
            self.sync_to(&next, config);
        }
        changed.then_some(next)
    }

    /// Re-point every wheel at `draft`, e.g. after a grid click or a clamp.
    pub fn sync_to(&mut self, draft: &V, config: &PickerConfig) {
        for (unit, resolver) in &mut self.wheels {
            resolver.sync_to(index_of(draft, *unit, &self.anchor, config));
        }
    }

    /// Re-anchor on a replaced draft (clear while open) and cancel pending settles.
    pub fn reset(&mut self, draft: &V, config: &PickerConfig) {
        self.anchor = draft.clone();
        for (_, resolver) in &mut self.wheels {
            resolver.cancel();
        }
        self.sync_to(draft, config);
    }
}

fn index_of<V: PickerValue>(
    draft: &V,
    unit: PickerUnit,
    anchor: &V,
    config: &PickerConfig,
) -> usize {
    let current = draft.unit_value(unit);
    draft
        .unit_options(unit, anchor, config)
        .iter()
        .position(|option| Some(option.value) == current)
        .unwrap_or(0)
}
