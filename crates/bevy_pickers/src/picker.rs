use std::{borrow::Cow, time::Duration};

use bevy_ecs::prelude::Component;
use tracing::{debug, trace};

use crate::{
    config::{ConfigError, PickerConfig},
    grid::{CalendarView, MonthGrid, month_grid},
    mask,
    sync::{EditOutcome, Fallback, SyncPhase, Synchronizer},
    value::{DateValue, PickerUnit, PickerValue, TimeValue, UnitOption, YEAR_RANGE},
    wheel::WheelSet,
};

/// One date or time picker: masked text field plus an overlay selector.
///
/// Presentation layers feed user input through the `on_*` methods and read the
/// resulting state back through the accessors. Wheel settling only progresses
/// through [`Picker::tick`].
#[derive(Component, Debug, Clone)]
pub struct Picker<V: PickerValue> {
    config: PickerConfig,
    sync: Synchronizer<V>,
    wheels: Option<WheelSet<V>>,
    /// Month shown by a calendar overlay when it differs from the draft's month.
    browsed_month: Option<CalendarView>,
}

impl<V: PickerValue> Picker<V> {
    /// Build a picker from a validated configuration and an initial value.
    pub fn new(config: PickerConfig, initial: Option<V>) -> Result<Self, ConfigError> {
        config.validate()?;
        if config.mask.kind != V::KIND {
            return Err(ConfigError::MaskKindMismatch {
                expected: V::KIND,
                found: config.mask.kind,
            });
        }

        let fallback = match config.fallback.as_deref() {
            None => Fallback::Now,
            Some(text) => {
                let formatted = mask::format(text, &config.mask);
                let value = V::parse_masked(&formatted, &config.mask).ok_or_else(|| {
                    ConfigError::InvalidFallback {
                        text: text.to_owned(),
                    }
                })?;
                Fallback::Fixed(value)
            }
        };

        Ok(Self {
            sync: Synchronizer::new(config.mask, fallback, initial),
            config,
            wheels: None,
            browsed_month: None,
        })
    }

    #[must_use]
    pub fn config(&self) -> &PickerConfig {
        &self.config
    }

    pub fn on_focus(&mut self) {
        self.sync.focus();
    }

    pub fn on_blur(&mut self) {
        self.sync.blur();
    }

    /// Feed the text field's current contents.
    pub fn on_raw_text_edit(&mut self, text: &str) -> EditOutcome<V> {
        let outcome = self.sync.edit_text(text);
        if matches!(outcome, EditOutcome::Committed(_)) {
            self.browsed_month = None;
            if let Some(wheels) = &mut self.wheels {
                wheels.sync_to(self.sync.draft(), &self.config);
            }
        }
        outcome
    }

    /// A grid cell for one unit was clicked.
    pub fn on_grid_unit_selected(&mut self, unit: PickerUnit, value: i32) -> bool {
        let next = self
            .sync
            .draft()
            .with_unit(unit, value, &self.config.mask);
        self.on_value_selected(next)
    }

    /// Replace the whole draft from the overlay.
    pub fn on_value_selected(&mut self, value: V) -> bool {
        if !self.sync.select(value) {
            return false;
        }
        self.browsed_month = None;
        if let Some(wheels) = &mut self.wheels {
            wheels.sync_to(self.sync.draft(), &self.config);
        }
        if self.config.confirm_on_select {
            self.on_confirm();
        }
        true
    }

    /// A wheel was scrolled to `offset`. The draft changes once it settles.
    pub fn on_scroll_offset(&mut self, unit: PickerUnit, offset: f32) -> bool {
        match &mut self.wheels {
            Some(wheels) => wheels.on_offset(unit, offset, self.sync.draft(), &self.config),
            None => {
                trace!(unit = ?unit, offset, "scroll ignored, overlay is closed");
                false
            }
        }
    }

    pub fn on_open(&mut self) -> bool {
        if !self.sync.open() {
            return false;
        }
        self.browsed_month = None;
        self.wheels = Some(WheelSet::open(self.sync.draft(), &self.config));
        debug!(draft = ?self.sync.draft(), "picker opened");
        true
    }

    pub fn on_confirm(&mut self) -> bool {
        if !self.sync.confirm() {
            return false;
        }
        self.close_overlay();
        true
    }

    /// Close without confirming (outside click, escape).
    pub fn on_dismiss(&mut self) -> bool {
        if !self.sync.dismiss(self.config.dismiss_policy()) {
            return false;
        }
        self.close_overlay();
        true
    }

    pub fn on_clear(&mut self) {
        self.sync.clear();
        self.browsed_month = None;
        if let Some(wheels) = &mut self.wheels {
            wheels.reset(self.sync.draft(), &self.config);
        }
    }

    /// Set the committed value from the host; deferred while the user is editing.
    pub fn on_external_value_set(&mut self, value: Option<V>) -> bool {
        self.sync.external_set(value)
    }

    /// Advance wheel timers. Returns `true` when a wheel settled and moved the draft.
    pub fn tick(&mut self, delta: Duration) -> bool {
        let Some(wheels) = &mut self.wheels else {
            return false;
        };
        let Some(next) = wheels.tick(delta, self.sync.draft(), &self.config) else {
            return false;
        };
        self.browsed_month = None;
        self.sync.select(next)
    }

    #[must_use]
    pub fn committed_value(&self) -> Option<&V> {
        self.sync.committed()
    }

    #[must_use]
    pub fn live_text(&self) -> &str {
        self.sync.live_text()
    }

    #[must_use]
    pub fn draft_value(&self) -> &V {
        self.sync.draft()
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.sync.is_open()
    }

    #[must_use]
    pub fn is_focused(&self) -> bool {
        self.sync.is_focused()
    }

    #[must_use]
    pub fn phase(&self) -> SyncPhase {
        self.sync.phase()
    }

    /// Units shown by the overlay, in display order.
    #[must_use]
    pub fn units(&self) -> Vec<PickerUnit> {
        V::units(&self.config.mask)
    }

    /// Options for `unit` given the current draft.
    #[must_use]
    pub fn unit_options(&self, unit: PickerUnit) -> Cow<'static, [UnitOption]> {
        let draft = self.sync.draft();
        let anchor = self.wheels.as_ref().map_or(draft, WheelSet::anchor);
        draft.unit_options(unit, anchor, &self.config)
    }

    /// Offset the wheel for `unit` should be scrolled to, while open.
    #[must_use]
    pub fn scroll_target(&self, unit: PickerUnit) -> Option<f32> {
        self.wheels
            .as_ref()
            .and_then(|wheels| wheels.resolver(unit))
            .map(|resolver| resolver.scroll_target())
    }

    /// Committed value if it changed since the last call.
    pub fn take_committed_change(&mut self) -> Option<Option<V>> {
        self.sync.take_committed_change()
    }

    fn close_overlay(&mut self) {
        self.wheels = None;
        self.browsed_month = None;
        debug!(committed = ?self.sync.committed(), "picker closed");
    }
}

impl Picker<DateValue> {
    /// Date picker with the default configuration, empty, falling back to today.
    #[must_use]
    pub fn date() -> Self {
        let config = PickerConfig::date();
        Self {
            sync: Synchronizer::new(config.mask, Fallback::Now, None),
            config,
            wheels: None,
            browsed_month: None,
        }
    }

    /// Month the calendar grid shows.
    #[must_use]
    pub fn calendar_view(&self) -> CalendarView {
        self.browsed_month
            .unwrap_or_else(|| CalendarView::of(*self.sync.draft()))
    }

    /// Browse one month forward or back without touching the draft.
    pub fn navigate_month(&mut self, forward: bool) -> CalendarView {
        let current = self.calendar_view();
        let next = current.shifted(forward);
        if !YEAR_RANGE.contains(&next.year) {
            return current;
        }
        self.browsed_month = Some(next);
        next
    }

    /// Day cells for [`Picker::calendar_view`], with the draft marked as selected.
    #[must_use]
    pub fn calendar_grid(&self, today: DateValue) -> MonthGrid {
        let view = self.calendar_view();
        month_grid(view.year, view.month, today, Some(*self.sync.draft()))
    }

    /// A day cell was clicked.
    pub fn select_date(&mut self, date: DateValue) -> bool {
        self.on_value_selected(date)
    }
}

impl Picker<TimeValue> {
    /// Time picker with the default configuration, empty, falling back to now.
    #[must_use]
    pub fn time(uses_12h: bool, has_seconds: bool) -> Self {
        let config = PickerConfig::time(uses_12h, has_seconds);
        Self {
            sync: Synchronizer::new(config.mask, Fallback::Now, None),
            config,
            wheels: None,
            browsed_month: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::{DismissPolicy, MaskConfig},
        value::Meridiem,
    };

    const SETTLE: Duration = Duration::from_millis(150);
    const GRACE: Duration = Duration::from_millis(600);

    fn date(year: i32, month: u32, day: u32) -> DateValue {
        DateValue::new(year, month, day).unwrap()
    }

    fn date_picker(initial: Option<DateValue>) -> Picker<DateValue> {
        Picker::new(
            PickerConfig::date().with_fallback_text("2000/06/15"),
            initial,
        )
        .unwrap()
    }

    fn type_chars(picker: &mut Picker<DateValue>, input: &str) -> EditOutcome<DateValue> {
        let mut text = picker.live_text().to_owned();
        let mut outcome = EditOutcome::Incomplete;
        for c in input.chars() {
            text.push(c);
            outcome = picker.on_raw_text_edit(&text);
            text = picker.live_text().to_owned();
        }
        outcome
    }

    #[test]
    fn typing_a_date_commits_it() {
        let mut picker = date_picker(None);
        picker.on_focus();

        type_chars(&mut picker, "2024011");
        assert_eq!(picker.live_text(), "2024/01/1");
        assert_eq!(picker.committed_value(), None);

        assert_eq!(
            type_chars(&mut picker, "5"),
            EditOutcome::Committed(date(2024, 1, 15))
        );
        assert_eq!(picker.live_text(), "2024/01/15");
        assert_eq!(picker.committed_value(), Some(&date(2024, 1, 15)));
    }

    #[test]
    fn out_of_range_segments_are_clamped() {
        let mut picker = date_picker(None);
        picker.on_focus();
        type_chars(&mut picker, "20241399");
        assert_eq!(picker.live_text(), "2024/12/31");
        assert_eq!(picker.committed_value(), Some(&date(2024, 12, 31)));
    }

    #[test]
    fn twelve_hour_meridiem_can_be_typed_before_digits() {
        let mut picker = Picker::<TimeValue>::new(
            PickerConfig::time(true, false).with_fallback_text("12:00 AM"),
            None,
        )
        .unwrap();
        picker.on_focus();

        assert_eq!(picker.on_raw_text_edit("p"), EditOutcome::Incomplete);
        assert_eq!(picker.live_text(), "PM");
        let outcome = picker.on_raw_text_edit("0130PM");
        assert_eq!(
            outcome,
            EditOutcome::Committed(TimeValue::hm12(1, 30, Meridiem::Pm))
        );
        assert_eq!(picker.live_text(), "01:30 PM");
    }

    fn twelve_hour_picker(initial: Option<TimeValue>) -> Picker<TimeValue> {
        Picker::<TimeValue>::new(
            PickerConfig::time(true, false).with_fallback_text("12:00 AM"),
            initial,
        )
        .unwrap()
    }

    #[test]
    fn backspacing_through_meridiem_clears_the_value() {
        let mut picker = twelve_hour_picker(None);
        picker.on_focus();
        picker.on_raw_text_edit("0130p");
        assert_eq!(picker.live_text(), "01:30 PM");

        let mut outcome = EditOutcome::Incomplete;
        for _ in 0..10 {
            if picker.live_text().is_empty() {
                break;
            }
            let mut text = picker.live_text().to_owned();
            text.pop();
            outcome = picker.on_raw_text_edit(&text);
        }

        assert_eq!(outcome, EditOutcome::Cleared);
        assert_eq!(picker.live_text(), "");
        assert_eq!(picker.committed_value(), None);
    }

    #[test]
    fn typing_the_other_meridiem_switches_it() {
        let mut picker = twelve_hour_picker(Some(TimeValue::hm12(1, 30, Meridiem::Am)));
        picker.on_focus();
        assert_eq!(picker.live_text(), "01:30 AM");

        assert_eq!(
            picker.on_raw_text_edit("01:30 AMp"),
            EditOutcome::Committed(TimeValue::hm12(1, 30, Meridiem::Pm))
        );
        assert_eq!(picker.live_text(), "01:30 PM");
        assert_eq!(
            picker.take_committed_change(),
            Some(Some(TimeValue::hm12(1, 30, Meridiem::Pm)))
        );
    }

    #[test]
    fn month_wheel_clamps_day_in_leap_year() {
        let mut picker = date_picker(Some(date(2024, 1, 31)));
        picker.on_open();
        picker.tick(GRACE);

        assert!(picker.on_scroll_offset(PickerUnit::Month, 40.0));
        assert!(!picker.tick(Duration::from_millis(100)));
        assert!(picker.tick(Duration::from_millis(50)));

        assert_eq!(picker.draft_value(), &date(2024, 2, 29));
        assert_eq!(picker.committed_value(), Some(&date(2024, 1, 31)));
        assert_eq!(picker.scroll_target(PickerUnit::Day), Some(28.0 * 40.0));
        assert_eq!(picker.unit_options(PickerUnit::Day).len(), 29);

        picker.on_confirm();
        assert_eq!(picker.committed_value(), Some(&date(2024, 2, 29)));
        assert_eq!(picker.live_text(), "2024/02/29");
        assert_eq!(picker.scroll_target(PickerUnit::Day), None);
    }

    #[test]
    fn open_time_scroll_events_do_not_move_the_draft() {
        let mut picker = date_picker(Some(date(2024, 1, 15)));
        picker.on_open();
        picker.on_scroll_offset(PickerUnit::Day, 0.0);
        picker.tick(Duration::from_millis(200));
        picker.tick(SETTLE);
        assert_eq!(picker.draft_value(), &date(2024, 1, 15));
    }

    #[test]
    fn confirm_without_interaction_keeps_value() {
        let mut picker = Picker::<TimeValue>::new(
            PickerConfig::time(true, false).with_fallback_text("12:00 AM"),
            Some(TimeValue::hm12(11, 5, Meridiem::Am)),
        )
        .unwrap();
        assert!(picker.on_open());
        picker.tick(SETTLE);
        assert!(picker.on_confirm());

        assert_eq!(
            picker.committed_value(),
            Some(&TimeValue::hm12(11, 5, Meridiem::Am))
        );
        assert_eq!(picker.live_text(), "11:05 AM");
        assert_eq!(picker.take_committed_change(), None);
    }

    #[test]
    fn clear_while_typing() {
        let mut picker = date_picker(Some(date(2024, 1, 15)));
        picker.on_focus();
        type_chars(&mut picker, "2");
        picker.on_clear();

        assert_eq!(picker.committed_value(), None);
        assert_eq!(picker.live_text(), "");
        assert_eq!(picker.draft_value(), &date(2000, 6, 15));
        assert!(picker.is_focused());
    }

    #[test]
    fn clear_while_open_rewinds_wheels() {
        let mut picker = date_picker(Some(date(2024, 1, 15)));
        picker.on_open();
        picker.on_clear();
        assert!(picker.is_open());
        assert_eq!(picker.draft_value(), &date(2000, 6, 15));
        assert_eq!(picker.scroll_target(PickerUnit::Month), Some(5.0 * 40.0));
    }

    #[test]
    fn dismiss_uses_configured_policy() {
        let mut picker = Picker::new(
            PickerConfig::date().with_dismiss_policy(DismissPolicy::Discard),
            Some(date(2024, 1, 15)),
        )
        .unwrap();
        picker.on_open();
        picker.select_date(date(2024, 1, 20));
        assert!(picker.on_dismiss());
        assert_eq!(picker.committed_value(), Some(&date(2024, 1, 15)));

        let mut implicit = date_picker(Some(date(2024, 1, 15)));
        implicit.on_open();
        implicit.select_date(date(2024, 1, 20));
        assert!(implicit.on_dismiss());
        assert_eq!(implicit.committed_value(), Some(&date(2024, 1, 20)));
        assert!(!implicit.on_dismiss());
    }

    #[test]
    fn confirm_on_select_closes_immediately() {
        let mut picker = Picker::new(
            PickerConfig::date().with_confirm_on_select(true),
            Some(date(2024, 1, 15)),
        )
        .unwrap();
        picker.on_open();
        assert!(picker.on_grid_unit_selected(PickerUnit::Day, 3));
        assert!(!picker.is_open());
        assert_eq!(picker.committed_value(), Some(&date(2024, 1, 3)));
        assert_eq!(picker.take_committed_change(), Some(Some(date(2024, 1, 3))));
    }

    #[test]
    fn grid_selection_requires_open_overlay() {
        let mut picker = date_picker(Some(date(2024, 1, 15)));
        assert!(!picker.on_grid_unit_selected(PickerUnit::Day, 3));
        assert!(!picker.on_scroll_offset(PickerUnit::Day, 80.0));
        assert_eq!(picker.draft_value(), &date(2024, 1, 15));
    }

    #[test]
    fn calendar_navigation_is_independent_of_draft() {
        let mut picker = date_picker(Some(date(2024, 12, 15)));
        picker.on_open();
        assert_eq!(picker.navigate_month(true), CalendarView { year: 2025, month: 1 });
        assert_eq!(picker.draft_value(), &date(2024, 12, 15));

        let grid = picker.calendar_grid(date(2025, 1, 2));
        assert_eq!(grid.days.len(), 31);
        assert!(grid.days[1].is_today);
        assert!(grid.days.iter().all(|day| !day.is_selected));

        picker.select_date(date(2025, 1, 9));
        assert_eq!(picker.calendar_view(), CalendarView { year: 2025, month: 1 });
        assert!(picker.calendar_grid(date(2025, 1, 2)).days[8].is_selected);
    }

    #[test]
    fn navigation_stops_at_year_bounds() {
        let mut picker = date_picker(Some(date(1, 1, 1)));
        assert_eq!(picker.navigate_month(false), CalendarView { year: 1, month: 1 });
    }

    #[test]
    fn external_value_waits_for_overlay_to_close() {
        let mut picker = date_picker(Some(date(2024, 1, 15)));
        picker.on_open();
        assert!(!picker.on_external_value_set(Some(date(2030, 3, 3))));
        assert_eq!(picker.committed_value(), Some(&date(2024, 1, 15)));

        picker.on_dismiss();
        assert_eq!(picker.committed_value(), Some(&date(2030, 3, 3)));
        assert_eq!(picker.live_text(), "2030/03/03");
    }

    #[test]
    fn constructor_rejects_bad_configuration() {
        let err = Picker::<DateValue>::new(PickerConfig::time(false, false), None).unwrap_err();
        assert!(matches!(err, ConfigError::MaskKindMismatch { .. }));

        let err = Picker::<DateValue>::new(
            PickerConfig::date().with_fallback_text("2024/02"),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidFallback { .. }));

        let lenient =
            Picker::<DateValue>::new(PickerConfig::date().with_fallback_text("20240229"), None)
                .unwrap();
        assert_eq!(lenient.draft_value(), &date(2024, 2, 29));
    }

    #[test]
    fn time_picker_exposes_wheel_options() {
        let mut picker = Picker::<TimeValue>::time(false, true);
        assert_eq!(picker.config().mask, MaskConfig::time(false, true));
        assert_eq!(
            picker.units(),
            vec![PickerUnit::Hour, PickerUnit::Minute, PickerUnit::Second]
        );
        assert_eq!(picker.unit_options(PickerUnit::Hour).len(), 24);
        assert_eq!(picker.unit_options(PickerUnit::Meridiem).len(), 0);

        picker.on_open();
        assert!(picker.scroll_target(PickerUnit::Second).is_some());
        assert!(picker.scroll_target(PickerUnit::Meridiem).is_none());
    }
}
