use std::sync::OnceLock;

use crate::{
    config::{MaskConfig, YearWindow},
    value::{DateValue, UnitOption, YEAR_RANGE, days_in_month, weekday_of_first},
};

/// Sunday-first column headers for [`month_grid`].
pub const WEEKDAY_LABELS: [&str; 7] = ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"];

const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// One day cell of a calendar grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridDay {
    pub date: DateValue,
    pub is_today: bool,
    pub is_selected: bool,
}

/// Days of one month laid out under [`WEEKDAY_LABELS`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    /// Empty cells before the 1st (0-6).
    pub leading_blanks: usize,
    pub days: Vec<GridDay>,
}

impl MonthGrid {
    /// Number of week rows needed to show every day.
    #[must_use]
    pub fn week_rows(&self) -> usize {
        (self.leading_blanks + self.days.len()).div_ceil(7)
    }
}

#[must_use]
pub fn month_grid(
    year: i32,
    month: u32,
    today: DateValue,
    selected: Option<DateValue>,
) -> MonthGrid {
    let days = valid_days(year, month)
        .into_iter()
        .filter_map(|day| DateValue::new(year, month, day))
        .map(|date| GridDay {
            date,
            is_today: date == today,
            is_selected: selected == Some(date),
        })
        .collect();

    MonthGrid {
        leading_blanks: weekday_of_first(year, month) as usize,
        days,
    }
}

/// `1..=last day` of the month.
#[must_use]
pub fn valid_days(year: i32, month: u32) -> Vec<u32> {
    (1..=days_in_month(year, month)).collect()
}

#[must_use]
pub fn day_options(year: i32, month: u32) -> Vec<UnitOption> {
    valid_days(year, month)
        .into_iter()
        .map(|day| UnitOption::new(day as i32, day.to_string()))
        .collect()
}

#[must_use]
pub fn month_options() -> &'static [UnitOption] {
    static MONTHS: OnceLock<Vec<UnitOption>> = OnceLock::new();
    MONTHS.get_or_init(|| {
        MONTH_LABELS
            .iter()
            .zip(1..)
            .map(|(label, month)| UnitOption::new(month, *label))
            .collect()
    })
}

/// Years around `anchor`, cut to the years a date can hold.
#[must_use]
pub fn year_options(anchor: i32, window: YearWindow) -> Vec<UnitOption> {
    let first = (anchor - i32::from(window.before)).max(*YEAR_RANGE.start());
    let last = (anchor + i32::from(window.after)).min(*YEAR_RANGE.end());
    (first..=last)
        .map(|year| UnitOption::new(year, year.to_string()))
        .collect()
}

/// Option lists for every time unit a mask shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeUnitOptions {
    pub hours: &'static [UnitOption],
    pub minutes: &'static [UnitOption],
    pub seconds: Option<&'static [UnitOption]>,
    pub meridiems: Option<&'static [UnitOption]>,
}

fn padded(range: std::ops::RangeInclusive<i32>) -> Vec<UnitOption> {
    range
        .map(|value| UnitOption::new(value, format!("{value:02}")))
        .collect()
}

/// Built once per process and shared by every picker.
#[must_use]
pub fn time_unit_options(mask: &MaskConfig) -> TimeUnitOptions {
    static HOURS_12: OnceLock<Vec<UnitOption>> = OnceLock::new();
    static HOURS_24: OnceLock<Vec<UnitOption>> = OnceLock::new();
    static SIXTY: OnceLock<Vec<UnitOption>> = OnceLock::new();
    static MERIDIEMS: OnceLock<Vec<UnitOption>> = OnceLock::new();

    let hours = if mask.wants_meridiem() {
        HOURS_12.get_or_init(|| padded(1..=12))
    } else {
        HOURS_24.get_or_init(|| padded(0..=23))
    };
    let sixty = SIXTY.get_or_init(|| padded(0..=59));
    let meridiems = MERIDIEMS.get_or_init(|| {
        vec![UnitOption::new(0, "AM"), UnitOption::new(1, "PM")]
    });

    TimeUnitOptions {
        hours,
        minutes: sixty,
        seconds: mask.wants_seconds().then_some(sixty.as_slice()),
        meridiems: mask.wants_meridiem().then_some(meridiems.as_slice()),
    }
}

/// Month currently shown by a calendar overlay, independent of the draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarView {
    pub year: i32,
    pub month: u32,
}

impl CalendarView {
    #[must_use]
    pub fn of(date: DateValue) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// One month forward or back, rolling the year over.
    #[must_use]
    pub fn shifted(self, forward: bool) -> Self {
        match (forward, self.month) {
            (true, 12) => Self {
                year: self.year + 1,
                month: 1,
            },
            (true, month) => Self {
                year: self.year,
                month: month + 1,
            },
            (false, 1) => Self {
                year: self.year - 1,
                month: 12,
            },
            (false, month) => Self {
                year: self.year,
                month: month - 1,
            },
        }
    }

    #[must_use]
    pub fn month_label(&self) -> &'static str {
        MONTH_LABELS
            .get(self.month.saturating_sub(1) as usize)
            .copied()
            .unwrap_or("")
    }
}
