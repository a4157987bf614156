use std::{borrow::Cow, fmt};

use chrono::{Datelike, Local, Timelike};

use crate::{
    config::{MaskConfig, MaskKind, PickerConfig},
    grid,
    mask::{self, MaskedText},
    segment::Segment,
};

/// Years a [`DateValue`] can hold (four digits in the mask).
pub const YEAR_RANGE: std::ops::RangeInclusive<i32> = 1..=9999;

#[must_use]
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

#[must_use]
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 30,
    }
}

/// Weekday of the 1st of the month. 0=Sun, 1=Mon, …, 6=Sat.
#[must_use]
pub fn weekday_of_first(year: i32, month: u32) -> u32 {
    const OFFSETS: [i32; 12] = [0, 3, 2, 5, 0, 3, 5, 1, 4, 6, 2, 4];
    let month = month.clamp(1, 12);
    let y = if month < 3 { year - 1 } else { year };
    let raw = y + y / 4 - y / 100 + y / 400 + OFFSETS[(month - 1) as usize] + 1;
    raw.rem_euclid(7) as u32
}

/// A calendar date whose day always fits its month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateValue {
    year: i32,
    month: u32,
    day: u32,
}

impl DateValue {
    /// Checked constructor; `None` when any component is out of range.
    #[must_use]
    pub fn new(year: i32, month: u32, day: u32) -> Option<Self> {
        let valid = YEAR_RANGE.contains(&year)
            && (1..=12).contains(&month)
            && (1..=days_in_month(year, month)).contains(&day);
        valid.then_some(Self { year, month, day })
    }

    /// Clamp every component into range, pulling the day back to the last
    /// valid day of the resulting month.
    #[must_use]
    pub fn clamped(year: i32, month: i64, day: i64) -> Self {
        let year = year.clamp(*YEAR_RANGE.start(), *YEAR_RANGE.end());
        let month = month.clamp(1, 12) as u32;
        let day = day.clamp(1, i64::from(days_in_month(year, month))) as u32;
        Self { year, month, day }
    }

    #[must_use]
    pub fn today() -> Self {
        let now = Local::now();
        Self::clamped(now.year(), i64::from(now.month()), i64::from(now.day()))
    }

    #[must_use]
    pub const fn year(&self) -> i32 {
        self.year
    }

    #[must_use]
    pub const fn month(&self) -> u32 {
        self.month
    }

    #[must_use]
    pub const fn day(&self) -> u32 {
        self.day
    }
}

impl fmt::Display for DateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}/{:02}/{:02}", self.year, self.month, self.day)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Meridiem {
    Am,
    Pm,
}

impl Meridiem {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Am => "AM",
            Self::Pm => "PM",
        }
    }

    /// `a`/`A` and `p`/`P` start a meridiem token.
    #[must_use]
    pub fn from_hint(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'a' => Some(Self::Am),
            'p' => Some(Self::Pm),
            _ => None,
        }
    }

    const fn index(self) -> i32 {
        match self {
            Self::Am => 0,
            Self::Pm => 1,
        }
    }
}

/// A wall-clock time shaped by its mask: 12h values carry a meridiem and an hour
/// in 1..=12, 24h values have none and an hour in 0..=23.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeValue {
    pub hour: u8,
    pub minute: u8,
    pub second: Option<u8>,
    pub meridiem: Option<Meridiem>,
}

impl TimeValue {
    #[must_use]
    pub fn hm(hour: u8, minute: u8) -> Self {
        Self {
            hour: hour.min(23),
            minute: minute.min(59),
            second: None,
            meridiem: None,
        }
    }

    #[must_use]
    pub fn hm12(hour: u8, minute: u8, meridiem: Meridiem) -> Self {
        Self {
            hour: hour.clamp(1, 12),
            minute: minute.min(59),
            second: None,
            meridiem: Some(meridiem),
        }
    }

    #[must_use]
    pub fn with_second(mut self, second: u8) -> Self {
        self.second = Some(second.min(59));
        self
    }

    /// Hour on a 0..=23 clock.
    #[must_use]
    pub fn hour_24(&self) -> u8 {
        match self.meridiem {
            None => self.hour,
            Some(Meridiem::Am) => self.hour % 12,
            Some(Meridiem::Pm) => self.hour % 12 + 12,
        }
    }

    /// Rebuild from a 24h clock reading in the shape `mask` asks for.
    #[must_use]
    pub fn from_24h(hour: u8, minute: u8, second: u8, mask: &MaskConfig) -> Self {
        let hour = hour.min(23);
        let second = mask.wants_seconds().then_some(second.min(59));
        if mask.wants_meridiem() {
            let meridiem = if hour >= 12 { Meridiem::Pm } else { Meridiem::Am };
            let hour = match hour % 12 {
                0 => 12,
                h => h,
            };
            Self {
                hour,
                minute: minute.min(59),
                second,
                meridiem: Some(meridiem),
            }
        } else {
            Self {
                hour,
                minute: minute.min(59),
                second,
                meridiem: None,
            }
        }
    }
}

/// Draft component addressed by a grid cell or a wheel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PickerUnit {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
    Meridiem,
}

/// One selectable entry of a wheel or grid column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitOption {
    pub value: i32,
    pub label: String,
}

impl UnitOption {
    #[must_use]
    pub fn new(value: i32, label: impl Into<String>) -> Self {
        Self {
            value,
            label: label.into(),
        }
    }
}

/// Value family a [`crate::Picker`] edits.
///
/// Implementations define the canonical text form, how a mask-formatted string
/// parses back, and how a single unit is replaced inside a draft.
pub trait PickerValue: Clone + PartialEq + fmt::Debug + Send + Sync + 'static {
    /// Mask kind this value family is typed with.
    const KIND: MaskKind;

    /// Canonical text for `self` under `mask`.
    fn format_masked(&self, mask: &MaskConfig) -> String;

    /// Parse complete canonical text. Incomplete or out-of-range text yields `None`.
    fn parse_masked(text: &str, mask: &MaskConfig) -> Option<Self>;

    /// Current wall-clock value, used when no fallback is configured.
    fn now(mask: &MaskConfig) -> Self;

    /// Reshape a value supplied from outside so it matches `mask`.
    fn conform(self, _mask: &MaskConfig) -> Self {
        self
    }

    /// Units shown as wheels/grid columns, in display order.
    fn units(mask: &MaskConfig) -> Vec<PickerUnit>;

    fn unit_value(&self, unit: PickerUnit) -> Option<i32>;

    /// Replace one unit. Dependent units are re-clamped together.
    #[must_use]
    fn with_unit(&self, unit: PickerUnit, value: i32, mask: &MaskConfig) -> Self;

    /// Options offered for `unit` while `self` is the draft. `anchor` is the draft
    /// captured when the overlay opened.
    fn unit_options(
        &self,
        unit: PickerUnit,
        anchor: &Self,
        config: &PickerConfig,
    ) -> Cow<'static, [UnitOption]>;
}

impl PickerValue for DateValue {
    const KIND: MaskKind = MaskKind::Date;

    fn format_masked(&self, _mask: &MaskConfig) -> String {
        self.to_string()
    }

    fn parse_masked(text: &str, mask: &MaskConfig) -> Option<Self> {
        let MaskedText::Date { year, month, day } = mask::split(text, mask)? else {
            return None;
        };
        DateValue::new(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
    }

    fn now(_mask: &MaskConfig) -> Self {
        Self::today()
    }

    fn units(_mask: &MaskConfig) -> Vec<PickerUnit> {
        vec![PickerUnit::Year, PickerUnit::Month, PickerUnit::Day]
    }

    fn unit_value(&self, unit: PickerUnit) -> Option<i32> {
        match unit {
            PickerUnit::Year => Some(self.year),
            PickerUnit::Month => Some(self.month as i32),
            PickerUnit::Day => Some(self.day as i32),
            _ => None,
        }
    }

    fn with_unit(&self, unit: PickerUnit, value: i32, _mask: &MaskConfig) -> Self {
        let (year, month, day) = (self.year, i64::from(self.month), i64::from(self.day));
        let value = i64::from(value);
        match unit {
            PickerUnit::Year => Self::clamped(value as i32, month, day),
            PickerUnit::Month => Self::clamped(year, value, day),
            PickerUnit::Day => Self::clamped(year, month, value),
            _ => *self,
        }
    }

    fn unit_options(
        &self,
        unit: PickerUnit,
        anchor: &Self,
        config: &PickerConfig,
    ) -> Cow<'static, [UnitOption]> {
        match unit {
            PickerUnit::Year => Cow::Owned(grid::year_options(anchor.year, config.year_window)),
            PickerUnit::Month => Cow::Borrowed(grid::month_options()),
            PickerUnit::Day => Cow::Owned(grid::day_options(self.year, self.month)),
            _ => Cow::Borrowed(&[]),
        }
    }
}

impl PickerValue for TimeValue {
    const KIND: MaskKind = MaskKind::Time;

    fn format_masked(&self, mask: &MaskConfig) -> String {
        let value = self.conform(mask);
        let mut text = format!("{:02}:{:02}", value.hour, value.minute);
        if let Some(second) = value.second {
            text.push_str(&format!(":{second:02}"));
        }
        if let Some(meridiem) = value.meridiem {
            text.push(' ');
            text.push_str(meridiem.label());
        }
        text
    }

    fn parse_masked(text: &str, mask: &MaskConfig) -> Option<Self> {
        let MaskedText::Time {
            hour,
            minute,
            second,
            meridiem,
        } = mask::split(text, mask)?
        else {
            return None;
        };

        let hour_segment = if mask.wants_meridiem() {
            Segment::Hour12
        } else {
            Segment::Hour24
        };
        let in_range = |raw: &str, segment: Segment| -> Option<u8> {
            let value: u32 = raw.parse().ok()?;
            segment.range().contains(&value).then_some(value as u8)
        };

        Some(Self {
            hour: in_range(hour, hour_segment)?,
            minute: in_range(minute, Segment::MinSec)?,
            second: match second {
                Some(raw) => Some(in_range(raw, Segment::MinSec)?),
                None => None,
            },
            meridiem,
        })
    }

    fn now(mask: &MaskConfig) -> Self {
        let now = Local::now();
        Self::from_24h(now.hour() as u8, now.minute() as u8, now.second() as u8, mask)
    }

    fn conform(self, mask: &MaskConfig) -> Self {
        Self::from_24h(self.hour_24(), self.minute, self.second.unwrap_or(0), mask)
    }

    fn units(mask: &MaskConfig) -> Vec<PickerUnit> {
        let mut units = vec![PickerUnit::Hour, PickerUnit::Minute];
        if mask.wants_seconds() {
            units.push(PickerUnit::Second);
        }
        if mask.wants_meridiem() {
            units.push(PickerUnit::Meridiem);
        }
        units
    }

    fn unit_value(&self, unit: PickerUnit) -> Option<i32> {
        match unit {
            PickerUnit::Hour => Some(i32::from(self.hour)),
            PickerUnit::Minute => Some(i32::from(self.minute)),
            PickerUnit::Second => self.second.map(i32::from),
            PickerUnit::Meridiem => self.meridiem.map(Meridiem::index),
            _ => None,
        }
    }

    fn with_unit(&self, unit: PickerUnit, value: i32, mask: &MaskConfig) -> Self {
        let mut next = self.conform(mask);
        let clamp_to = |segment: Segment| -> u8 {
            let range = segment.range();
            value.clamp(*range.start() as i32, *range.end() as i32) as u8
        };

        match unit {
            PickerUnit::Hour if mask.wants_meridiem() => next.hour = clamp_to(Segment::Hour12),
            PickerUnit::Hour => next.hour = clamp_to(Segment::Hour24),
            PickerUnit::Minute => next.minute = clamp_to(Segment::MinSec),
            PickerUnit::Second if mask.wants_seconds() => {
                next.second = Some(clamp_to(Segment::MinSec));
            }
            PickerUnit::Meridiem if mask.wants_meridiem() => {
                next.meridiem = Some(if value <= 0 { Meridiem::Am } else { Meridiem::Pm });
            }
            _ => {}
        }
        next
    }

    fn unit_options(
        &self,
        unit: PickerUnit,
        _anchor: &Self,
        config: &PickerConfig,
    ) -> Cow<'static, [UnitOption]> {
        let options = grid::time_unit_options(&config.mask);
        let list = match unit {
            PickerUnit::Hour => Some(options.hours),
            PickerUnit::Minute => Some(options.minutes),
            PickerUnit::Second => options.seconds,
            PickerUnit::Meridiem => options.meridiems,
            _ => None,
        };
        Cow::Borrowed(list.unwrap_or(&[]))
    }
}
