//! Incremental mask formatting.
//!
//! [`format`] turns whatever the user has typed so far into canonical text for the
//! configured mask. It only looks at digits (plus a meridiem hint for 12h times),
//! so the output can be fed straight back in: formatting is a fixed point.

use crate::{
    config::{MaskConfig, MaskKind},
    segment::{Segment, validate},
    value::Meridiem,
};

const DATE_SEPARATOR: char = '/';
const TIME_SEPARATOR: char = ':';

/// Complete canonical text split into its raw segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaskedText<'a> {
    Date {
        year: &'a str,
        month: &'a str,
        day: &'a str,
    },
    Time {
        hour: &'a str,
        minute: &'a str,
        second: Option<&'a str>,
        meridiem: Option<Meridiem>,
    },
}

/// Reformat raw typed text for `mask`.
#[must_use]
pub fn format(raw: &str, mask: &MaskConfig) -> String {
    let digits: String = raw
        .chars()
        .filter(char::is_ascii_digit)
        .take(mask.digit_capacity())
        .collect();

    match mask.kind {
        MaskKind::Date => format_date(&digits),
        MaskKind::Time => {
            let meridiem = if mask.wants_meridiem() {
                meridiem_hint(raw)
            } else {
                None
            };
            format_time(&digits, mask, meridiem)
        }
    }
}

/// Reformat an edit of `previous`, the text the field showed before.
///
/// A backspace that only removed part of the meridiem label would be undone by
/// [`format`] (`"01:30 P"` expands back to `"01:30 PM"`), so in that case the
/// meridiem is dropped instead.
#[must_use]
pub fn format_edit(previous: &str, raw: &str, mask: &MaskConfig) -> String {
    let formatted = format(raw, mask);
    let shortened = raw.len() < previous.len() && previous.starts_with(raw);
    if !(shortened && formatted == previous && mask.wants_meridiem()) {
        return formatted;
    }

    let digits: String = raw
        .chars()
        .filter(char::is_ascii_digit)
        .take(mask.digit_capacity())
        .collect();
    format_time(&digits, mask, None)
}

/// Last `a`/`p` (any case) in the text, regardless of where the digits are.
///
/// The last one wins so typing `p` after `"01:30 AM"` switches to PM.
#[must_use]
pub fn meridiem_hint(raw: &str) -> Option<Meridiem> {
    raw.chars().rev().find_map(Meridiem::from_hint)
}

/// Whether formatted text has every required segment filled in.
#[must_use]
pub fn is_complete(text: &str, mask: &MaskConfig) -> bool {
    let digits = text.chars().filter(char::is_ascii_digit).count();
    if digits != mask.digit_capacity() {
        return false;
    }
    !mask.wants_meridiem() || meridiem_hint(text).is_some()
}

/// Split complete canonical text into segments.
///
/// Returns `None` unless `text` is already in canonical form and complete, so
/// stray characters or unclamped segments never reach a value parser.
#[must_use]
pub fn split<'a>(text: &'a str, mask: &MaskConfig) -> Option<MaskedText<'a>> {
    if !is_complete(text, mask) || format(text, mask) != text {
        return None;
    }

    match mask.kind {
        MaskKind::Date => Some(MaskedText::Date {
            year: text.get(0..4)?,
            month: text.get(5..7)?,
            day: text.get(8..10)?,
        }),
        MaskKind::Time => Some(MaskedText::Time {
            hour: text.get(0..2)?,
            minute: text.get(3..5)?,
            second: if mask.wants_seconds() {
                Some(text.get(6..8)?)
            } else {
                None
            },
            meridiem: if mask.wants_meridiem() {
                meridiem_hint(text)
            } else {
                None
            },
        }),
    }
}

fn take_prefix(digits: &str, width: usize) -> (&str, &str) {
    digits.split_at(width.min(digits.len()))
}

fn format_date(digits: &str) -> String {
    let (year, rest) = take_prefix(digits, 4);
    let (month, day) = take_prefix(rest, 2);

    let mut out = String::from(year);
    for (part, segment) in [(month, Segment::Month), (day, Segment::Day)] {
        if part.is_empty() {
            break;
        }
        out.push(DATE_SEPARATOR);
        out.push_str(&validate(part, segment));
    }
    out
}

fn format_time(digits: &str, mask: &MaskConfig, meridiem: Option<Meridiem>) -> String {
    let hour_segment = if mask.wants_meridiem() {
        Segment::Hour12
    } else {
        Segment::Hour24
    };
    let mut segments = vec![hour_segment, Segment::MinSec];
    if mask.wants_seconds() {
        segments.push(Segment::MinSec);
    }

    let mut out = String::new();
    let mut rest = digits;
    for (index, segment) in segments.into_iter().enumerate() {
        if rest.is_empty() {
            break;
        }
        let (part, tail) = take_prefix(rest, 2);
        if index > 0 {
            out.push(TIME_SEPARATOR);
        }
        out.push_str(&validate(part, segment));
        rest = tail;
    }

    if let Some(meridiem) = meridiem {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(meridiem.label());
    }
    out
}
