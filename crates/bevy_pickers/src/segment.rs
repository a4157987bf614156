use std::ops::RangeInclusive;

/// A fixed-width two-digit numeric field inside a date or time mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Segment {
    Month,
    Day,
    Hour24,
    Hour12,
    /// Minutes and seconds share the same bounds.
    MinSec,
}

impl Segment {
    /// Closed range of values this segment accepts.
    #[must_use]
    pub const fn range(self) -> RangeInclusive<u32> {
        match self {
            Self::Month => 1..=12,
            Self::Day => 1..=31,
            Self::Hour24 => 0..=23,
            Self::Hour12 => 1..=12,
            Self::MinSec => 0..=59,
        }
    }

    /// Clamp and pad `raw_digits` once both digits are present.
    ///
    /// Anything that is not exactly two ASCII digits is returned untouched, so a
    /// half-typed segment never gets clamped early.
    #[must_use]
    pub fn validate(self, raw_digits: &str) -> String {
        validate(raw_digits, self)
    }
}

/// See [`Segment::validate`].
#[must_use]
pub fn validate(raw_digits: &str, segment: Segment) -> String {
    if raw_digits.len() != 2 || !raw_digits.bytes().all(|b| b.is_ascii_digit()) {
        return raw_digits.to_string();
    }

    let Ok(value) = raw_digits.parse::<u32>() else {
        return raw_digits.to_string();
    };

    let range = segment.range();
    format!("{:02}", value.clamp(*range.start(), *range.end()))
}
