//! Construction-time configuration for pickers.
//!
//! Everything here is fixed once a [`crate::Picker`] is built. Configurations can be
//! assembled with the `with_*` builders or loaded from RON:
//!
//! ```
//! use bevy_pickers::{DismissPolicy, MaskKind, PickerConfig};
//!
//! let config = PickerConfig::from_ron(
//!     r#"(
//!   mask: (kind: Time, uses_12h: true, has_seconds: true),
//!   dismiss_policy: Some(Discard),
//!   wheel: (debounce_ms: 120),
//! )"#,
//! )
//! .unwrap();
//!
//! assert_eq!(config.mask.kind, MaskKind::Time);
//! assert_eq!(config.dismiss_policy(), DismissPolicy::Discard);
//! ```

use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

/// Which family of value a mask describes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
pub enum MaskKind {
    #[default]
    Date,
    Time,
}

/// Segment layout of the typed text. `uses_12h`/`has_seconds` only matter for
/// [`MaskKind::Time`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(default)]
pub struct MaskConfig {
    pub kind: MaskKind,
    pub uses_12h: bool,
    pub has_seconds: bool,
}

impl MaskConfig {
    #[must_use]
    pub const fn date() -> Self {
        Self {
            kind: MaskKind::Date,
            uses_12h: false,
            has_seconds: false,
        }
    }

    #[must_use]
    pub const fn time(uses_12h: bool, has_seconds: bool) -> Self {
        Self {
            kind: MaskKind::Time,
            uses_12h,
            has_seconds,
        }
    }

    #[must_use]
    pub const fn is_date(&self) -> bool {
        matches!(self.kind, MaskKind::Date)
    }

    /// 12h mode is only meaningful for time masks.
    #[must_use]
    pub const fn wants_meridiem(&self) -> bool {
        matches!(self.kind, MaskKind::Time) && self.uses_12h
    }

    #[must_use]
    pub const fn wants_seconds(&self) -> bool {
        matches!(self.kind, MaskKind::Time) && self.has_seconds
    }

    /// Number of digits the mask can hold.
    #[must_use]
    pub const fn digit_capacity(&self) -> usize {
        match self.kind {
            MaskKind::Date => 8,
            MaskKind::Time if self.has_seconds => 6,
            MaskKind::Time => 4,
        }
    }
}

/// What happens to an uncommitted draft when the overlay closes without an
/// explicit confirm (outside click, escape).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum DismissPolicy {
    /// Drop the draft and fall back to the committed value.
    Discard,
    /// Commit the draft if something was selected since the overlay opened.
    ImplicitConfirm,
}

/// Geometry and timing of scroll wheels.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct WheelConfig {
    /// Height of one wheel row, in the same unit as scroll offsets.
    pub unit_height: f32,
    /// Quiet period after the last offset change before a wheel settles.
    pub debounce_ms: u64,
    /// Window after opening during which offset changes are ignored.
    pub grace_ms: u64,
}

impl Default for WheelConfig {
    fn default() -> Self {
        Self {
            unit_height: 40.0,
            debounce_ms: 150,
            grace_ms: 500,
        }
    }
}

impl WheelConfig {
    #[must_use]
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    #[must_use]
    pub fn grace(&self) -> Duration {
        Duration::from_millis(self.grace_ms)
    }
}

/// Span of years offered by the year wheel, relative to the year shown when the
/// overlay opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct YearWindow {
    pub before: u16,
    pub after: u16,
}

impl Default for YearWindow {
    fn default() -> Self {
        Self {
            before: 50,
            after: 49,
        }
    }
}

/// Full picker configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PickerConfig {
    pub mask: MaskConfig,
    /// `None` picks the default for the mask kind, see [`PickerConfig::dismiss_policy`].
    pub dismiss_policy: Option<DismissPolicy>,
    /// Treat every grid selection as an immediate confirm (single-click pickers).
    pub confirm_on_select: bool,
    pub wheel: WheelConfig,
    pub year_window: YearWindow,
    /// Canonical text used as the draft when nothing is committed. `None` means "now".
    pub fallback: Option<String>,
}

impl PickerConfig {
    #[must_use]
    pub fn date() -> Self {
        Self {
            mask: MaskConfig::date(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn time(uses_12h: bool, has_seconds: bool) -> Self {
        Self {
            mask: MaskConfig::time(uses_12h, has_seconds),
            ..Self::default()
        }
    }

    /// Parse and validate a RON configuration.
    pub fn from_ron(source: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject wheel geometry that cannot map offsets to rows.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let height = self.wheel.unit_height;
        if !height.is_finite() || height <= 0.0 {
            return Err(ConfigError::InvalidUnitHeight(height));
        }
        Ok(())
    }

    /// Calendar grids confirm on click, so a dismissed date overlay keeps the
    /// last clicked day; wheel-based time overlays have an explicit confirm
    /// button and drop the draft.
    #[must_use]
    pub fn dismiss_policy(&self) -> DismissPolicy {
        self.dismiss_policy.unwrap_or(match self.mask.kind {
            MaskKind::Date => DismissPolicy::ImplicitConfirm,
            MaskKind::Time => DismissPolicy::Discard,
        })
    }

    #[must_use]
    pub fn with_dismiss_policy(mut self, policy: DismissPolicy) -> Self {
        self.dismiss_policy = Some(policy);
        self
    }

    #[must_use]
    pub fn with_confirm_on_select(mut self, confirm_on_select: bool) -> Self {
        self.confirm_on_select = confirm_on_select;
        self
    }

    #[must_use]
    pub fn with_wheel(mut self, wheel: WheelConfig) -> Self {
        self.wheel = wheel;
        self
    }

    #[must_use]
    pub fn with_year_window(mut self, year_window: YearWindow) -> Self {
        self.year_window = year_window;
        self
    }

    #[must_use]
    pub fn with_fallback_text(mut self, fallback: impl Into<String>) -> Self {
        self.fallback = Some(fallback.into());
        self
    }
}

/// Errors raised while loading a [`PickerConfig`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("failed to parse picker config: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("wheel unit height must be a positive number, got {0}")]
    InvalidUnitHeight(f32),

    #[error("fallback `{text}` is not a complete value for the configured mask")]
    InvalidFallback { text: String },

    #[error("picker edits {expected:?} values but its mask is {found:?}")]
    MaskKindMismatch { expected: MaskKind, found: MaskKind },
}
