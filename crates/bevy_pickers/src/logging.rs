//! Tracing setup for hosts that do not install their own subscriber.
//!
//! Picker code logs under the `bevy_pickers::*` targets: `debug` for dropped
//! actions and host values deferred while the user edits, `trace` for every
//! formatted keystroke and wheel settle.

use std::sync::OnceLock;

use tracing_subscriber::{EnvFilter, fmt};

/// Picker lifecycle at `info`, everything else at `warn`.
pub const DEFAULT_LOG_FILTER: &str = "warn,bevy_pickers=info";

/// Follows typed text and wheel settling frame by frame.
pub const KEYSTROKE_LOG_FILTER: &str =
    "warn,bevy_pickers=debug,bevy_pickers::sync=trace,bevy_pickers::wheel=trace";

static LOGGING_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Install a `fmt` subscriber filtered by `RUST_LOG` or [`DEFAULT_LOG_FILTER`].
///
/// Later calls are no-ops, as is calling it after the host set its own subscriber.
pub fn init_logging() {
    init_logging_with(DEFAULT_LOG_FILTER);
}

/// Like [`init_logging`], falling back to `directives` when `RUST_LOG` is unset
/// or unparsable.
pub fn init_logging_with(directives: &str) {
    LOGGING_INITIALIZED.get_or_init(|| {
        let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
        let filter = picker_filter(rust_log.as_deref(), directives);
        let _ = fmt().with_env_filter(filter).try_init();
    });
}

fn picker_filter(rust_log: Option<&str>, fallback: &str) -> EnvFilter {
    rust_log
        .map(str::trim)
        .filter(|directives| !directives.is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(fallback))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_filters_parse() {
        assert!(EnvFilter::try_new(DEFAULT_LOG_FILTER).is_ok());
        assert!(EnvFilter::try_new(KEYSTROKE_LOG_FILTER).is_ok());
    }

    #[test]
    fn rust_log_overrides_the_fallback() {
        let filter = picker_filter(Some("bevy_pickers=trace"), DEFAULT_LOG_FILTER);
        assert!(filter.to_string().contains("bevy_pickers=trace"));
    }

    #[test]
    fn blank_or_broken_rust_log_uses_the_fallback() {
        for rust_log in [None, Some("   "), Some("bevy_pickers=loudest")] {
            let filter = picker_filter(rust_log, DEFAULT_LOG_FILTER);
            assert!(filter.to_string().contains("bevy_pickers=info"));
        }
    }

    #[test]
    fn init_logging_can_be_called_multiple_times() {
        init_logging();
        init_logging_with(KEYSTROKE_LOG_FILTER);
    }
}
