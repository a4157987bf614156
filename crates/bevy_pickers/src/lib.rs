//! Masked date/time picker state for Bevy.
//!
//! `bevy_pickers` holds everything a date or time input needs except drawing it:
//! - incremental mask formatting of typed text ([`mask::format`]),
//! - a synchronizer that keeps the committed value, the overlay draft and the
//!   typed text consistent across focus, open, confirm and clear,
//! - debounced scroll-wheel settling and calendar grid generation,
//! - a [`PickersPlugin`] that drives [`Picker`] components from [`UiEventQueue`]
//!   and reports changes as [`UiPickerChanged`] and [`UiPickerOpenChanged`] messages.
//!
//! # Minimal setup
//!
//! ```no_run
//! use bevy_pickers::{
//!     DateValue, Picker, PickerAction, PickersPlugin, UiEventQueue, UiPickerChanged,
//!     bevy_app::{App, Update},
//!     bevy_ecs::prelude::*,
//! };
//!
//! fn report(mut changes: MessageReader<UiPickerChanged<DateValue>>) {
//!     for change in changes.read() {
//!         println!("{:?} -> {:?}", change.picker, change.value);
//!     }
//! }
//!
//! let mut app = App::new();
//! app.add_plugins(PickersPlugin).add_systems(Update, report);
//!
//! let picker = app.world_mut().spawn(Picker::<DateValue>::date()).id();
//! app.world()
//!     .resource::<UiEventQueue>()
//!     .push_typed(picker, PickerAction::EditText("20240115".into()));
//! app.update();
//! ```
#![forbid(unsafe_code)]

pub mod actions;
pub mod config;
pub mod events;
pub mod grid;
pub mod logging;
pub mod mask;
pub mod picker;
pub mod plugin;
pub mod segment;
pub mod sync;
pub mod value;
pub mod wheel;

pub use bevy_app;
pub use bevy_ecs;
pub use bevy_time;

pub use actions::*;
pub use config::*;
pub use events::*;
pub use grid::{CalendarView, GridDay, MonthGrid, TimeUnitOptions, WEEKDAY_LABELS};
pub use logging::{init_logging, init_logging_with};
pub use picker::Picker;
pub use plugin::*;
pub use segment::Segment;
pub use sync::{EditOutcome, Fallback, SyncPhase, Synchronizer};
pub use value::*;
pub use wheel::{WheelResolver, WheelSet};

pub mod prelude {
    pub use crate::{
        DateValue, EditOutcome, Meridiem, Picker, PickerAction, PickerConfig, PickerUnit,
        PickerValue, PickersPlugin, SetPickerValue, TimeValue, UiEventQueue, UiPickerChanged,
        UiPickerOpenChanged,
    };
}
