use bevy_app::{App, Plugin, PreUpdate, Update};
use bevy_time::TimePlugin;

use crate::{
    actions::{UiPickerChanged, UiPickerOpenChanged, handle_picker_actions, tick_picker_wheels},
    events::UiEventQueue,
    value::{DateValue, TimeValue},
};

/// Bevy plugin driving `Picker<DateValue>` and `Picker<TimeValue>` components.
///
/// Actions are applied in `PreUpdate`, wheels settle in `Update` from the
/// frame's [`bevy_time::Time`] delta. Outputs are registered as messages and
/// expire after two frames when nobody reads them.
#[derive(Default)]
pub struct PickersPlugin;

impl Plugin for PickersPlugin {
    fn build(&self, app: &mut App) {
        if !app.is_plugin_added::<TimePlugin>() {
            app.add_plugins(TimePlugin);
        }

        app.init_resource::<UiEventQueue>()
            .add_message::<UiPickerChanged<DateValue>>()
            .add_message::<UiPickerChanged<TimeValue>>()
            .add_message::<UiPickerOpenChanged>()
            .add_systems(PreUpdate, handle_picker_actions)
            .add_systems(
                Update,
                (
                    tick_picker_wheels::<DateValue>,
                    tick_picker_wheels::<TimeValue>,
                ),
            );
    }
}
