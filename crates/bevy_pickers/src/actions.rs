use bevy_ecs::prelude::*;
use bevy_time::Time;
use tracing::debug;

use crate::{
    events::UiEventQueue,
    picker::Picker,
    value::{DateValue, PickerUnit, PickerValue, TimeValue},
};

/// User interaction with a picker entity.
///
/// The presentation layer pushes these into [`UiEventQueue`] and
/// [`handle_picker_actions`] applies them each frame to the entity's
/// `Picker<DateValue>` or `Picker<TimeValue>`.
#[derive(Debug, Clone, PartialEq)]
pub enum PickerAction {
    /// Text field gained focus.
    Focus,
    /// Text field lost focus.
    Blur,
    /// Text field contents changed.
    EditText(String),
    /// Grid cell for one unit clicked.
    SelectUnit { unit: PickerUnit, value: i32 },
    /// Wheel scroll position changed.
    ScrollOffset { unit: PickerUnit, offset: f32 },
    Open,
    /// Open when closed, dismiss when open (trigger button).
    Toggle,
    Confirm,
    /// Outside click or escape.
    Dismiss,
    Clear,
    /// Calendar header arrows. Date pickers only.
    NavigateMonth { forward: bool },
    /// Calendar day cell clicked. Date pickers only.
    SelectDate(DateValue),
}

/// Host-side replacement of a picker's committed value.
#[derive(Debug, Clone, PartialEq)]
pub struct SetPickerValue<V>(pub Option<V>);

/// Written whenever a picker's committed value changes.
#[derive(Message, Debug, Clone, PartialEq)]
pub struct UiPickerChanged<V: PickerValue> {
    pub picker: Entity,
    pub value: Option<V>,
}

/// Written when a picker's overlay opens or closes.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiPickerOpenChanged {
    pub picker: Entity,
    pub is_open: bool,
}

/// Consume picker inputs from [`UiEventQueue`] in a single pass and apply them.
///
/// [`PickerAction`] and [`SetPickerValue`] entries are handled in push order.
/// Entries of any other type go back on the queue for their own consumer.
/// Resulting commits and open/close changes are written as [`UiPickerChanged`]
/// and [`UiPickerOpenChanged`] messages.
pub fn handle_picker_actions(world: &mut World) {
    let events = world.resource::<UiEventQueue>().drain_all();
    let mut unhandled = Vec::new();

    for event in events {
        let event = match event.into_action::<PickerAction>() {
            Ok(event) => {
                apply_picker_action(world, event.entity, event.action);
                continue;
            }
            Err(event) => event,
        };
        let event = match event.into_action::<SetPickerValue<DateValue>>() {
            Ok(event) => {
                apply_external_value(world, event.entity, event.action);
                continue;
            }
            Err(event) => event,
        };
        match event.into_action::<SetPickerValue<TimeValue>>() {
            Ok(event) => apply_external_value(world, event.entity, event.action),
            Err(event) => unhandled.push(event),
        }
    }

    if !unhandled.is_empty() {
        let queue = world.resource::<UiEventQueue>();
        for event in unhandled {
            queue.push(event);
        }
    }
}

/// Advance wheel settling for every open picker.
///
/// Only a settle that moves the draft marks the component changed.
pub fn tick_picker_wheels<V: PickerValue>(time: Res<Time>, mut pickers: Query<&mut Picker<V>>) {
    let delta = time.delta();

    for mut picker in &mut pickers {
        if !picker.is_open() {
            continue;
        }
        if picker.bypass_change_detection().tick(delta) {
            picker.set_changed();
        }
    }
}

fn apply_picker_action(world: &mut World, picker: Entity, action: PickerAction) {
    if world.get_entity(picker).is_err() {
        debug!(entity = ?picker, "picker action for despawned entity");
        return;
    }

    if world.get::<Picker<DateValue>>(picker).is_some() {
        apply_to::<DateValue>(world, picker, |state| {
            apply_date_action(state, action);
        });
    } else if world.get::<Picker<TimeValue>>(picker).is_some() {
        apply_to::<TimeValue>(world, picker, |state| {
            apply_action(state, action);
        });
    } else {
        debug!(entity = ?picker, "picker action for entity without a picker");
    }
}

fn apply_external_value<V: PickerValue>(
    world: &mut World,
    picker: Entity,
    SetPickerValue(value): SetPickerValue<V>,
) {
    let handled = apply_to::<V>(world, picker, |state| {
        state.on_external_value_set(value);
    });
    if !handled {
        debug!(entity = ?picker, "external value for missing picker");
    }
}

fn apply_to<V: PickerValue>(
    world: &mut World,
    picker: Entity,
    apply: impl FnOnce(&mut Picker<V>),
) -> bool {
    let Some(mut state) = world.get_mut::<Picker<V>>(picker) else {
        return false;
    };

    let was_open = state.is_open();
    apply(&mut *state);
    let is_open = state.is_open();
    let changed = state.take_committed_change();
    drop(state);

    if let Some(value) = changed {
        world.write_message(UiPickerChanged { picker, value });
    }
    if was_open != is_open {
        world.write_message(UiPickerOpenChanged { picker, is_open });
    }
    true
}

fn apply_date_action(picker: &mut Picker<DateValue>, action: PickerAction) {
    match action {
        PickerAction::NavigateMonth { forward } => {
            picker.navigate_month(forward);
        }
        PickerAction::SelectDate(date) => {
            picker.select_date(date);
        }
        other => apply_action(picker, other),
    }
}

fn apply_action<V: PickerValue>(picker: &mut Picker<V>, action: PickerAction) {
    match action {
        PickerAction::Focus => picker.on_focus(),
        PickerAction::Blur => picker.on_blur(),
        PickerAction::EditText(text) => {
            picker.on_raw_text_edit(&text);
        }
        PickerAction::SelectUnit { unit, value } => {
            picker.on_grid_unit_selected(unit, value);
        }
        PickerAction::ScrollOffset { unit, offset } => {
            picker.on_scroll_offset(unit, offset);
        }
        PickerAction::Open => {
            picker.on_open();
        }
        PickerAction::Toggle => {
            if picker.is_open() {
                picker.on_dismiss();
            } else {
                picker.on_open();
            }
        }
        PickerAction::Confirm => {
            picker.on_confirm();
        }
        PickerAction::Dismiss => {
            picker.on_dismiss();
        }
        PickerAction::Clear => picker.on_clear(),
        action @ (PickerAction::NavigateMonth { .. } | PickerAction::SelectDate(_)) => {
            debug!(?action, "calendar action ignored by a non-date picker");
        }
    }
}
