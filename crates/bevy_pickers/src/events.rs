use std::{any::Any, fmt, sync::Arc};

use bevy_ecs::{entity::Entity, prelude::Resource};
use crossbeam_queue::SegQueue;

/// Type-erased picker action or notification addressed to an entity.
pub struct UiEvent {
    pub entity: Entity,
    pub action: Box<dyn Any + Send + Sync>,
}

impl fmt::Debug for UiEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UiEvent")
            .field("entity", &self.entity)
            .field("action", &"<type-erased>")
            .finish()
    }
}

impl UiEvent {
    #[must_use]
    pub fn typed<T: Any + Send + Sync>(entity: Entity, action: T) -> Self {
        Self {
            entity,
            action: Box::new(action),
        }
    }

    /// Downcast to `T`, handing the event back unchanged on a type mismatch.
    pub fn into_action<T: Any + Send + Sync>(self) -> Result<TypedUiEvent<T>, Self> {
        let Self { entity, action } = self;
        match action.downcast::<T>() {
            Ok(action) => Ok(TypedUiEvent {
                entity,
                action: *action,
            }),
            Err(action) => Err(Self { entity, action }),
        }
    }
}

/// Typed event produced from a type-erased [`UiEvent`] queue entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypedUiEvent<T> {
    pub entity: Entity,
    pub action: T,
}

/// Lock-free input queue shared between the presentation layer and picker systems.
///
/// Carries [`crate::PickerAction`] and [`crate::SetPickerValue`] entries. Picker
/// outputs are Bevy messages, not queue entries.
#[derive(Resource, Clone, Debug)]
pub struct UiEventQueue {
    queue: Arc<SegQueue<UiEvent>>,
}

impl Default for UiEventQueue {
    fn default() -> Self {
        Self {
            queue: Arc::new(SegQueue::new()),
        }
    }
}

impl UiEventQueue {
    /// Handle for pushing from outside the ECS world.
    #[must_use]
    pub fn shared_queue(&self) -> Arc<SegQueue<UiEvent>> {
        self.queue.clone()
    }

    pub fn push(&self, event: UiEvent) {
        self.queue.push(event);
    }

    pub fn push_typed<T: Any + Send + Sync>(&self, entity: Entity, action: T) {
        self.push(UiEvent::typed(entity, action));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Take every queued entry, in push order.
    #[must_use]
    pub fn drain_all(&self) -> Vec<UiEvent> {
        let mut drained = Vec::with_capacity(self.queue.len());
        while let Some(event) = self.queue.pop() {
            drained.push(event);
        }
        drained
    }

    /// Take every entry of type `T`, in push order.
    ///
    /// Entries of other types stay queued, also in their original order.
    #[must_use]
    pub fn drain_actions<T: Any + Send + Sync>(&self) -> Vec<TypedUiEvent<T>> {
        let mut drained = Vec::new();
        let mut kept = Vec::new();
        while let Some(event) = self.queue.pop() {
            match event.into_action::<T>() {
                Ok(event) => drained.push(event),
                Err(other) => kept.push(other),
            }
        }
        for event in kept {
            self.queue.push(event);
        }
        drained
    }
}

#[cfg(test)]
mod tests {
    use bevy_ecs::world::World;

    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Ping(u32);

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Pong;

    #[test]
    fn drain_keeps_other_action_types() {
        let mut world = World::new();
        let entity = world.spawn_empty().id();
        let queue = UiEventQueue::default();

        queue.push_typed(entity, Ping(1));
        queue.push_typed(entity, Pong);
        queue.push_typed(entity, Ping(2));

        let pings = queue.drain_actions::<Ping>();
        assert_eq!(
            pings.iter().map(|e| e.action.clone()).collect::<Vec<_>>(),
            vec![Ping(1), Ping(2)]
        );
        assert_eq!(queue.len(), 1);

        let pongs = queue.drain_actions::<Pong>();
        assert_eq!(pongs.len(), 1);
        assert_eq!(pongs[0].entity, entity);
        assert!(queue.is_empty());
    }

    #[test]
    fn drain_all_empties_the_queue_in_order() {
        let mut world = World::new();
        let entity = world.spawn_empty().id();
        let queue = UiEventQueue::default();

        queue.push_typed(entity, Ping(1));
        queue.push_typed(entity, Pong);

        let mut drained = queue.drain_all().into_iter();
        assert!(queue.is_empty());
        let first = drained.next().unwrap().into_action::<Ping>().unwrap();
        assert_eq!(first.action, Ping(1));
        let second = drained.next().unwrap();
        let second = second.into_action::<Ping>().unwrap_err();
        assert!(second.into_action::<Pong>().is_ok());
        assert!(drained.next().is_none());
    }

    #[test]
    fn shared_queue_feeds_the_resource() {
        let mut world = World::new();
        let entity = world.spawn_empty().id();
        let queue = UiEventQueue::default();

        queue.shared_queue().push(UiEvent::typed(entity, Pong));
        assert_eq!(queue.drain_actions::<Pong>().len(), 1);
    }
}
