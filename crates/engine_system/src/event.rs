//! Events raised on entities.
//!
//! An event is any `'static` type implementing [`Event`]. It is raised on a
//! target entity and delivered to every handler subscribed to that event
//! type through a component the target has. Handlers receive the event by
//! `&mut` so they can fill in results (examine text, a handled flag).

use std::any::Any;

use engine_component::Entity;

/// Marker trait for event types.
pub trait Event: Any {
    /// A human-readable name, used in logs.
    fn event_name() -> &'static str;
}

/// An entity was put into one of the owner's containers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntInsertedIntoContainer {
    /// The container (slot) id.
    pub container_id: String,
    /// The entity that was inserted.
    pub entity: Entity,
    /// The entity owning the container; the event is raised on it.
    pub owner: Entity,
}

impl Event for EntInsertedIntoContainer {
    fn event_name() -> &'static str {
        "EntInsertedIntoContainer"
    }
}

/// An entity was taken out of one of the owner's containers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntRemovedFromContainer {
    pub container_id: String,
    pub entity: Entity,
    pub owner: Entity,
}

impl Event for EntRemovedFromContainer {
    fn event_name() -> &'static str {
        "EntRemovedFromContainer"
    }
}

/// A user interacted with ("used") an entity in the world.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivateInWorldEvent {
    pub user: Entity,
    pub target: Entity,
    /// `true` for interactions that did not come straight from the user's
    /// hands, such as an activation forwarded from another entity.
    pub complex: bool,
    pub handled: bool,
}

impl ActivateInWorldEvent {
    #[must_use]
    pub fn new(user: Entity, target: Entity, complex: bool) -> Self {
        Self {
            user,
            target,
            complex,
            handled: false,
        }
    }
}

impl Event for ActivateInWorldEvent {
    fn event_name() -> &'static str {
        "ActivateInWorldEvent"
    }
}

/// Someone looked closely at an entity. Handlers append lines of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExaminedEvent {
    pub examiner: Entity,
    pub examined: Entity,
    markup: Vec<String>,
}

impl ExaminedEvent {
    #[must_use]
    pub fn new(examiner: Entity, examined: Entity) -> Self {
        Self {
            examiner,
            examined,
            markup: Vec::new(),
        }
    }

    pub fn push_markup(&mut self, line: impl Into<String>) {
        self.markup.push(line.into());
    }

    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.markup
    }

    /// All lines joined with newlines.
    #[must_use]
    pub fn text(&self) -> String {
        self.markup.join("\n")
    }
}

impl Event for ExaminedEvent {
    fn event_name() -> &'static str {
        "ExaminedEvent"
    }
}

/// Downcast an erased event back to `E`.
pub(crate) fn downcast<E: Event>(event: &mut dyn Any) -> Option<&mut E> {
    event.downcast_mut::<E>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_examine_text_joins_lines() {
        let mut ev = ExaminedEvent::new(Entity::from_raw(1), Entity::from_raw(2));
        assert_eq!(ev.text(), "");
        ev.push_markup("first");
        ev.push_markup(String::from("second"));
        assert_eq!(ev.lines().len(), 2);
        assert_eq!(ev.text(), "first\nsecond");
    }

    #[test]
    fn test_activation_starts_unhandled() {
        let ev = ActivateInWorldEvent::new(Entity::from_raw(1), Entity::from_raw(2), true);
        assert!(ev.complex);
        assert!(!ev.handled);
    }
}
