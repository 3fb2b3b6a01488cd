//! Structured change notifications for scene mutations.
//!
//! Every mutation on a [`Scene`](crate::model::Scene) publishes a
//! [`ChangeEvent`] on the scene's bus. Undo/redo history and the live preview
//! subscribe to it; the model itself never depends on who is listening.

use crate::id::ShapeId;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// What a change event refers to.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Entity {
    Scene,
    Shape {
        shape: ShapeId,
    },
    Property {
        shape: ShapeId,
        property: String,
    },
    Transition {
        shape: ShapeId,
        property: String,
        second: f64,
    },
}

impl Entity {
    /// The shape this entity belongs to, if any.
    pub fn shape(&self) -> Option<ShapeId> {
        match self {
            Entity::Scene => None,
            Entity::Shape { shape }
            | Entity::Property { shape, .. }
            | Entity::Transition { shape, .. } => Some(*shape),
        }
    }
}

/// One field-level change. `None` on the old side means "created", `None` on
/// the new side means "removed".
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeEvent {
    pub entity: Entity,
    pub field: &'static str,
    pub old_value: Option<Value>,
    pub new_value: Option<Value>,
}

impl ChangeEvent {
    pub fn new(
        entity: Entity,
        field: &'static str,
        old_value: Option<Value>,
        new_value: Option<Value>,
    ) -> Self {
        Self {
            entity,
            field,
            old_value,
            new_value,
        }
    }
}

/// Handle returned by [`EventBus::subscribe`].
pub type SubscriptionId = u64;

type Listener = Box<dyn FnMut(&ChangeEvent)>;

/// Synchronous publish/subscribe channel. Listeners run in subscription
/// order on the publishing thread.
#[derive(Default)]
pub struct EventBus {
    next_id: SubscriptionId,
    listeners: Vec<(SubscriptionId, Listener)>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&ChangeEvent) + 'static) -> SubscriptionId {
        let id = self.next_id;
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns false if the id was unknown.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    pub fn publish(&mut self, event: ChangeEvent) {
        log::trace!("change {:?}.{}", event.entity, event.field);
        for (_, listener) in &mut self.listeners {
            listener(&event);
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// Cloning a bus yields an empty one: subscriptions belong to the original
/// scene instance.
impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn sample() -> ChangeEvent {
        ChangeEvent::new(
            Entity::Shape {
                shape: ShapeId::intern("rect_a"),
            },
            "zIndex",
            Some(Value::from(1)),
            Some(Value::from(2)),
        )
    }

    #[test]
    fn publish_reaches_all_listeners() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();
        for tag in ["a", "b"] {
            let seen = Rc::clone(&seen);
            bus.subscribe(move |e| seen.borrow_mut().push((tag, e.field)));
        }
        bus.publish(sample());
        assert_eq!(*seen.borrow(), vec![("a", "zIndex"), ("b", "zIndex")]);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let count = Rc::new(RefCell::new(0));
        let mut bus = EventBus::new();
        let c = Rc::clone(&count);
        let id = bus.subscribe(move |_| *c.borrow_mut() += 1);
        bus.publish(sample());
        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        bus.publish(sample());
        assert_eq!(*count.borrow(), 1);
        assert!(bus.is_empty());
    }

    #[test]
    fn event_serializes_camel_case() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["entity"]["kind"], "shape");
        assert_eq!(json["entity"]["shape"], "rect_a");
        assert_eq!(json["oldValue"], 1);
        assert_eq!(json["newValue"], 2);
    }
}
