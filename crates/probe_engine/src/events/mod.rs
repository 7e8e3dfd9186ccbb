//! Scene event system
//! Key principles:
//! - Key-value arguments (no order dependency)
//! - Handler returns bool (true = consumed, stops forwarding)
//! - Registration system (only notify interested handlers)
//! - Subscriptions are guards: dropping one unregisters its handler
//! - Immediate delivery (`emit`) plus a queue for deferred delivery (`send` + `dispatch`)
//!
//! Everything here is single-threaded. Handlers are shared through `Rc` so that
//! a handler may be unregistered while an event is being delivered.

use crate::scene::{Entity, Scene};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

/// Event type identification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    /// An entity was attached somewhere in the scene
    ChildAttached,
    /// An entity was detached (or despawned) from the scene
    ChildDetached,
    /// The bounding-box system reported two entities starting to overlap
    CollisionStarted,
}

/// Variant for type-safe event arguments
/// Uses key-value pairs to avoid order dependency problems
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EventArg {
    /// Reference to another entity
    Entity(Entity),
}

/// Argument key for the attached/detached child
pub const ARG_CHILD: &str = "child";

/// Argument key for the other party of a collision
pub const ARG_WITH: &str = "with";

/// Event with type ID, target entity and key-value arguments
#[derive(Debug, Clone)]
pub struct Event {
    /// Type of event
    pub event_type: EventType,
    /// Entity the event is addressed to (parent for attach/detach, `None` for the scene root)
    pub target: Option<Entity>,
    args: HashMap<&'static str, EventArg>,
}

impl Event {
    /// Create a new event with the given type and target
    pub fn new(event_type: EventType, target: Option<Entity>) -> Self {
        Self {
            event_type,
            target,
            args: HashMap::new(),
        }
    }

    /// `child` was attached under `parent` (`None` = scene root)
    pub fn child_attached(parent: Option<Entity>, child: Entity) -> Self {
        Self::new(EventType::ChildAttached, parent).with_arg(ARG_CHILD, EventArg::Entity(child))
    }

    /// `child` was detached from `parent` (`None` = scene root)
    pub fn child_detached(parent: Option<Entity>, child: Entity) -> Self {
        Self::new(EventType::ChildDetached, parent).with_arg(ARG_CHILD, EventArg::Entity(child))
    }

    /// `target` started overlapping `with`
    pub fn collision_started(target: Entity, with: Entity) -> Self {
        Self::new(EventType::CollisionStarted, Some(target)).with_arg(ARG_WITH, EventArg::Entity(with))
    }

    /// Add an argument to the event (builder pattern)
    pub fn with_arg(mut self, key: &'static str, value: EventArg) -> Self {
        self.args.insert(key, value);
        self
    }

    /// Get an argument by key
    pub fn get_arg(&self, key: &str) -> Option<&EventArg> {
        self.args.get(key)
    }

    /// Get an entity argument if present
    pub fn get_entity(&self, key: &str) -> Option<Entity> {
        match self.get_arg(key) {
            Some(EventArg::Entity(entity)) => Some(*entity),
            None => None,
        }
    }

    /// The child of an attach/detach event
    pub fn child(&self) -> Option<Entity> {
        self.get_entity(ARG_CHILD)
    }

    /// The other party of a collision event
    pub fn with_entity(&self) -> Option<Entity> {
        self.get_entity(ARG_WITH)
    }
}

/// Event handler trait
/// Returns true if event was consumed (stops forwarding)
/// Returns false to allow forwarding to other handlers
pub trait EventHandler {
    /// Handle an event, return true if consumed
    fn on_event(&mut self, event: &Event, scene: &Scene) -> bool;
}

impl<F> EventHandler for F
where
    F: FnMut(&Event, &Scene) -> bool,
{
    fn on_event(&mut self, event: &Event, scene: &Scene) -> bool {
        self(event, scene)
    }
}

/// Identifier of a registered handler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type SharedHandler = Rc<RefCell<dyn EventHandler>>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    handlers: HashMap<EventType, Vec<(SubscriptionId, SharedHandler)>>,
}

impl Registry {
    fn remove(&mut self, event_type: EventType, id: SubscriptionId) {
        if let Some(handlers) = self.handlers.get_mut(&event_type) {
            handlers.retain(|(handler_id, _)| *handler_id != id);
        }
    }

    fn contains(&self, event_type: EventType, id: SubscriptionId) -> bool {
        self.handlers
            .get(&event_type)
            .is_some_and(|handlers| handlers.iter().any(|(handler_id, _)| *handler_id == id))
    }
}

/// Guard for a registered handler
///
/// The handler stays registered for as long as the guard lives.
#[must_use = "dropping a Subscription immediately unregisters its handler"]
pub struct Subscription {
    id: SubscriptionId,
    event_type: EventType,
    registry: Weak<RefCell<Registry>>,
}

impl Subscription {
    /// Identifier of the registered handler
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Event type the handler listens to
    pub fn event_type(&self) -> EventType {
        self.event_type
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        // The event system may already be gone together with its scene
        if let Some(registry) = self.registry.upgrade() {
            registry.borrow_mut().remove(self.event_type, self.id);
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("event_type", &self.event_type)
            .finish()
    }
}

/// Event system with registration and queuing
/// Follows chain of responsibility pattern
pub struct EventSystem {
    registry: Rc<RefCell<Registry>>,
    queue: RefCell<Vec<Event>>,
}

impl EventSystem {
    /// Create a new empty event system
    pub fn new() -> Self {
        Self {
            registry: Rc::new(RefCell::new(Registry::default())),
            queue: RefCell::new(Vec::new()),
        }
    }

    /// Register a handler for a specific event type
    /// Only handlers registered for this type will be notified
    pub fn subscribe<H>(&self, event_type: EventType, handler: H) -> Subscription
    where
        H: EventHandler + 'static,
    {
        let mut registry = self.registry.borrow_mut();
        let id = SubscriptionId(registry.next_id);
        registry.next_id += 1;

        let handler: SharedHandler = Rc::new(RefCell::new(handler));
        registry.handlers.entry(event_type).or_default().push((id, handler));

        Subscription {
            id,
            event_type,
            registry: Rc::downgrade(&self.registry),
        }
    }

    /// Number of handlers currently registered for `event_type`
    pub fn handler_count(&self, event_type: EventType) -> usize {
        self.registry
            .borrow()
            .handlers
            .get(&event_type)
            .map_or(0, Vec::len)
    }

    /// Deliver an event right away
    pub fn emit(&self, event: &Event, scene: &Scene) {
        // Snapshot so handlers can (un)subscribe while we iterate
        let handlers: Vec<(SubscriptionId, SharedHandler)> = self
            .registry
            .borrow()
            .handlers
            .get(&event.event_type)
            .cloned()
            .unwrap_or_default();

        for (id, shared) in handlers {
            if !self.registry.borrow().contains(event.event_type, id) {
                continue;
            }
            let Ok(mut handler) = shared.try_borrow_mut() else {
                log::warn!("Skipping re-entrant delivery of {:?} to handler {:?}", event.event_type, id);
                continue;
            };
            if handler.on_event(event, scene) {
                // Event consumed, stop forwarding
                break;
            }
        }
    }

    /// Queue an event for the next `dispatch`
    pub fn send(&self, event: Event) {
        self.queue.borrow_mut().push(event);
    }

    /// Number of queued events
    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Dispatch all queued events in the order they were sent
    pub fn dispatch(&self, scene: &Scene) {
        let queued = std::mem::take(&mut *self.queue.borrow_mut());
        for event in &queued {
            self.emit(event, scene);
        }
    }

    /// Clear all queued events (useful for state transitions)
    pub fn clear(&self) {
        self.queue.borrow_mut().clear();
    }
}

impl Default for EventSystem {
    fn default() -> Self {
        Self::new()
    }
}
