//! Handler registry keyed by event type

use crate::{Event, EventHandler};
use dashmap::DashMap;
use std::sync::Arc;

/// Ordered handler lists per event
///
/// Handlers for one event keep their registration order. Registering the
/// same handler twice makes it run twice.
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    handlers: Arc<DashMap<Event, Vec<Arc<dyn EventHandler>>>>,
}

impl HandlerRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(DashMap::new()),
        }
    }

    /// Append a handler to the list for `event`
    pub fn register(&self, event: Event, handler: Arc<dyn EventHandler>) {
        self.handlers.entry(event).or_default().push(handler);
    }

    /// Snapshot of the handlers for `event`, in registration order
    ///
    /// Returns `None` when nothing was ever registered for the event.
    pub fn get(&self, event: Event) -> Option<Vec<Arc<dyn EventHandler>>> {
        self.handlers.get(&event).map(|handlers| handlers.clone())
    }

    /// Number of handlers registered for `event`
    pub fn handler_count(&self, event: Event) -> usize {
        self.handlers.get(&event).map(|h| h.len()).unwrap_or(0)
    }

    /// Events with at least one handler, sorted
    pub fn events(&self) -> Vec<Event> {
        let mut events: Vec<Event> = self.handlers.iter().map(|entry| *entry.key()).collect();
        events.sort();
        events
    }

    /// Whether no handler is registered
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Remove every handler
    pub fn clear(&self) {
        self.handlers.clear();
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(
                self.handlers
                    .iter()
                    .map(|entry| (*entry.key(), entry.value().len())),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Payload, WebhookResponse, handler_fn};

    fn noop() -> Arc<dyn EventHandler> {
        Arc::new(handler_fn(|_: &Payload| Ok(WebhookResponse::ok(""))))
    }

    #[test]
    fn test_register_creates_list() {
        let registry = HandlerRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.get(Event::PullRequest).is_none());

        registry.register(Event::PullRequest, noop());

        assert_eq!(registry.handler_count(Event::PullRequest), 1);
        assert_eq!(registry.events(), vec![Event::PullRequest]);
    }

    #[test]
    fn test_register_appends_in_order() {
        let registry = HandlerRegistry::new();
        let first = noop();
        let second = noop();

        registry.register(Event::Push, first.clone());
        registry.register(Event::Push, second.clone());
        registry.register(Event::Push, first.clone());

        let handlers = registry.get(Event::Push).unwrap();
        assert_eq!(handlers.len(), 3);
        assert!(Arc::ptr_eq(&handlers[0], &first));
        assert!(Arc::ptr_eq(&handlers[1], &second));
        assert!(Arc::ptr_eq(&handlers[2], &first));
    }

    #[test]
    fn test_clones_share_state() {
        let registry = HandlerRegistry::new();
        let shared = registry.clone();

        shared.register(Event::Issues, noop());
        assert_eq!(registry.handler_count(Event::Issues), 1);
    }

    #[test]
    fn test_clear() {
        let registry = HandlerRegistry::new();
        registry.register(Event::Push, noop());
        registry.register(Event::Release, noop());
        assert_eq!(registry.events(), vec![Event::Push, Event::Release]);

        registry.clear();
        assert!(registry.is_empty());
        assert_eq!(registry.handler_count(Event::Push), 0);
    }
}
