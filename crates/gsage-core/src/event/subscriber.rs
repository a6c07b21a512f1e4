use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use crate::event::dispatcher::{DispatcherId, EventDispatcher};
use crate::event::signal::EventConnection;
use crate::event::types::DispatcherEvent;
use crate::event::{callback, Event, EventCallback, EventPriority, EventResult, DEFAULT_PRIORITY};

/// Connections held for one dispatcher
struct DispatcherBinding {
    /// FORCE_UNSUBSCRIBE listener releasing this binding on teardown
    guard: EventConnection,
    connections: Vec<EventConnection>,
}

impl DispatcherBinding {
    /// False once the dispatcher cleared its map without this guard running,
    /// e.g. when an earlier teardown listener consumed the notification.
    fn is_guarding(&self, dispatcher: &EventDispatcher) -> bool {
        self.guard.is_connected()
            && dispatcher.has_listeners_for_type(DispatcherEvent::FORCE_UNSUBSCRIBE)
            && dispatcher
                .signal_for(DispatcherEvent::FORCE_UNSUBSCRIBE)
                .is_some_and(|signal| self.guard.is_attached_to(&signal))
    }

    fn disconnect(self) {
        self.guard.disconnect();
        for connection in &self.connections {
            connection.disconnect();
        }
    }
}

type Bindings = HashMap<DispatcherId, DispatcherBinding>;

fn lock(bindings: &Mutex<Bindings>) -> MutexGuard<'_, Bindings> {
    bindings.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Registers listeners on any number of dispatchers and keeps their
/// connections.
///
/// - Dropping the subscriber disconnects everything it registered.
/// - When a dispatcher tears down, its `FORCE_UNSUBSCRIBE` notification makes
///   the subscriber forget the connections it held for that dispatcher.
///
/// Callbacks must not capture the owner of the subscriber by strong
/// reference, or the pair keeps itself alive; capture a `Weak` instead.
pub struct EventSubscriber {
    name: String,
    bindings: Arc<Mutex<Bindings>>,
}

impl fmt::Debug for EventSubscriber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dispatchers = lock(&self.bindings).len();
        f.debug_struct("EventSubscriber")
            .field("name", &self.name)
            .field("dispatchers", &dispatchers)
            .field("connections", &self.connection_count())
            .finish()
    }
}

impl EventSubscriber {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), bindings: Arc::new(Mutex::new(HashMap::new())) }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Listen to `event_type` on `dispatcher` with the default priority
    pub fn add_event_listener<F>(&self, dispatcher: &EventDispatcher, event_type: &str, handler: F)
    where
        F: Fn(&EventDispatcher, &dyn Event) -> EventResult + Send + Sync + 'static,
    {
        self.add_event_listener_with_priority(dispatcher, event_type, DEFAULT_PRIORITY, handler);
    }

    /// Listen to `event_type` on `dispatcher`; lower priorities run first
    pub fn add_event_listener_with_priority<F>(
        &self,
        dispatcher: &EventDispatcher,
        event_type: &str,
        priority: EventPriority,
        handler: F,
    ) where
        F: Fn(&EventDispatcher, &dyn Event) -> EventResult + Send + Sync + 'static,
    {
        self.connect(dispatcher, event_type, priority, callback(handler));
    }

    /// Listen with a handler that receives the concrete event struct.
    ///
    /// Events of that type carrying another payload are logged and let through.
    pub fn add_typed_listener<E, F>(
        &self,
        dispatcher: &EventDispatcher,
        event_type: &str,
        priority: EventPriority,
        handler: F,
    ) where
        E: Event,
        F: Fn(&EventDispatcher, &E) -> EventResult + Send + Sync + 'static,
    {
        let subscriber = self.name.clone();
        let typed = callback(move |dispatcher, event| match event.payload::<E>() {
            Ok(payload) => handler(dispatcher, payload),
            Err(e) => {
                log::warn!("[{}] {}", subscriber, e);
                EventResult::Continue
            }
        });
        self.connect(dispatcher, event_type, priority, typed);
    }

    fn connect(&self, dispatcher: &EventDispatcher, event_type: &str, priority: EventPriority, cb: EventCallback) {
        let mut bindings = lock(&self.bindings);
        let stale = bindings
            .get(&dispatcher.id())
            .is_some_and(|binding| !binding.is_guarding(dispatcher));
        if stale {
            if let Some(binding) = bindings.remove(&dispatcher.id()) {
                log::debug!(
                    "[{}] dispatcher #{} was reset without notice, dropped {} stale connection(s)",
                    self.name, dispatcher.id(), binding.connections.len()
                );
                binding.disconnect();
            }
        }

        let binding = bindings.entry(dispatcher.id()).or_insert_with(|| DispatcherBinding {
            guard: dispatcher.add_event_listener(
                DispatcherEvent::FORCE_UNSUBSCRIBE,
                self.release_on_teardown(dispatcher.id()),
                EventPriority::MIN,
            ),
            connections: Vec::new(),
        });
        binding.connections.push(dispatcher.add_event_listener(event_type, cb, priority));
    }

    fn release_on_teardown(&self, dispatcher_id: DispatcherId) -> EventCallback {
        let bindings: Weak<Mutex<Bindings>> = Arc::downgrade(&self.bindings);
        let subscriber = self.name.clone();
        callback(move |_, _| {
            if let Some(bindings) = bindings.upgrade() {
                let released = lock(&bindings).remove(&dispatcher_id);
                if let Some(binding) = released {
                    log::debug!(
                        "[{}] dispatcher #{} is going away, released {} connection(s)",
                        subscriber, dispatcher_id, binding.connections.len()
                    );
                }
            }
            EventResult::Continue
        })
    }

    /// Disconnect everything registered on `dispatcher`
    pub fn remove_event_listeners(&self, dispatcher: &EventDispatcher) {
        let removed = lock(&self.bindings).remove(&dispatcher.id());
        if let Some(binding) = removed {
            binding.disconnect();
        }
    }

    /// Disconnect everything on every dispatcher
    pub fn remove_all_event_listeners(&self) {
        let removed = std::mem::take(&mut *lock(&self.bindings));
        for binding in removed.into_values() {
            binding.disconnect();
        }
    }

    pub fn is_subscribed_to(&self, dispatcher: &EventDispatcher) -> bool {
        lock(&self.bindings)
            .get(&dispatcher.id())
            .is_some_and(|binding| binding.is_guarding(dispatcher))
    }

    /// Number of listeners registered through this subscriber
    pub fn connection_count(&self) -> usize {
        lock(&self.bindings).values().map(|binding| binding.connections.len()).sum()
    }
}

impl Drop for EventSubscriber {
    fn drop(&mut self) {
        self.remove_all_event_listeners();
    }
}
