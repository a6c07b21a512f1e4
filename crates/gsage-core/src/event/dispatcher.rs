use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::event::signal::{EventConnection, EventSignal};
use crate::event::types::DispatcherEvent;
use crate::event::{Event, EventCallback, EventPriority};

/// Process-unique dispatcher identity
pub type DispatcherId = u64;

static NEXT_DISPATCHER_ID: AtomicU64 = AtomicU64::new(1);

/// All event bindings, keyed by event type content
type EventTypes = HashMap<String, Arc<EventSignal>>;

/// Event broker owned by engine objects that emit events.
///
/// The type map is guarded by a mutex that is only held for lookups and
/// insertions, never while listeners run. Listeners may therefore register,
/// disconnect and fire on the same dispatcher from inside a callback.
///
/// Dropping the dispatcher calls [`remove_all_listeners`](Self::remove_all_listeners).
pub struct EventDispatcher {
    id: DispatcherId,
    name: Option<String>,
    signals: Mutex<EventTypes>,
}

impl fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let signals = self.lock();
        f.debug_struct("EventDispatcher")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("event_types_count", &signals.len())
            .finish()
    }
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self {
            id: NEXT_DISPATCHER_ID.fetch_add(1, Ordering::Relaxed),
            name: None,
            signals: Mutex::new(HashMap::new()),
        }
    }

    /// Create a dispatcher with a name used in log output
    pub fn named(name: impl Into<String>) -> Self {
        let mut dispatcher = Self::new();
        dispatcher.name = Some(name.into());
        dispatcher
    }

    pub fn id(&self) -> DispatcherId {
        self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn label(&self) -> String {
        match &self.name {
            Some(name) => format!("{}#{}", name, self.id),
            None => format!("dispatcher#{}", self.id),
        }
    }

    fn lock(&self) -> MutexGuard<'_, EventTypes> {
        self.signals.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn signal_for(&self, event_type: &str) -> Option<Arc<EventSignal>> {
        self.lock().get(event_type).cloned()
    }

    /// Dispatch event to all subscribers of its type.
    ///
    /// Returns the count of handlers that processed it; 0 when nothing is
    /// registered for the type.
    pub fn fire_event(&self, event: &dyn Event) -> usize {
        let Some(signal) = self.signal_for(event.event_type()) else {
            return 0;
        };

        let handled = signal.invoke(self, event);
        log::trace!("[{}] '{}' handled by {} listener(s)", self.label(), event.event_type(), handled);
        handled
    }

    /// Check if a signal was ever created for the type.
    ///
    /// The signal may currently hold zero listeners.
    pub(crate) fn has_listeners_for_type(&self, event_type: &str) -> bool {
        self.lock().contains_key(event_type)
    }

    /// Adds a listener. Called by [`EventSubscriber`](crate::event::EventSubscriber).
    pub(crate) fn add_event_listener(
        &self,
        event_type: &str,
        callback: EventCallback,
        priority: EventPriority,
    ) -> EventConnection {
        let signal = {
            let mut signals = self.lock();
            Arc::clone(
                signals
                    .entry(event_type.to_string())
                    .or_insert_with(|| Arc::new(EventSignal::new())),
            )
        };

        let id = signal.connect(priority, callback);
        log::trace!("[{}] listener {}/{} connected to '{}'", self.label(), priority, id, event_type);
        EventConnection::new(signal, priority, id)
    }

    /// Number of listeners currently connected for the type
    pub fn listener_count(&self, event_type: &str) -> usize {
        self.signal_for(event_type).map_or(0, |signal| signal.listener_count())
    }

    /// Remove all listeners from this event dispatcher.
    ///
    /// Listeners of [`DispatcherEvent::FORCE_UNSUBSCRIBE`] are notified once
    /// before the type map is cleared.
    pub fn remove_all_listeners(&self) {
        if let Some(signal) = self.signal_for(DispatcherEvent::FORCE_UNSUBSCRIBE) {
            let notified = signal.invoke(self, &DispatcherEvent::new(DispatcherEvent::FORCE_UNSUBSCRIBE));
            log::debug!("[{}] force unsubscribe notified {} listener(s)", self.label(), notified);
        }

        let cleared = std::mem::take(&mut *self.lock());
        if !cleared.is_empty() {
            log::debug!("[{}] removed signals for {} event type(s)", self.label(), cleared.len());
        }
        // Signals (and the callbacks they own) are released outside the lock.
        drop(cleared);
    }
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for EventDispatcher {
    fn drop(&mut self) {
        self.remove_all_listeners();
    }
}
