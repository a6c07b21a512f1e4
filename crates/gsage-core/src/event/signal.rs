use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::event::dispatcher::EventDispatcher;
use crate::event::{Event, EventCallback, EventId, EventPriority};

/// Connection sequence number. Unique per signal, never reused.
type Sequence = u64;

type CallbacksList = BTreeMap<EventId, (Sequence, EventCallback)>;

type Connections = BTreeMap<EventPriority, CallbacksList>;

//--------------------------------------------------
// EventSignal
//--------------------------------------------------

/// Ordered listener list for exactly one event type.
///
/// Buckets are iterated by ascending priority and, inside a bucket, by
/// ascending id (which is registration order, since ids only grow while the
/// bucket is non-empty).
pub struct EventSignal {
    connections: Mutex<Connections>,
    next_sequence: AtomicU64,
}

impl fmt::Debug for EventSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let connections = self.lock();
        let buckets: Vec<(EventPriority, usize)> = connections.iter().map(|(p, l)| (*p, l.len())).collect();
        f.debug_struct("EventSignal").field("buckets", &buckets).finish()
    }
}

impl EventSignal {
    pub fn new() -> Self {
        Self { connections: Mutex::new(BTreeMap::new()), next_sequence: AtomicU64::new(0) }
    }

    // Never held while a callback runs, so poisoning can only come from a
    // panic inside this module; the map is still consistent in that case.
    fn lock(&self) -> MutexGuard<'_, Connections> {
        self.connections.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Connect a callback at `priority`. Returns the id inside that bucket.
    pub fn connect(&self, priority: EventPriority, callback: EventCallback) -> EventId {
        let mut connections = self.lock();
        let bucket = connections.entry(priority).or_default();
        let id = bucket.last_key_value().map_or(0, |(last, _)| last + 1);
        let sequence = self.next_sequence.fetch_add(1, Ordering::Relaxed);
        bucket.insert(id, (sequence, callback));
        id
    }

    /// Call every connected callback in order.
    ///
    /// Returns the number of callbacks invoked. Stops right after the first
    /// callback that returns [`EventResult::Stop`](crate::event::EventResult::Stop); that callback is counted.
    ///
    /// Iterates a snapshot taken on entry: callbacks connected during the
    /// call are not invoked, callbacks disconnected during the call are
    /// skipped and not counted.
    pub fn invoke(&self, dispatcher: &EventDispatcher, event: &dyn Event) -> usize {
        let snapshot: Vec<(EventPriority, EventId, Sequence, EventCallback)> = self
            .lock()
            .iter()
            .flat_map(|(priority, list)| {
                list.iter().map(move |(id, (sequence, cb))| (*priority, *id, *sequence, Arc::clone(cb)))
            })
            .collect();

        let mut handled = 0;
        for (priority, id, sequence, callback) in snapshot {
            if !self.is_live(priority, id, sequence) {
                continue;
            }

            handled += 1;
            if callback(dispatcher, event).is_stop() {
                log::trace!(
                    "'{}' consumed by listener {}/{} after {} handler(s)",
                    event.event_type(), priority, id, handled
                );
                return handled;
            }
        }

        handled
    }

    /// Disconnect one callback identified by priority and id.
    ///
    /// Returns false (and does nothing) if the slot does not exist.
    pub fn disconnect(&self, priority: EventPriority, id: EventId) -> bool {
        let mut connections = self.lock();
        let Some(bucket) = connections.get_mut(&priority) else {
            return false;
        };
        let removed = bucket.remove(&id).is_some();
        if bucket.is_empty() {
            connections.remove(&priority);
        }
        removed
    }

    /// Total number of connected callbacks
    pub fn listener_count(&self) -> usize {
        self.lock().values().map(|list| list.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.listener_count() == 0
    }

    // Same slot and same connection: an id freed during a fire can be handed
    // to a new connection (even of the same callback), which must wait for
    // the next fire.
    fn is_live(&self, priority: EventPriority, id: EventId, sequence: Sequence) -> bool {
        self.lock()
            .get(&priority)
            .and_then(|list| list.get(&id))
            .is_some_and(|(current, _)| *current == sequence)
    }
}

impl Default for EventSignal {
    fn default() -> Self {
        Self::new()
    }
}

//--------------------------------------------------
// EventConnection
//--------------------------------------------------

/// Identifies a single connection to an [`EventSignal`].
///
/// Holds the signal by shared ownership, so disconnecting stays valid after
/// the issuing dispatcher has been dropped. Dropping a connection does not
/// disconnect it.
pub struct EventConnection {
    signal: Arc<EventSignal>,
    priority: EventPriority,
    id: EventId,
    connected: AtomicBool,
}

impl fmt::Debug for EventConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventConnection")
            .field("priority", &self.priority)
            .field("id", &self.id)
            .field("connected", &self.is_connected())
            .finish()
    }
}

impl EventConnection {
    pub(crate) fn new(signal: Arc<EventSignal>, priority: EventPriority, id: EventId) -> Self {
        Self { signal, priority, id, connected: AtomicBool::new(true) }
    }

    pub fn priority(&self) -> EventPriority {
        self.priority
    }

    pub fn id(&self) -> EventId {
        self.id
    }

    /// False once [`disconnect`](Self::disconnect) has been called on this handle
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    pub(crate) fn is_attached_to(&self, signal: &Arc<EventSignal>) -> bool {
        Arc::ptr_eq(&self.signal, signal)
    }

    /// Disconnect the underlying callback. Only the first call has an effect.
    pub fn disconnect(&self) {
        if self.connected.swap(false, Ordering::AcqRel) {
            self.signal.disconnect(self.priority, self.id);
        }
    }
}

