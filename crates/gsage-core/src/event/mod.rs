//! # Gsage Core Event System
//!
//! Synchronous publish/subscribe broker shared by every engine subsystem
//! (input routing, window lifecycle, UI context lifecycle, system hot swap).
//!
//! - [`EventDispatcher`](dispatcher::EventDispatcher) maps an event type to
//!   an [`EventSignal`](signal::EventSignal) and fires events through it.
//! - [`EventSignal`](signal::EventSignal) keeps callbacks in priority buckets
//!   (lower value fires first) and short-circuits when a callback returns
//!   [`EventResult::Stop`].
//! - [`EventConnection`](signal::EventConnection) is the token used to remove
//!   one registration later, even after the dispatcher is gone.
//! - [`EventSubscriber`](subscriber::EventSubscriber) is the public way to
//!   register listeners; it tracks its connections and releases them when
//!   either side goes away.
//!
//! Event types are plain strings compared by content, so two subsystems using
//! the same literal share one signal.
pub mod dispatcher;
pub mod error;
pub mod signal;
pub mod subscriber;
pub mod types;

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::event::error::EventSystemError;

/// Type for listener identifiers (unique within one priority bucket of one signal)
pub type EventId = u64;

/// Listener priority. Lower values fire first, `0` is the default.
pub type EventPriority = i32;

/// Priority used when none is given
pub const DEFAULT_PRIORITY: EventPriority = 0;

/// Static event type token, e.g. `"KeyboardEvent::KEY_DOWN"`
pub type EventType = &'static str;

/// Result of event processing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    /// Event was processed and propagation should continue
    Continue,
    /// Event was consumed and propagation should stop
    Stop,
}

impl EventResult {
    pub fn is_stop(self) -> bool {
        self == EventResult::Stop
    }
}

impl From<bool> for EventResult {
    fn from(proceed: bool) -> Self {
        if proceed { EventResult::Continue } else { EventResult::Stop }
    }
}

/// Core event trait
pub trait Event: Any + fmt::Debug + Send + Sync {
    /// Get the type token of this event
    fn event_type(&self) -> &str;

    /// Cast to Any for downcasting
    fn as_any(&self) -> &dyn Any;
}

impl<'a> dyn Event + 'a {
    /// Check event type by content
    pub fn is(&self, event_type: &str) -> bool {
        self.event_type() == event_type
    }

    /// Downcast to a concrete event struct
    pub fn downcast_ref<E: Event>(&self) -> Option<&E> {
        self.as_any().downcast_ref::<E>()
    }

    /// Downcast to a concrete event struct, reporting a mismatch as an error
    pub fn payload<E: Event>(&self) -> Result<&E, EventSystemError> {
        self.downcast_ref::<E>().ok_or_else(|| EventSystemError::UnexpectedPayload {
            event_type: self.event_type().to_string(),
            expected: std::any::type_name::<E>(),
        })
    }
}

/// Listener callback. Receives the firing dispatcher and the event.
pub type EventCallback = Arc<dyn Fn(&dispatcher::EventDispatcher, &dyn Event) -> EventResult + Send + Sync>;

/// Wrap a closure into an [`EventCallback`]
pub fn callback<F>(f: F) -> EventCallback
where
    F: Fn(&dispatcher::EventDispatcher, &dyn Event) -> EventResult + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Re-export important types
pub use dispatcher::{DispatcherId, EventDispatcher};
pub use signal::{EventConnection, EventSignal};
pub use subscriber::EventSubscriber;
pub use types::{
    DispatcherEvent, KeyboardEvent, Modifier, MouseButton, MouseEvent, SystemChangeEvent,
    TextInputEvent, TextureEvent, UiContextEvent, WindowEvent,
};

// Test module declaration
#[cfg(test)]
mod tests;
