use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use crate::event::{
    Event, EventDispatcher, EventPriority, EventResult, EventSubscriber, KeyboardEvent, MouseEvent,
    SystemChangeEvent, TextInputEvent, UiContextEvent, DEFAULT_PRIORITY,
};
use crate::kernel::constants::RENDER_SYSTEM;
use crate::ui::context::{BasicUiContext, UiContext};

/// Builds the context for a `UIContextEvent::CREATE` naming an unknown context
pub type ContextFactory = Box<dyn Fn(&str) -> Box<dyn UiContext> + Send + Sync>;

struct UiState {
    contexts: BTreeMap<String, Box<dyn UiContext>>,
    factory: ContextFactory,
    renderer_active: bool,
}

impl UiState {
    fn handle_mouse(&mut self, event: &MouseEvent) -> EventResult {
        match self.contexts.get_mut(&event.dispatcher) {
            Some(context) => context.process_mouse_event(event),
            None => EventResult::Continue,
        }
    }

    fn handle_key(&mut self, event: &KeyboardEvent) -> EventResult {
        for context in self.contexts.values_mut() {
            if context.process_key_event(event).is_stop() {
                return EventResult::Stop;
            }
        }
        EventResult::Continue
    }

    fn handle_input(&mut self, event: &TextInputEvent) -> EventResult {
        for context in self.contexts.values_mut() {
            if context.process_input_event(event).is_stop() {
                return EventResult::Stop;
            }
        }
        EventResult::Continue
    }

    fn handle_context(&mut self, event: &UiContextEvent) {
        let name = event.context_name.as_str();
        match event.event_type() {
            UiContextEvent::CREATE => {
                let renderer_active = self.renderer_active;
                let factory = &self.factory;
                let context = self.contexts.entry(name.to_string()).or_insert_with(|| {
                    let mut context = factory(name);
                    context.state_mut().name = name.to_string();
                    context
                });
                context.resize(event.width, event.height);
                context.set_renderer(renderer_active);
                log::info!("[ui] Configure context {}", name);
            }
            UiContextEvent::RESIZE => {
                if let Some(context) = self.contexts.get_mut(name) {
                    context.resize(event.width, event.height);
                    log::info!("[ui] Resize context {}", name);
                }
            }
            UiContextEvent::DESTROY => {
                if self.contexts.remove(name).is_some() {
                    log::info!("[ui] Destroy context {}", name);
                }
            }
            UiContextEvent::RENDER => {
                if let Some(context) = self.contexts.get_mut(name) {
                    context.render();
                }
            }
            other => log::warn!("[ui] Unexpected context event {}", other),
        }
    }

    fn handle_system_change(&mut self, event: &SystemChangeEvent) {
        if event.system_id != RENDER_SYSTEM {
            return;
        }
        let active = match event.event_type() {
            SystemChangeEvent::SYSTEM_STARTED => true,
            SystemChangeEvent::SYSTEM_STOPPING => false,
            _ => return,
        };
        self.renderer_active = active;
        for context in self.contexts.values_mut() {
            context.set_renderer(active);
        }
        if active {
            log::info!("[ui] Render system started, attached UI renderer");
        } else {
            log::info!("[ui] Render system is stopping, detached UI renderer");
        }
    }
}

fn lock(state: &Mutex<UiState>) -> MutexGuard<'_, UiState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Routes engine input to UI contexts before game listeners see it, and
/// keeps the contexts in step with context and render-system events.
///
/// Context accessors lock the UI state; a closure passed to
/// [`with_context`](Self::with_context) must not fire input or context events
/// on the engine dispatcher.
pub struct UiManager {
    subscriber: EventSubscriber,
    state: Arc<Mutex<UiState>>,
}

impl UiManager {
    /// Manager creating [`BasicUiContext`]s
    pub fn new(engine: &EventDispatcher, input_priority: EventPriority) -> Self {
        Self::with_factory(engine, input_priority, Box::new(|name| Box::new(BasicUiContext::new(name))))
    }

    pub fn with_factory(engine: &EventDispatcher, input_priority: EventPriority, factory: ContextFactory) -> Self {
        let manager = Self {
            subscriber: EventSubscriber::new("ui"),
            state: Arc::new(Mutex::new(UiState {
                contexts: BTreeMap::new(),
                factory,
                renderer_active: false,
            })),
        };
        manager.subscribe(engine, input_priority);
        manager
    }

    fn subscribe(&self, engine: &EventDispatcher, input_priority: EventPriority) {
        for event_type in [MouseEvent::MOUSE_DOWN, MouseEvent::MOUSE_UP, MouseEvent::MOUSE_MOVE] {
            self.listen::<MouseEvent, _>(engine, event_type, input_priority, UiState::handle_mouse);
        }
        for event_type in [KeyboardEvent::KEY_DOWN, KeyboardEvent::KEY_UP] {
            self.listen::<KeyboardEvent, _>(engine, event_type, input_priority, UiState::handle_key);
        }
        self.listen::<TextInputEvent, _>(engine, TextInputEvent::INPUT, input_priority, UiState::handle_input);

        for event_type in [
            UiContextEvent::CREATE,
            UiContextEvent::RESIZE,
            UiContextEvent::DESTROY,
            UiContextEvent::RENDER,
        ] {
            self.listen(engine, event_type, DEFAULT_PRIORITY, |state, event: &UiContextEvent| {
                state.handle_context(event);
                EventResult::Continue
            });
        }
        for event_type in [SystemChangeEvent::SYSTEM_STARTED, SystemChangeEvent::SYSTEM_STOPPING] {
            self.listen(engine, event_type, DEFAULT_PRIORITY, |state, event: &SystemChangeEvent| {
                state.handle_system_change(event);
                EventResult::Continue
            });
        }
    }

    fn listen<E, H>(&self, engine: &EventDispatcher, event_type: &str, priority: EventPriority, handler: H)
    where
        E: Event,
        H: Fn(&mut UiState, &E) -> EventResult + Send + Sync + 'static,
    {
        let state: Weak<Mutex<UiState>> = Arc::downgrade(&self.state);
        self.subscriber.add_typed_listener::<E, _>(engine, event_type, priority, move |_, event| {
            match state.upgrade() {
                Some(state) => handler(&mut *lock(&state), event),
                None => EventResult::Continue,
            }
        });
    }

    /// Names of the live contexts, sorted
    pub fn context_names(&self) -> Vec<String> {
        lock(&self.state).contexts.keys().cloned().collect()
    }

    /// Run `f` against the named context
    pub fn with_context<R>(&self, name: &str, f: impl FnOnce(&mut dyn UiContext) -> R) -> Option<R> {
        let mut state = lock(&self.state);
        state.contexts.get_mut(name).map(|context| f(context.as_mut()))
    }

    pub fn is_renderer_active(&self) -> bool {
        lock(&self.state).renderer_active
    }

    /// Advance every context by `delta` seconds
    pub fn new_frame(&self, delta: f32) {
        for context in lock(&self.state).contexts.values_mut() {
            context.new_frame(delta);
        }
    }

    pub fn subscriber(&self) -> &EventSubscriber {
        &self.subscriber
    }
}

impl fmt::Debug for UiManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (contexts, renderer_active) = {
            let state = lock(&self.state);
            (state.contexts.keys().cloned().collect::<Vec<_>>(), state.renderer_active)
        };
        f.debug_struct("UiManager")
            .field("contexts", &contexts)
            .field("renderer_active", &renderer_active)
            .field("connections", &self.subscriber.connection_count())
            .finish()
    }
}
