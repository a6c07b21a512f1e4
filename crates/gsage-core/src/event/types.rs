use std::any::Any;

use crate::event::{Event, EventType};

/// Dispatcher-level events. Also used for script-defined event types that
/// carry no payload.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatcherEvent {
    event_type: String,
}

impl DispatcherEvent {
    /// Fired to its own listeners only, when a dispatcher tears down
    pub const FORCE_UNSUBSCRIBE: EventType = "forceUnsubscribe";

    pub fn new(event_type: impl Into<String>) -> Self {
        Self { event_type: event_type.into() }
    }
}

impl Event for DispatcherEvent {
    fn event_type(&self) -> &str {
        &self.event_type
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Keyboard modifier bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum Modifier {
    Shift = 0x1,
    Ctrl = 0x2,
    Alt = 0x4,
    Win = 0x8,
}

/// Key press/release
#[derive(Debug, Clone, PartialEq)]
pub struct KeyboardEvent {
    event_type: EventType,
    /// Platform-independent key code
    pub key: u32,
    /// Unicode code point produced by the key, 0 when none
    pub text: u32,
    modifier_state: u32,
}

impl KeyboardEvent {
    pub const KEY_DOWN: EventType = "KeyboardEvent::KEY_DOWN";
    pub const KEY_UP: EventType = "KeyboardEvent::KEY_UP";

    pub fn new(event_type: EventType, key: u32, text: u32, modifier_state: u32) -> Self {
        Self { event_type, key, text, modifier_state }
    }

    pub fn is_modifier_down(&self, modifier: Modifier) -> bool {
        (self.modifier_state & modifier as u32) != 0
    }

    pub fn modifiers_state(&self) -> u32 {
        self.modifier_state
    }
}

impl Event for KeyboardEvent {
    fn event_type(&self) -> &str {
        self.event_type
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// UTF-8 text entered by the user
#[derive(Debug, Clone, PartialEq)]
pub struct TextInputEvent {
    event_type: EventType,
    text: String,
}

impl TextInputEvent {
    pub const INPUT: EventType = "TextInputEvent::INPUT";

    pub fn new(event_type: EventType, text: impl Into<String>) -> Self {
        Self { event_type, text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl Event for TextInputEvent {
    fn event_type(&self) -> &str {
        self.event_type
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MouseButton {
    #[default]
    None,
    Left,
    Right,
    Middle,
}

/// Mouse button and motion events
#[derive(Debug, Clone, PartialEq)]
pub struct MouseEvent {
    event_type: EventType,
    /// Name of the UI context (render target) the event belongs to
    pub dispatcher: String,
    pub x: f32,
    pub y: f32,
    /// Wheel
    pub z: f32,
    pub button: MouseButton,
}

impl MouseEvent {
    pub const MOUSE_DOWN: EventType = "MouseEvent::MOUSE_DOWN";
    pub const MOUSE_UP: EventType = "MouseEvent::MOUSE_UP";
    pub const MOUSE_MOVE: EventType = "MouseEvent::MOUSE_MOVE";

    pub fn new(event_type: EventType, dispatcher: impl Into<String>, x: f32, y: f32, button: MouseButton) -> Self {
        Self { event_type, dispatcher: dispatcher.into(), x, y, z: 0.0, button }
    }

    pub fn with_wheel(mut self, z: f32) -> Self {
        self.z = z;
        self
    }
}

impl Event for MouseEvent {
    fn event_type(&self) -> &str {
        self.event_type
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Window lifecycle events produced by the window manager
#[derive(Debug, Clone, PartialEq)]
pub struct WindowEvent {
    event_type: EventType,
    pub handle: u64,
    pub window_name: String,
    pub width: u32,
    pub height: u32,
    pub x: i32,
    pub y: i32,
}

impl WindowEvent {
    pub const CREATE: EventType = "WindowEvent::CREATE";
    pub const CLOSE: EventType = "WindowEvent::CLOSE";
    pub const RESIZE: EventType = "WindowEvent::RESIZE";
    pub const MOVE: EventType = "WindowEvent::MOVE";

    pub fn new(event_type: EventType, handle: u64, window_name: impl Into<String>, width: u32, height: u32) -> Self {
        Self { event_type, handle, window_name: window_name.into(), width, height, x: 0, y: 0 }
    }

    pub fn moved(handle: u64, window_name: impl Into<String>, x: i32, y: i32) -> Self {
        Self { x, y, ..Self::new(Self::MOVE, handle, window_name, 0, 0) }
    }
}

impl Event for WindowEvent {
    fn event_type(&self) -> &str {
        self.event_type
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// UI context lifecycle events. One context maps to one render target.
#[derive(Debug, Clone, PartialEq)]
pub struct UiContextEvent {
    event_type: EventType,
    pub context_name: String,
    pub width: f32,
    pub height: f32,
}

impl UiContextEvent {
    pub const CREATE: EventType = "UIContextEvent::CREATE";
    pub const RESIZE: EventType = "UIContextEvent::RESIZE";
    pub const DESTROY: EventType = "UIContextEvent::DESTROY";
    pub const RENDER: EventType = "UIContextEvent::RENDER";

    pub fn new(event_type: EventType, context_name: impl Into<String>, width: f32, height: f32) -> Self {
        Self { event_type, context_name: context_name.into(), width, height }
    }

    /// Event without dimensions (destroy, render)
    pub fn named(event_type: EventType, context_name: impl Into<String>) -> Self {
        Self::new(event_type, context_name, 0.0, 0.0)
    }
}

impl Event for UiContextEvent {
    fn event_type(&self) -> &str {
        self.event_type
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Engine system added/removed/started/stopping
#[derive(Debug, Clone, PartialEq)]
pub struct SystemChangeEvent {
    event_type: EventType,
    pub system_id: String,
}

impl SystemChangeEvent {
    pub const SYSTEM_ADDED: EventType = "SystemChangeEvent::SYSTEM_ADDED";
    pub const SYSTEM_REMOVED: EventType = "SystemChangeEvent::SYSTEM_REMOVED";
    pub const SYSTEM_STARTED: EventType = "SystemChangeEvent::SYSTEM_STARTED";
    pub const SYSTEM_STOPPING: EventType = "SystemChangeEvent::SYSTEM_STOPPING";

    pub fn new(event_type: EventType, system_id: impl Into<String>) -> Self {
        Self { event_type, system_id: system_id.into() }
    }
}

impl Event for SystemChangeEvent {
    fn event_type(&self) -> &str {
        self.event_type
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Events fired by a texture's own dispatcher
#[derive(Debug, Clone, PartialEq)]
pub struct TextureEvent {
    event_type: EventType,
    pub texture: String,
    pub width: u32,
    pub height: u32,
}

impl TextureEvent {
    pub const RESIZE: EventType = "Texture::RESIZE";
    pub const RECREATE: EventType = "Texture::RECREATE";
    pub const UV_UPDATE: EventType = "Texture::UV_UPDATE";
    pub const DESTROY: EventType = "Texture::DESTROY";

    pub fn new(event_type: EventType, texture: impl Into<String>, width: u32, height: u32) -> Self {
        Self { event_type, texture: texture.into(), width, height }
    }
}

impl Event for TextureEvent {
    fn event_type(&self) -> &str {
        self.event_type
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Every built-in event type, grouped by producer
pub fn known_event_types() -> Vec<EventType> {
    vec![
        DispatcherEvent::FORCE_UNSUBSCRIBE,
        KeyboardEvent::KEY_DOWN,
        KeyboardEvent::KEY_UP,
        TextInputEvent::INPUT,
        MouseEvent::MOUSE_DOWN,
        MouseEvent::MOUSE_UP,
        MouseEvent::MOUSE_MOVE,
        WindowEvent::CREATE,
        WindowEvent::CLOSE,
        WindowEvent::RESIZE,
        WindowEvent::MOVE,
        UiContextEvent::CREATE,
        UiContextEvent::RESIZE,
        UiContextEvent::DESTROY,
        UiContextEvent::RENDER,
        SystemChangeEvent::SYSTEM_ADDED,
        SystemChangeEvent::SYSTEM_REMOVED,
        SystemChangeEvent::SYSTEM_STARTED,
        SystemChangeEvent::SYSTEM_STOPPING,
        TextureEvent::RESIZE,
        TextureEvent::RECREATE,
        TextureEvent::UV_UPDATE,
        TextureEvent::DESTROY,
    ]
}
