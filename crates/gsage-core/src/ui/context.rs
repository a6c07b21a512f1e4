use std::any::Any;

use crate::event::{Event, EventResult, KeyboardEvent, MouseEvent, TextInputEvent};

/// Bookkeeping shared by every UI context implementation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ContextState {
    pub name: String,
    pub mouse_position: (f32, f32),
    pub display_size: (f32, f32),
    pub renderer_attached: bool,
    pub frames_rendered: u64,
    pub elapsed: f32,
}

impl ContextState {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }
}

/// A UI render target that can consume input ahead of the game.
///
/// The `process_*` defaults let input through unless the matching
/// `capture_*` flag is set. Releases (`MOUSE_UP`, `KEY_UP`) always pass so
/// game code never sees a press without its release.
pub trait UiContext: Any + Send {
    fn state(&self) -> &ContextState;
    fn state_mut(&mut self) -> &mut ContextState;
    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn capture_mouse(&self) -> bool {
        false
    }

    fn capture_key(&self) -> bool {
        false
    }

    fn capture_input(&self) -> bool {
        false
    }

    fn process_mouse_event(&mut self, event: &MouseEvent) -> EventResult {
        self.state_mut().mouse_position = (event.x, event.y);
        EventResult::from(!self.capture_mouse() || event.event_type() == MouseEvent::MOUSE_UP)
    }

    fn process_key_event(&mut self, event: &KeyboardEvent) -> EventResult {
        EventResult::from(!self.capture_key() || event.event_type() == KeyboardEvent::KEY_UP)
    }

    fn process_input_event(&mut self, _event: &TextInputEvent) -> EventResult {
        EventResult::from(!self.capture_input())
    }

    fn resize(&mut self, width: f32, height: f32) {
        self.state_mut().display_size = (width, height);
    }

    fn set_renderer(&mut self, attached: bool) {
        self.state_mut().renderer_attached = attached;
    }

    /// Draw one frame. Without a renderer there is nothing to draw into.
    fn render(&mut self) {
        let state = self.state_mut();
        if state.renderer_attached {
            state.frames_rendered += 1;
        }
    }

    fn new_frame(&mut self, delta: f32) {
        self.state_mut().elapsed += delta;
    }
}

/// Context with externally toggled capture flags
#[derive(Debug, Clone, Default)]
pub struct BasicUiContext {
    state: ContextState,
    pub mouse_captured: bool,
    pub key_captured: bool,
    pub input_captured: bool,
}

impl BasicUiContext {
    pub fn new(name: impl Into<String>) -> Self {
        Self { state: ContextState::new(name), ..Self::default() }
    }
}

impl UiContext for BasicUiContext {
    fn state(&self) -> &ContextState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ContextState {
        &mut self.state
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn capture_mouse(&self) -> bool {
        self.mouse_captured
    }

    fn capture_key(&self) -> bool {
        self.key_captured
    }

    fn capture_input(&self) -> bool {
        self.input_captured
    }
}
