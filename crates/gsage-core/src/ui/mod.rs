//! # Gsage Core UI Routing
//!
//! [`UiManager`] listens on the engine dispatcher at a negative priority so
//! UI contexts can consume mouse, keyboard and text input before game code.
//! It also tracks context lifecycle (`UIContextEvent`) and attaches or
//! detaches the renderer when the `render` system starts or stops.
pub mod context;
pub mod manager;

pub use context::{BasicUiContext, ContextState, UiContext};
pub use manager::{ContextFactory, UiManager};
