pub mod config;
pub mod event;
pub mod kernel;
pub mod ui;

// Re-export key public types for the binary and embedders
pub use config::{ConfigData, EngineSettings};
pub use event::{Event, EventDispatcher, EventResult, EventSubscriber};
pub use kernel::Application;
pub use kernel::error::Error as KernelError;
pub use ui::UiManager;
