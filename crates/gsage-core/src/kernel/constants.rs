/// Application name
pub const APP_NAME: &str = "Gsage";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Name of the central engine dispatcher
pub const ENGINE_DISPATCHER: &str = "engine";

/// System id of the renderer; the UI reacts to it starting and stopping
pub const RENDER_SYSTEM: &str = "render";
