use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use clap::{Parser, Subcommand};
use gsage_core::event::types::known_event_types;
use gsage_core::event::{MouseButton, MouseEvent, UiContextEvent};
use gsage_core::kernel::constants::RENDER_SYSTEM;
use gsage_core::kernel::error::Result;
use gsage_core::kernel::KernelComponent;
use gsage_core::ui::BasicUiContext;
use gsage_core::{Application, EventResult, EventSubscriber};

/// Gsage: event broker and UI input routing for the Gsage engine
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Print "pong" and exit
    #[arg(long)]
    pub ping: bool,

    /// Engine settings file (.json, .yaml, .toml)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override a setting, e.g. --set ui_input_priority=-50
    #[arg(long = "set", value_name = "KEY=VALUE")]
    pub overrides: Vec<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List every built-in event type
    EventTypes,
    /// Route a few mouse events through a UI context with and without capture
    Demo,
}

/// Render system stand-in without a window or GPU
#[derive(Debug, Default)]
pub struct HeadlessRenderSystem {
    running: AtomicBool,
}

#[async_trait]
impl KernelComponent for HeadlessRenderSystem {
    fn name(&self) -> &'static str {
        RENDER_SYSTEM
    }

    async fn initialize(&self) -> Result<()> {
        log::debug!("Headless renderer initialized");
        Ok(())
    }

    async fn start(&self) -> Result<()> {
        self.running.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn stop(&self) -> Result<()> {
        self.running.store(false, Ordering::SeqCst);
        Ok(())
    }
}

pub fn print_event_types() {
    for event_type in known_event_types() {
        println!("{}", event_type);
    }
}

/// Fire the same click twice, once with the UI letting it through and once
/// with the UI capturing the mouse, and report how many listeners ran.
pub async fn run_demo(app: &mut Application) -> Result<()> {
    // Subscribe the UI before the renderer comes up so it sees SYSTEM_STARTED
    app.ui_manager();
    app.register_component(Arc::new(HeadlessRenderSystem::default())).await?;
    let ui = app.ui_manager();
    let engine = app.engine();

    engine.fire_event(&UiContextEvent::new(UiContextEvent::CREATE, "main", 1280.0, 720.0));
    println!("UI contexts: {}", ui.context_names().join(", "));
    println!("UI renderer active: {}", ui.is_renderer_active());

    let game = EventSubscriber::new("game");
    game.add_event_listener(engine, MouseEvent::MOUSE_DOWN, |_, _| {
        println!("  game saw the click");
        EventResult::Continue
    });

    let click = MouseEvent::new(MouseEvent::MOUSE_DOWN, "main", 640.0, 360.0, MouseButton::Left);
    println!("Click without capture handled by {} listener(s)", engine.fire_event(&click));

    ui.with_context("main", |context| {
        if let Some(basic) = context.as_any_mut().downcast_mut::<BasicUiContext>() {
            basic.mouse_captured = true;
        }
    });
    println!("Click with capture handled by {} listener(s)", engine.fire_event(&click));

    engine.fire_event(&UiContextEvent::named(UiContextEvent::RENDER, "main"));
    let frames = ui.with_context("main", |context| context.state().frames_rendered).unwrap_or(0);
    println!("Frames rendered: {}", frames);
    Ok(())
}
