//! # Gsage Core Kernel
//!
//! Replaces process-wide singletons with explicit ownership: an
//! [`Application`](bootstrap::Application) owns the engine dispatcher, the
//! registered [`KernelComponent`](component::KernelComponent)s and the UI
//! manager, and drives their lifecycle.
//!
//! - `bootstrap`: the `Application` and its start/shutdown sequencing.
//! - `component`: the async component trait and the [`DependencyRegistry`](component::DependencyRegistry).
//! - `constants`: names shared across the engine.
//! - `error`: the crate-wide [`Error`](error::Error) and `Result` alias.
pub mod bootstrap;
pub mod component;
pub mod constants;
pub mod error;

pub use bootstrap::Application;
pub use component::{DependencyRegistry, KernelComponent};
pub use error::{Error, KernelLifecyclePhase, Result};
