//! # Gsage Core Kernel Errors
//!
//! [`Error`] aggregates the subsystem errors (event, config) together with
//! failures of the component lifecycle and the dependency registry.
use std::result::Result as StdResult;

use thiserror::Error as ThisError;

use crate::config::error::ConfigError;
use crate::event::error::EventSystemError;

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("Event system error: {0}")]
    EventSystem(#[from] EventSystemError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Error occurring during a specific kernel lifecycle phase.
    #[error("Kernel lifecycle error during {phase:?}: {message}")]
    KernelLifecycleError {
        phase: KernelLifecyclePhase,
        component_name: Option<String>,
        message: String,
        #[source]
        source: Option<Box<Error>>,
    },

    /// Registry operations or component lookup failures.
    #[error("Component registry error during operation '{operation}': {message}")]
    ComponentRegistryError {
        operation: String,
        component_name: Option<String>,
        message: String,
    },

    /// Generic error with message
    #[error("Error: {0}")]
    Other(String),
}

/// Represents a specific phase in the kernel's lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum KernelLifecyclePhase {
    #[error("Initialize")]
    Initialize,
    #[error("Start")]
    Start,
    #[error("RunPreCheck")]
    RunPreCheck,
    #[error("Shutdown")]
    Shutdown,
}

/// Shorthand for Result with our Error type
pub type Result<T> = StdResult<T, Error>;

impl From<&str> for Error {
    fn from(msg: &str) -> Self {
        Error::Other(msg.to_string())
    }
}

impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::Other(msg)
    }
}

impl Error {
    /// Wrap a component failure with the phase it happened in.
    pub fn lifecycle(phase: KernelLifecyclePhase, component_name: &str, source: Error) -> Self {
        Error::KernelLifecycleError {
            message: format!("Component '{}' failed: {}", component_name, source),
            phase,
            component_name: Some(component_name.to_string()),
            source: Some(Box::new(source)),
        }
    }
}
