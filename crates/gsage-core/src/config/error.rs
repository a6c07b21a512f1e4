//! # Gsage Core Configuration Errors
//!
//! Errors raised while reading, parsing or overriding engine configuration.
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error reading config '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unknown or unsupported config format for path: {path}")]
    UnsupportedFormat { path: PathBuf },

    #[error("Failed to serialize config to {format}: {message}")]
    Serialization { format: String, message: String },

    #[error("Failed to deserialize config from {format}: {message}")]
    Deserialization { format: String, message: String },

    #[error("Invalid config override '{0}', expected key=value")]
    InvalidOverride(String),
}
