//! Runtime error types.

use thiserror::Error;

use flux_core::ExtensionError;

use crate::config::ConfigError;

/// Errors that can occur while bootstrapping or running a host application.
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Configuration loading or validation failed.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A startup extension failed to load.
    #[error("Extension error: {0}")]
    Extension(#[from] ExtensionError),
}

/// Result type for runtime operations.
pub type RuntimeResult<T> = Result<T, RuntimeError>;
