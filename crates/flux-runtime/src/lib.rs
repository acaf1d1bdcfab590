//! Flux Runtime - configuration and logging bootstrap for flux applications.
//!
//! This crate provides the ambient pieces a host application wires up before
//! using the framework:
//!
//! - Layered configuration loading (`ConfigLoader`, `FluxConfig`)
//! - Logging initialization (`LoggingBuilder`, `init_from_config`)
//! - A top-level error type for bootstrap failures
//!
//! ```ignore
//! use flux_runtime::config::ConfigLoader;
//! use flux_runtime::logging;
//!
//! let config = ConfigLoader::new().load()?;
//! logging::init_from_config(&config.logging);
//! let timeouts = config.pager.to_timeouts();
//! ```

pub mod config;
pub mod error;
pub mod logging;

pub use config::{ConfigError, ConfigLoader, ConfigResult, FluxConfig, LoggingConfig, PagerConfig};
pub use error::{RuntimeError, RuntimeResult};
pub use logging::LoggingBuilder;

// Re-export tracing for use by host applications
pub use tracing;
pub use tracing_subscriber;
