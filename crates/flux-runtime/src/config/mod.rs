//! Configuration module for the flux runtime.
//!
//! Layered TOML + environment configuration with a serde schema covering
//! logging, pager timers, and startup extensions.

pub mod error;
pub mod loader;
pub mod schema;

pub use error::{ConfigError, ConfigResult};
pub use loader::ConfigLoader;
pub use schema::{FluxConfig, LogFormat, LogLevel, LoggingConfig, PagerConfig};
