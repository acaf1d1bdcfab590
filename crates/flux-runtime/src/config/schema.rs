//! Configuration schema definitions.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use flux_framework::PagerTimeouts;

use super::error::{ConfigError, ConfigResult};

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FluxConfig {
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Pagination session timers.
    #[serde(default)]
    pub pager: PagerConfig,

    /// Extension module names to load at startup, in order.
    #[serde(default)]
    pub extensions: Vec<String>,
}

impl FluxConfig {
    /// Validates the loaded configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        self.pager.validate()?;
        for name in &self.extensions {
            if name.trim().is_empty() {
                return Err(ConfigError::validation("extension name must not be empty"));
            }
        }
        Ok(())
    }
}

// =============================================================================
// Logging
// =============================================================================

/// Log verbosity level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Returns the level name as a lowercase string.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    /// Converts to a `tracing` level.
    pub fn to_tracing_level(self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Single-line compact output.
    #[default]
    Compact,
    /// Standard multi-field output.
    Full,
    /// Multi-line human-readable output.
    Pretty,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LoggingConfig {
    /// Base log level.
    #[serde(default)]
    pub level: LogLevel,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,

    /// Per-module level overrides, e.g. `flux_framework = "debug"`.
    #[serde(default)]
    pub filters: HashMap<String, LogLevel>,
}

// =============================================================================
// Pager
// =============================================================================

/// Pagination session timers, in seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagerConfig {
    /// Session ends after this long without a navigation event.
    #[serde(default = "default_idle_timeout_secs")]
    pub idle_timeout_secs: u64,

    /// How long the jump prompt waits for a numeric reply.
    #[serde(default = "default_prompt_timeout_secs")]
    pub prompt_timeout_secs: u64,

    /// How long the help screen stays up before reverting.
    #[serde(default = "default_help_revert_secs")]
    pub help_revert_secs: u64,
}

impl Default for PagerConfig {
    fn default() -> Self {
        Self {
            idle_timeout_secs: default_idle_timeout_secs(),
            prompt_timeout_secs: default_prompt_timeout_secs(),
            help_revert_secs: default_help_revert_secs(),
        }
    }
}

impl PagerConfig {
    /// Converts to the framework's session timers.
    pub fn to_timeouts(&self) -> PagerTimeouts {
        PagerTimeouts {
            idle: Duration::from_secs(self.idle_timeout_secs),
            prompt: Duration::from_secs(self.prompt_timeout_secs),
            help_revert: Duration::from_secs(self.help_revert_secs),
        }
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.idle_timeout_secs == 0 || self.prompt_timeout_secs == 0 {
            return Err(ConfigError::validation(
                "pager timeouts must be positive seconds",
            ));
        }
        Ok(())
    }
}

fn default_idle_timeout_secs() -> u64 {
    120
}

fn default_prompt_timeout_secs() -> u64 {
    30
}

fn default_help_revert_secs() -> u64 {
    60
}

// =============================================================================
// Tests
// =============================================================================
