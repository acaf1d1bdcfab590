//! Configuration loader using figment.
//!
//! Sources are layered, later ones overriding earlier ones:
//!
//! 1. Built-in defaults
//! 2. Programmatic overrides via [`ConfigLoader::merge`]
//! 3. `flux.toml` in the current directory (or a specific file via
//!    [`ConfigLoader::file`])
//! 4. Environment variables with the `FLUX_` prefix and `__` as the
//!    nesting separator, e.g. `FLUX_LOGGING__LEVEL=debug` →
//!    `logging.level = "debug"`
//!
//! # Example
//!
//! ```rust,ignore
//! use flux_runtime::config::ConfigLoader;
//!
//! let config = ConfigLoader::new().load()?;
//! let config = ConfigLoader::new().file("./config/flux.toml").load()?;
//! ```

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use tracing::{debug, info, trace};

use super::error::{ConfigError, ConfigResult};
use super::schema::FluxConfig;

/// Default config file name searched in the current directory.
const CONFIG_FILE: &str = "flux.toml";

/// Layered configuration loader.
pub struct ConfigLoader {
    /// User-provided overrides, merged above defaults.
    figment: Figment,
    /// Whether to load `FLUX_*` environment variables.
    load_env: bool,
    /// Specific config file to load (overrides the default search).
    config_file: Option<PathBuf>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Creates a new configuration loader with defaults.
    pub fn new() -> Self {
        Self {
            figment: Figment::new(),
            load_env: true,
            config_file: None,
        }
    }

    /// Sets a specific configuration file to load.
    ///
    /// The file must exist; a missing explicit file is an error, unlike the
    /// default search which silently falls back to defaults.
    pub fn file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Disables loading environment variables.
    pub fn without_env(mut self) -> Self {
        self.load_env = false;
        self
    }

    /// Merges additional configuration programmatically.
    pub fn merge(mut self, config: FluxConfig) -> Self {
        self.figment = self.figment.merge(Serialized::defaults(config));
        self
    }

    /// Loads, validates, and returns the configuration.
    pub fn load(self) -> ConfigResult<FluxConfig> {
        let figment = self.build_figment()?;

        let config: FluxConfig = figment
            .extract()
            .map_err(|e| ConfigError::ParseError(format!("Failed to extract configuration: {e}")))?;
        config.validate()?;

        debug!(
            logging_level = %config.logging.level,
            extensions = config.extensions.len(),
            "Configuration loaded successfully"
        );

        Ok(config)
    }

    /// Builds the figment instance with all sources.
    fn build_figment(mut self) -> ConfigResult<Figment> {
        let mut figment = Figment::from(Serialized::defaults(FluxConfig::default()));

        let user_figment = std::mem::take(&mut self.figment);
        figment = figment.merge(user_figment);

        if let Some(path) = self.config_file {
            if !path.exists() {
                return Err(ConfigError::FileNotFound(path));
            }
            info!(path = %path.display(), "Loading configuration file");
            figment = figment.merge(Toml::file(path));
        } else {
            let default_path = Path::new(CONFIG_FILE);
            if default_path.exists() {
                info!(path = %default_path.display(), "Loading configuration file");
                figment = figment.merge(Toml::file(default_path));
            }
        }

        if self.load_env {
            trace!("Loading environment variables with FLUX_ prefix");
            figment = figment.merge(
                Env::prefixed("FLUX_")
                    .split("__")
                    .map(|key| key.as_str().replace("__", ".").into()),
            );
        }

        Ok(figment)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_loads() {
        let config = ConfigLoader::new().without_env().load().unwrap();

        assert_eq!(config.logging.level.as_str(), "info");
        assert_eq!(config.pager.idle_timeout_secs, 120);
        assert!(config.extensions.is_empty());
    }

    #[test]
    fn env_variables_override_defaults() {
        // SAFETY: This test is single-threaded and we clean up immediately after
        unsafe {
            std::env::set_var("FLUX_PAGER__IDLE_TIMEOUT_SECS", "15");
        }
        let config = ConfigLoader::new().load().unwrap();
        unsafe {
            std::env::remove_var("FLUX_PAGER__IDLE_TIMEOUT_SECS");
        }

        assert_eq!(config.pager.idle_timeout_secs, 15);
    }

    #[test]
    fn programmatic_merge_overrides_defaults() {
        let config = ConfigLoader::new()
            .without_env()
            .merge(FluxConfig {
                extensions: vec!["bot.exts.admin".to_string()],
                ..Default::default()
            })
            .load()
            .unwrap();

        assert_eq!(config.extensions, vec!["bot.exts.admin".to_string()]);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let result = ConfigLoader::new()
            .without_env()
            .file("/nonexistent/flux.toml")
            .load();
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }
}
