//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables (`SPROUT_DEFAULTS__PLATFORM`, ...)
//! 3. Config file (`--config` path, or the default location if present)
//! 4. Built-in defaults (always present)

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{CliError, CliResult};

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Default values for generation runs.
    pub defaults: Defaults,
    /// Output settings.
    pub output: OutputConfig,
    /// Catalog settings.
    #[serde(default)]
    pub catalog: CatalogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Defaults {
    /// Platform assumed when a payload omits `backendPlatform` tooling-side.
    pub platform: String,
    /// Default output directory for `sprout generate`.
    pub output: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub no_color: bool,
    pub format: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Optional service-pack directory merged over the built-in catalog.
    pub pack_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            defaults: Defaults {
                platform: "node".into(),
                output: ".".into(),
            },
            output: OutputConfig {
                no_color: false,
                format: "human".into(),
            },
            catalog: CatalogConfig { pack_dir: None },
        }
    }
}

impl AppConfig {
    /// Load configuration, starting from defaults.
    ///
    /// The `config_file` parameter is the path the user passed via `--config`
    /// (or `None` to probe the default location). A missing default-location
    /// file is fine; a missing *explicit* file is an error.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let mut builder = config::Config::builder()
            .set_default("defaults.platform", "node")?
            .set_default("defaults.output", ".")?
            .set_default("output.no_color", false)?
            .set_default("output.format", "human")?;

        match config_file {
            Some(path) => {
                builder = builder.add_source(config::File::from(path.as_path()));
            }
            None => {
                builder = builder.add_source(
                    config::File::from(Self::config_path().as_path()).required(false),
                );
            }
        }

        let settings = builder
            .add_source(config::Environment::with_prefix("SPROUT").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.sprout.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("com", "sprout", "sprout")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".sprout.toml"))
    }

    /// Read a dotted configuration key.
    pub fn get(&self, key: &str) -> CliResult<String> {
        match key {
            "defaults.platform" => Ok(self.defaults.platform.clone()),
            "defaults.output" => Ok(self.defaults.output.clone()),
            "output.no_color" => Ok(self.output.no_color.to_string()),
            "output.format" => Ok(self.output.format.clone()),
            "catalog.pack_dir" => Ok(self
                .catalog
                .pack_dir
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default()),
            _ => Err(CliError::UnknownConfigKey { key: key.into() }),
        }
    }

    /// Set a dotted configuration key on this instance.
    pub fn set(&mut self, key: &str, value: &str) -> CliResult<()> {
        match key {
            "defaults.platform" => self.defaults.platform = value.into(),
            "defaults.output" => self.defaults.output = value.into(),
            "output.no_color" => {
                self.output.no_color = value.parse().map_err(|_| CliError::InvalidInput {
                    message: format!("'{value}' is not a boolean"),
                    source: None,
                })?;
            }
            "output.format" => self.output.format = value.into(),
            "catalog.pack_dir" => self.catalog.pack_dir = Some(PathBuf::from(value)),
            _ => return Err(CliError::UnknownConfigKey { key: key.into() }),
        }
        Ok(())
    }

    /// Persist this configuration as TOML at `path`.
    pub fn save(&self, path: &PathBuf) -> CliResult<()> {
        let serialized = toml::to_string_pretty(self).map_err(|e| CliError::ConfigError {
            message: "failed to serialize configuration".into(),
            source: Some(Box::new(e)),
        })?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serialized)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_platform_is_node() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.defaults.platform, "node");
    }

    #[test]
    fn default_no_color_is_false() {
        assert!(!AppConfig::default().output.no_color);
    }

    #[test]
    fn get_known_keys() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.get("defaults.platform").unwrap(), "node");
        assert_eq!(cfg.get("output.no_color").unwrap(), "false");
        assert_eq!(cfg.get("catalog.pack_dir").unwrap(), "");
    }

    #[test]
    fn get_unknown_key_is_error() {
        assert!(matches!(
            AppConfig::default().get("nope"),
            Err(CliError::UnknownConfigKey { .. })
        ));
    }

    #[test]
    fn set_round_trips_through_get() {
        let mut cfg = AppConfig::default();
        cfg.set("defaults.platform", "java").unwrap();
        assert_eq!(cfg.get("defaults.platform").unwrap(), "java");

        cfg.set("output.no_color", "true").unwrap();
        assert!(cfg.output.no_color);
    }

    #[test]
    fn set_rejects_non_boolean_no_color() {
        let mut cfg = AppConfig::default();
        assert!(cfg.set("output.no_color", "maybe").is_err());
    }

    #[test]
    fn config_path_is_non_empty() {
        assert!(!AppConfig::config_path().as_os_str().is_empty());
    }
}
