use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use grocery_shopping::UnitSystem;
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub list: ListConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// JSON file holding the persisted list
    #[serde(default = "default_storage_path")]
    pub path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
        }
    }
}

fn default_storage_path() -> String {
    "grocery-list.json".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct ListConfig {
    /// Store added items verbatim instead of canonical names
    #[serde(default)]
    pub preserve_quantities: bool,
    #[serde(default = "default_unit_system")]
    pub unit_system: String,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            preserve_quantities: false,
            unit_system: default_unit_system(),
        }
    }
}

impl ListConfig {
    pub fn unit_system(&self) -> Result<UnitSystem, String> {
        self.unit_system
            .parse()
            .map_err(|_| format!("Unknown unit system: {}", self.unit_system))
    }
}

fn default_unit_system() -> String {
    "metric".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Config {
    /// Load configuration from file and environment variables
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (GROCERY__STORAGE__PATH, etc.)
    /// 2. Config file specified by path
    /// 3. Hardcoded defaults
    pub fn load(config_path: Option<String>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        builder = builder
            .set_default("storage.path", default_storage_path())?
            .set_default("list.preserve_quantities", false)?
            .set_default("list.unit_system", default_unit_system())?
            .set_default("observability.log_level", default_log_level())?;

        let config_file_path = config_path
            .or_else(|| env::var("CONFIG_PATH").ok())
            .unwrap_or_else(|| "config/default.toml".to_string());

        // Config file is optional
        if std::path::Path::new(&config_file_path).exists() {
            builder = builder.add_source(File::with_name(&config_file_path));
        }

        builder = builder.add_source(
            Environment::with_prefix("GROCERY")
                .separator("__")
                .try_parsing(true),
        );

        // Shorthand without prefix
        if let Ok(list_path) = env::var("GROCERY_LIST_PATH") {
            builder = builder.set_override("storage.path", list_path)?;
        }

        builder.build()?.try_deserialize()
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.storage.path.trim().is_empty() {
            return Err("Storage path must not be empty".to_string());
        }
        self.list.unit_system()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.list.unit_system().unwrap(), UnitSystem::Metric);
    }

    #[test]
    fn test_validation_empty_path() {
        let config = Config {
            storage: StorageConfig {
                path: "  ".to_string(),
            },
            ..Config::default()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_unknown_unit_system() {
        let config = Config {
            list: ListConfig {
                preserve_quantities: false,
                unit_system: "imperial".to_string(),
            },
            ..Config::default()
        };

        assert_eq!(
            config.validate(),
            Err("Unknown unit system: imperial".to_string())
        );
    }

    #[test]
    fn test_unit_system_is_case_insensitive() {
        let list = ListConfig {
            preserve_quantities: true,
            unit_system: "UK".to_string(),
        };
        assert_eq!(list.unit_system().unwrap(), UnitSystem::Uk);
    }
}
