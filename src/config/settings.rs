/*
* Clone Builder Configuration
* ---------------------------
* Layered, lowest to highest priority:
*
* 1. Hardcoded defaults
* 2. <CONFIG_PATH>/default.toml, then <CONFIG_PATH>/local.toml (both optional),
*    or a single file passed with --config
* 3. Environment variables prefixed CLONE_, with `__` between sections, e.g.
*    CLONE_CUSTOMIZATION__DOMAIN_ADMIN_PASSWORD
*
* Secrets such as the domain admin password belong in the environment, not in
* the files.
*/

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize, Deserialize)]
pub struct Settings {
    pub inventory: InventorySettings,
    pub logging: LoggingSettings,
    #[serde(default)]
    pub customization: CustomizationSettings,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InventorySettings {
    pub path: PathBuf,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoggingSettings {
    pub level: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CustomizationSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain_admin_password: Option<String>,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let config_path = config_dir();

        Self::with_defaults()?
            .add_source(File::with_name(&format!("{}/default", config_path)).required(false))
            .add_source(File::with_name(&format!("{}/local", config_path)).required(false))
            .add_source(Self::environment())
            .build()?
            .try_deserialize()
    }

    pub fn new_from_file(path: &Path) -> Result<Self, ConfigError> {
        Self::with_defaults()?
            .add_source(File::from(path))
            .add_source(Self::environment())
            .build()?
            .try_deserialize()
    }

    fn with_defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            .set_default("inventory.path", "inventory.toml")?
            .set_default("logging.level", "info")
    }

    fn environment() -> Environment {
        Environment::with_prefix("CLONE")
            .prefix_separator("_")
            .separator("__")
    }
}

fn config_dir() -> String {
    std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config".to_string())
}

/// Where settings are read from. Logged by the caller once tracing is up.
pub fn config_source(explicit: Option<&Path>) -> String {
    match explicit {
        Some(path) => format!("file {}", path.display()),
        None => format!("path {}", config_dir()),
    }
}

pub fn generate_default_config() -> Settings {
    Settings {
        inventory: InventorySettings {
            path: PathBuf::from("inventory.toml"),
        },
        logging: LoggingSettings {
            level: "info".to_string(),
        },
        customization: CustomizationSettings::default(),
    }
}
