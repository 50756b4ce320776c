//! Configuration file loading

use super::schema::ConfigSchema;
use crate::error::{Error, Result};
use std::path::Path;

/// Configuration wrapper
#[derive(Debug, Clone)]
pub struct Config {
    pub schema: ConfigSchema,
    pub path: Option<String>,
}

impl Config {
    /// Load configuration from a file path or use defaults
    pub fn load(path: Option<&str>) -> Result<Self> {
        let config_path = path.map(String::from).or_else(find_config_file);

        let schema = if let Some(ref p) = config_path {
            load_config_file(p)?
        } else {
            ConfigSchema::default()
        };

        validate(&schema)?;

        Ok(Self {
            schema,
            path: config_path,
        })
    }

    /// Defaults only, no file
    pub fn defaults() -> Self {
        Self {
            schema: ConfigSchema::default(),
            path: None,
        }
    }
}

/// Find configuration file in standard locations
fn find_config_file() -> Option<String> {
    let candidates = [
        ".foodshare-buildconf.toml",
        "foodshare-buildconf.toml",
        ".config/foodshare-buildconf.toml",
    ];

    for candidate in candidates {
        if Path::new(candidate).exists() {
            return Some(candidate.to_string());
        }
    }

    None
}

/// Load and parse a TOML configuration file
fn load_config_file(path: &str) -> Result<ConfigSchema> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::config(format!("Failed to read config file {}: {}", path, e)))?;

    toml::from_str(&content)
        .map_err(|e| Error::config(format!("Failed to parse config file {}: {}", path, e)))
}

fn validate(schema: &ConfigSchema) -> Result<()> {
    if schema.project.build_dir.trim().is_empty() {
        return Err(Error::new(
            crate::error::ErrorCode::ConfigValidationError,
            "project.build_dir must not be empty",
        ));
    }

    if schema.credentials.key.trim().is_empty() {
        return Err(Error::new(
            crate::error::ErrorCode::ConfigValidationError,
            "credentials.key must not be empty",
        ));
    }

    if schema.repositories.sources.is_empty() {
        return Err(Error::new(
            crate::error::ErrorCode::ConfigValidationError,
            "repositories.sources must declare at least one source",
        ));
    }

    Ok(())
}
