//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading engine
//! configuration from YAML files.

use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};
use crate::models::PermissionCatalog;

use super::types::{EngineConfig, EngineSettings};

/// Loads and provides access to engine configuration.
///
/// # Directory Structure
///
/// ```text
/// config/restaurant/
/// ├── engine.yaml       # Attendance and roster settings
/// └── permissions.yaml  # Permission catalog, category -> [{key, label}]
/// ```
///
/// # Example
///
/// ```no_run
/// use staff_ops_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/restaurant").unwrap();
/// println!("Late after {} minutes", loader.config().attendance().late_grace_minutes);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: EngineConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// Returns an error if either file is missing, contains invalid YAML,
    /// or the permission catalog defines no permissions.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let settings = Self::load_yaml::<EngineSettings>(&path.join("engine.yaml"))?;

        let permissions_path = path.join("permissions.yaml");
        let permissions = Self::load_yaml::<PermissionCatalog>(&permissions_path)?;
        if permissions.is_empty() {
            return Err(EngineError::ConfigParseError {
                path: permissions_path.display().to_string(),
                message: "permission catalog defines no permissions".to_string(),
            });
        }

        Ok(Self {
            config: EngineConfig::new(settings, permissions),
        })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the loaded configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Consumes the loader, returning the configuration.
    pub fn into_config(self) -> EngineConfig {
        self.config
    }

    /// Returns the permission catalog.
    pub fn permissions(&self) -> &PermissionCatalog {
        self.config.permissions()
    }
}
