//! Store configuration
//!
//! Non-sensitive settings that decide where the bundled backends keep their
//! data. Stored as a plain JSON file.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{PersistError, Result};
use crate::storage::DEFAULT_SERVICE_NAME;

/// Suite used when none is configured
pub const DEFAULT_SUITE: &str = "standard";

/// Configuration for the bundled stores
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersistConfig {
    /// Config file version
    pub version: u32,
    /// Keychain service name
    pub service_name: String,
    /// Optional namespace prepended to keychain accounts
    pub key_prefix: Option<String>,
    /// Directory for preference files (platform config dir when unset)
    pub preferences_dir: Option<PathBuf>,
    /// Preference file stem
    pub preferences_suite: String,
}

impl Default for PersistConfig {
    fn default() -> Self {
        Self {
            version: 1,
            service_name: DEFAULT_SERVICE_NAME.to_string(),
            key_prefix: None,
            preferences_dir: None,
            preferences_suite: DEFAULT_SUITE.to_string(),
        }
    }
}

impl PersistConfig {
    /// Platform directories for persist-kit
    pub fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("dev", "persist-kit", "persist-kit")
    }

    /// Default location of the config file
    pub fn default_path() -> Result<PathBuf> {
        Self::project_dirs()
            .map(|dirs| dirs.config_dir().join("config.json"))
            .ok_or_else(|| {
                PersistError::ConfigError("Could not determine config directory".to_string())
            })
    }

    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: PersistConfig = serde_json::from_str(&contents)?;
        config.validate()?;
        debug!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Load configuration, falling back to defaults when the file is missing
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No config file found at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        self.validate()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(self)?;

        // Write atomically using temp file
        let temp_path = path.with_extension("tmp");
        std::fs::write(&temp_path, &contents)?;
        std::fs::rename(&temp_path, path)?;

        debug!("Saved config to {:?}", path);
        Ok(())
    }

    /// Reject values the backends cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.service_name.trim().is_empty() {
            return Err(PersistError::ConfigError(
                "serviceName must not be empty".to_string(),
            ));
        }

        let suite = self.preferences_suite.as_str();
        if suite.trim().is_empty() || suite.contains(['/', '\\']) || suite == "." || suite == ".."
        {
            return Err(PersistError::ConfigError(format!(
                "Invalid preferencesSuite: {:?}",
                suite
            )));
        }

        Ok(())
    }

    /// Directory holding preference files
    pub fn preferences_dir(&self) -> Result<PathBuf> {
        match &self.preferences_dir {
            Some(dir) => Ok(dir.clone()),
            None => Self::project_dirs()
                .map(|dirs| dirs.config_dir().join("prefs"))
                .ok_or_else(|| {
                    PersistError::ConfigError(
                        "Could not determine preferences directory".to_string(),
                    )
                }),
        }
    }

    /// Full path of the configured preference file
    pub fn preferences_file(&self) -> Result<PathBuf> {
        Ok(self
            .preferences_dir()?
            .join(format!("{}.json", self.preferences_suite)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let temp_dir = TempDir::new().unwrap();
        let config = PersistConfig::load_or_default(&temp_dir.path().join("config.json")).unwrap();

        assert_eq!(config, PersistConfig::default());
        assert_eq!(config.service_name, "persist-kit");
        assert_eq!(config.preferences_suite, "standard");
    }

    #[test]
    fn test_config_persistence() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.json");

        let config = PersistConfig {
            service_name: "com.example.app".to_string(),
            key_prefix: Some("prod".to_string()),
            preferences_dir: Some(temp_dir.path().join("prefs")),
            preferences_suite: "group.example".to_string(),
            ..Default::default()
        };
        config.save(&path).unwrap();

        let loaded = PersistConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(
            loaded.preferences_file().unwrap(),
            temp_dir.path().join("prefs").join("group.example.json")
        );
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        std::fs::write(&path, r#"{ "keyPrefix": "dev" }"#).unwrap();

        let config = PersistConfig::load(&path).unwrap();
        assert_eq!(config.key_prefix, Some("dev".to_string()));
        assert_eq!(config.service_name, DEFAULT_SERVICE_NAME);
        assert_eq!(config.version, 1);
    }

    #[test]
    fn test_invalid_suite_rejected() {
        let config = PersistConfig {
            preferences_suite: "../escape".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(PersistError::ConfigError(_))
        ));
    }

    #[test]
    fn test_malformed_config_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            PersistConfig::load_or_default(&path),
            Err(PersistError::SerializationError(_))
        ));
    }
}
