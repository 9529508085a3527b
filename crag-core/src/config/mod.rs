//! Configuration system for Crag
//!
//! # Configuration Hierarchy
//!
//! Values are resolved in the following order (highest priority wins):
//!
//! 1. **Code / CLI flags** - applied by the caller after loading
//! 2. **Environment Variables** (`CRAG_*`) - override file config
//! 3. **Config File** (`crag.toml`) - override defaults
//! 4. **Defaults** - lowest priority
//!
//! # Example
//!
//! ```no_run
//! use crag_core::config::CragConfig;
//!
//! let config = CragConfig::load()?;
//! let config = CragConfig::load_from("/etc/crag/crag.toml")?;
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! Sections may be omitted from the file; missing keys keep their defaults.

pub mod api;
pub mod logging;
pub mod map;
pub mod session;

pub use api::ApiConfig;
pub use logging::LoggingSettings;
pub use map::MapConfig;
pub use session::SessionConfig;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default config file name, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "crag.toml";

/// Complete Crag configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CragConfig {
    pub api: ApiConfig,
    pub session: SessionConfig,
    pub logging: LoggingSettings,
    pub map: MapConfig,
}

impl CragConfig {
    /// Load configuration with full supersedence chain
    pub fn load() -> Result<Self> {
        Self::load_from(DEFAULT_CONFIG_FILE)
    }

    /// Load configuration from a specific file; a missing file means defaults
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let mut config = Self::default();

        if path.exists() {
            let file_config = Self::from_file(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?;
            config.merge(file_config);
        }

        config.apply_env_vars();

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse TOML config: {}", path.as_ref().display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Merge another config into this one (other takes priority)
    pub fn merge(&mut self, other: Self) {
        self.api.merge(other.api);
        self.session.merge(other.session);
        self.logging.merge(other.logging);
        self.map.merge(other.map);
    }

    /// Apply environment variables to configuration
    pub fn apply_env_vars(&mut self) {
        self.api.apply_env_vars();
        self.session.apply_env_vars();
        self.logging.apply_env_vars();
        self.map.apply_env_vars();
    }

    pub fn validate(&self) -> Result<()> {
        self.api.validate()?;
        self.session.validate()?;
        self.logging.validate()?;
        self.map.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = CragConfig::default();
        assert_eq!(config.api.base_url, "http://localhost:8000");
        assert_eq!(config.api.page_size, 25);
        assert_eq!(config.map.zoom, 8);
        assert_eq!(config.map.cluster_radius, 10.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = CragConfig::from_toml_str(
            r#"
[api]
base_url = "https://api.crag.example"

[map]
zoom = 11
"#,
        )
        .unwrap();

        assert_eq!(config.api.base_url, "https://api.crag.example");
        assert_eq!(config.api.request_timeout, 30);
        assert_eq!(config.map.zoom, 11);
        assert_eq!(config.map.cluster_radius, 10.0);
        assert_eq!(config.session.max_age, 86_400);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[api]\npage_size = 50\n\n[logging]\nlevel = \"debug\"").unwrap();

        let config = CragConfig::load_from(file.path()).unwrap();
        assert_eq!(config.api.page_size, 50);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_missing_file_means_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = CragConfig::load_from(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.api.page_size, 25);
    }

    #[test]
    fn test_invalid_file_is_reported() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[api\nbase_url = ").unwrap();
        let err = CragConfig::load_from(file.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to load config"));
    }
}
