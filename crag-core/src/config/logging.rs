//! Logging configuration (file / env layer)
//!
//! Turned into a [`crate::logging::LoggingConfig`] at startup.

use crate::logging::{LogFormat, LogLevel, LogOutput, LoggingConfig};
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Env: CRAG_LOG_LEVEL
    /// Default: "warn"
    pub level: String,

    /// "human", "json" or "logfmt"
    /// Env: CRAG_LOG_FORMAT
    /// Default: "human"
    pub format: String,

    /// Append logs to this file instead of stderr
    /// Env: CRAG_LOG_FILE
    /// Default: None
    pub file_path: Option<String>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self { level: "warn".to_string(), format: "human".to_string(), file_path: None }
    }
}

impl LoggingSettings {
    pub fn merge(&mut self, other: Self) {
        *self = other;
    }

    pub fn apply_env_vars(&mut self) {
        if let Ok(level) = env::var("CRAG_LOG_LEVEL") {
            self.level = level;
        }

        if let Ok(format) = env::var("CRAG_LOG_FORMAT") {
            self.format = format;
        }

        if let Ok(path) = env::var("CRAG_LOG_FILE") {
            self.file_path = if path.is_empty() { None } else { Some(path) };
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.level.parse::<LogLevel>().is_err() {
            bail!("Invalid log level \"{}\": must be error, warn, info, debug or trace", self.level);
        }

        if self.format.parse::<LogFormat>().is_err() {
            bail!("Invalid log format \"{}\": must be human, json or logfmt", self.format);
        }

        Ok(())
    }

    /// Build the runtime logger configuration
    pub fn to_logging_config(&self) -> Result<LoggingConfig> {
        let level = self.level.parse::<LogLevel>().map_err(anyhow::Error::msg)?;
        let format = self.format.parse::<LogFormat>().map_err(anyhow::Error::msg)?;

        let output = match &self.file_path {
            Some(path) => LogOutput::File { path: path.clone() },
            None => LogOutput::Stderr,
        };

        Ok(LoggingConfig::default().with_level(level).with_format(format).with_output(output))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_to_runtime_config() {
        let settings = LoggingSettings {
            level: "debug".into(),
            format: "json".into(),
            file_path: Some("/tmp/crag.log".into()),
        };
        let config = settings.to_logging_config().unwrap();
        assert_eq!(config.level, LogLevel::Debug);
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.outputs, vec![LogOutput::File { path: "/tmp/crag.log".into() }]);
    }

    #[test]
    fn test_rejects_unknown_level() {
        let settings = LoggingSettings { level: "loud".into(), ..LoggingSettings::default() };
        assert!(settings.validate().is_err());
    }
}
