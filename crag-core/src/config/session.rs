//! Session persistence configuration

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Longest session the client keeps, in seconds (one year)
pub const MAX_SESSION_AGE: u64 = 365 * 24 * 60 * 60;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Where the CLI keeps the logged-in session
    /// Env: CRAG_SESSION_PATH
    /// Default: "$HOME/.crag/session.json"
    pub path: PathBuf,

    /// Session lifetime in seconds when the backend does not report one
    /// Env: CRAG_SESSION_MAX_AGE
    /// Default: 86400 (24 hours)
    pub max_age: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        let home = env::var_os("HOME").map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));
        Self { path: home.join(".crag").join("session.json"), max_age: 86_400 }
    }
}

impl SessionConfig {
    pub fn merge(&mut self, other: Self) {
        self.path = other.path;
        self.max_age = other.max_age;
    }

    pub fn apply_env_vars(&mut self) {
        if let Ok(path) = env::var("CRAG_SESSION_PATH") {
            self.path = PathBuf::from(path);
        }

        if let Ok(max_age) = env::var("CRAG_SESSION_MAX_AGE") {
            if let Ok(m) = max_age.parse() {
                self.max_age = m;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_age == 0 {
            bail!("Invalid session max_age: must be greater than 0");
        }

        if self.max_age > MAX_SESSION_AGE {
            bail!("Invalid session max_age {}: must be at most {} (one year)", self.max_age, MAX_SESSION_AGE);
        }

        if self.path.as_os_str().is_empty() {
            bail!("Invalid session path: must not be empty");
        }

        Ok(())
    }
}
