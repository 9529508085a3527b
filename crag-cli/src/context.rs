//! Per-invocation runtime: config, logger, API client and session store

use anyhow::{bail, Context as _, Result};
use crag_core::logging::LogLevel;
use crag_core::prelude::*;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

pub struct Context {
    pub config: CragConfig,
    pub api: ApiClient,
    pub store: Arc<FileSessionStore>,
    pub gate: AuthGate,
}

impl Context {
    pub fn init(config_path: Option<&Path>, api_url: Option<String>, verbose: bool) -> Result<Self> {
        let config = load_config(config_path, api_url)?;

        let mut logging = config.logging.to_logging_config()?;
        if verbose {
            logging = logging.with_level(LogLevel::Debug);
        }
        init_logging(&logging)?;

        let api = ApiClient::new(&config.api).context("Failed to build API client")?;
        let store = Arc::new(FileSessionStore::new(&config.session.path));
        let gate = AuthGate::new(store.clone());

        log::debug!("Using backend {} and session file {}", config.api.base_url, store.path().display());
        Ok(Self { config, api, store, gate })
    }

    /// Live session for a member page, or [`LoginRequired`]
    pub async fn require_session(&self, route: &Route) -> Result<Session> {
        let checked = match self.gate.check_path(&route.path()).await? {
            Some(result) => result,
            None => self.gate.check().await?,
        };
        match checked {
            GuardResult::Allow(session) => Ok(session),
            GuardResult::Redirect { location } => Err(LoginRequired { location }.into()),
        }
    }

    /// Session if one is live; public pages render either way
    pub async fn optional_session(&self) -> Result<Option<Session>> {
        Ok(self.gate.current_session().await?)
    }
}

pub fn load_config(path: Option<&Path>, api_url: Option<String>) -> Result<CragConfig> {
    let mut config = match path {
        Some(path) => {
            if !path.exists() {
                bail!("Config file not found: {}", path.display());
            }
            CragConfig::load_from(path)?
        }
        None => CragConfig::load()?,
    };

    if let Some(url) = api_url {
        config.api.base_url = url;
        config.validate()?;
    }
    Ok(config)
}

/// A member page was requested without a live session
#[derive(Debug, Clone, PartialEq)]
pub struct LoginRequired {
    pub location: String,
}

impl fmt::Display for LoginRequired {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "login required (redirect to {}), run `crag login`", self.location)
    }
}

impl std::error::Error for LoginRequired {}
