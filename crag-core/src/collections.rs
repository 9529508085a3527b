//! Ticklist and hitlist membership
//!
//! Per (user, climb) each collection is either absent or present. A toggle
//! only moves between the two after the backend confirms the change; on
//! failure the state is left as it was and the error is returned.
//!
//! The ticklist is coupled to ascent logs: adding a tick sends the user on to
//! the log entry page, removing one also deletes the log.

use crate::api::CatalogApi;
use crate::error::Result;
use crate::model::Climb;
use crate::routes::Route;
use crate::session::Session;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionKind {
    /// Climbs the user has completed
    Ticklist,
    /// Climbs the user wants to attempt
    Hitlist,
}

impl CollectionKind {
    pub const ALL: [CollectionKind; 2] = [CollectionKind::Ticklist, CollectionKind::Hitlist];

    /// Backend path segment
    pub fn path(&self) -> &'static str {
        match self {
            CollectionKind::Ticklist => "ticklist",
            CollectionKind::Hitlist => "hitlist",
        }
    }

    pub fn route(&self) -> Route {
        match self {
            CollectionKind::Ticklist => Route::Ticklist,
            CollectionKind::Hitlist => Route::Hitlist,
        }
    }
}

impl fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Membership {
    Absent,
    Present,
}

impl Membership {
    pub fn of(climb_id: u64, climbs: &[Climb]) -> Self {
        if climbs.iter().any(|c| c.id == climb_id) {
            Membership::Present
        } else {
            Membership::Absent
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, Membership::Present)
    }
}

/// Result of a successful toggle
#[derive(Debug, Clone, PartialEq)]
pub struct ToggleOutcome {
    pub membership: Membership,
    /// Page to continue on, set after ticking a climb
    pub redirect: Option<Route>,
    /// Set when the tick was removed but its log could not be
    pub log_cleanup_error: Option<String>,
}

/// Membership of one climb in one collection
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionToggle {
    kind: CollectionKind,
    climb_id: u64,
    membership: Membership,
}

impl CollectionToggle {
    pub fn new(kind: CollectionKind, climb_id: u64, membership: Membership) -> Self {
        Self { kind, climb_id, membership }
    }

    /// Fetch the user's collection and find the climb in it
    pub async fn load(
        api: &dyn CatalogApi,
        session: &Session,
        kind: CollectionKind,
        climb_id: u64,
    ) -> Result<Self> {
        let climbs = api.collection(session, kind).await?;
        Ok(Self::new(kind, climb_id, Membership::of(climb_id, &climbs)))
    }

    pub fn kind(&self) -> CollectionKind {
        self.kind
    }

    pub fn membership(&self) -> Membership {
        self.membership
    }

    pub fn is_member(&self) -> bool {
        self.membership.is_present()
    }

    /// Button label for the current state
    pub fn action_label(&self) -> String {
        match self.membership {
            Membership::Absent => format!("Add to {}", self.kind),
            Membership::Present => format!("Remove from {}", self.kind),
        }
    }

    pub async fn toggle(&mut self, api: &dyn CatalogApi, session: &Session) -> Result<ToggleOutcome> {
        match self.membership {
            Membership::Absent => self.add(api, session).await,
            Membership::Present => self.remove(api, session).await,
        }
    }

    async fn add(&mut self, api: &dyn CatalogApi, session: &Session) -> Result<ToggleOutcome> {
        if let Err(e) = api.collection_add(session, self.kind, self.climb_id).await {
            log::error!("Adding climb {} to {} failed: {}", self.climb_id, self.kind, e);
            return Err(e);
        }

        self.membership = Membership::Present;
        log::info!("Added climb {} to {}", self.climb_id, self.kind);

        let redirect = match self.kind {
            CollectionKind::Ticklist => Some(Route::Log(self.climb_id)),
            CollectionKind::Hitlist => None,
        };
        Ok(ToggleOutcome { membership: self.membership, redirect, log_cleanup_error: None })
    }

    async fn remove(&mut self, api: &dyn CatalogApi, session: &Session) -> Result<ToggleOutcome> {
        if let Err(e) = api.collection_remove(session, self.kind, self.climb_id).await {
            log::error!("Removing climb {} from {} failed: {}", self.climb_id, self.kind, e);
            return Err(e);
        }

        self.membership = Membership::Absent;
        log::info!("Removed climb {} from {}", self.climb_id, self.kind);

        let mut log_cleanup_error = None;
        if self.kind == CollectionKind::Ticklist {
            if let Err(e) = api.remove_log(session, self.climb_id).await {
                log::warn!("Tick removed but log of climb {} remains: {}", self.climb_id, e);
                log_cleanup_error = Some(e.to_string());
            }
        }

        Ok(ToggleOutcome { membership: self.membership, redirect: None, log_cleanup_error })
    }
}
