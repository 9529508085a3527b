//! Auth gate - declarative page protection
//!
//! Wraps a page so it only renders with a live session:
//!
//! ```ignore
//! let gate = AuthGate::new(store);
//! match gate.run(|session| async move { load_ticklist(&api, &session).await }).await? {
//!     Guarded::Rendered(page) => show(page),
//!     Guarded::Redirected { location } => goto(location),
//! }
//! ```
//!
//! This is a navigation convenience, not a security boundary; the backend
//! authorizes every request on its own.

use crate::auth;
use crate::error::{Error, Result};
use crate::routes::Route;
use crate::session::{Session, SessionStore};
use std::future::Future;
use std::sync::Arc;

/// Result of a guard check
#[derive(Debug, Clone, PartialEq)]
pub enum GuardResult {
    /// Session is live, continue to the page
    Allow(Session),
    /// No usable session, go here instead
    Redirect { location: String },
}

/// Outcome of a guarded page
#[derive(Debug, Clone, PartialEq)]
pub enum Guarded<T> {
    Rendered(T),
    Redirected { location: String },
}

impl<T> Guarded<T> {
    pub fn rendered(self) -> Option<T> {
        match self {
            Guarded::Rendered(value) => Some(value),
            Guarded::Redirected { .. } => None,
        }
    }
}

/// Path pattern requiring authentication
///
/// `/prefix/*` matches everything below `/prefix/`; other patterns match
/// exactly. `exclude` carves exceptions out of a wildcard.
#[derive(Debug, Clone)]
pub struct RouteGuardMatcher {
    pub pattern: String,
    pub exclude: Vec<String>,
}

impl RouteGuardMatcher {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self { pattern: pattern.into(), exclude: Vec::new() }
    }

    pub fn excluding(mut self, path: impl Into<String>) -> Self {
        self.exclude.push(path.into());
        self
    }

    pub fn matches(&self, path: &str) -> bool {
        if self.exclude.iter().any(|e| e == path) {
            return false;
        }
        matches_pattern(&self.pattern, path)
    }
}

fn matches_pattern(pattern: &str, path: &str) -> bool {
    match pattern.strip_suffix("/*") {
        Some(prefix) => path.strip_prefix(prefix).is_some_and(|rest| rest.starts_with('/')),
        None => pattern == path,
    }
}

/// Redirects to the login page unless a live session is stored
pub struct AuthGate {
    store: Arc<dyn SessionStore>,
    redirect_to: String,
    matchers: Vec<RouteGuardMatcher>,
}

impl AuthGate {
    /// Gate protecting the site's member pages, redirecting to `/login`
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        let matchers = vec![
            RouteGuardMatcher::new(Route::Home.path()),
            RouteGuardMatcher::new(Route::Ticklist.path()),
            RouteGuardMatcher::new(Route::Hitlist.path()),
            RouteGuardMatcher::new(Route::AddClimb.path()),
            RouteGuardMatcher::new(Route::AddArea.path()),
            RouteGuardMatcher::new("/log/*"),
        ];
        Self { store, redirect_to: Route::Login.path(), matchers }
    }

    pub fn with_redirect(mut self, location: impl Into<String>) -> Self {
        self.redirect_to = location.into();
        self
    }

    pub fn with_matcher(mut self, matcher: RouteGuardMatcher) -> Self {
        self.matchers.push(matcher);
        self
    }

    pub fn protects(&self, path: &str) -> bool {
        self.matchers.iter().any(|m| m.matches(path))
    }

    /// The stored session if still valid; an expired one is cleared
    pub async fn current_session(&self) -> Result<Option<Session>> {
        match auth::require_session(self.store.as_ref()).await {
            Ok(session) => Ok(Some(session)),
            Err(Error::NotAuthenticated | Error::SessionExpired(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn check(&self) -> Result<GuardResult> {
        match self.current_session().await? {
            Some(session) => Ok(GuardResult::Allow(session)),
            None => {
                log::debug!("No live session, redirecting to {}", self.redirect_to);
                Ok(GuardResult::Redirect { location: self.redirect_to.clone() })
            }
        }
    }

    /// Check access to `path`; `None` when the path is public
    pub async fn check_path(&self, path: &str) -> Result<Option<GuardResult>> {
        if !self.protects(path) {
            return Ok(None);
        }
        self.check().await.map(Some)
    }

    /// Render `page` with the session, or redirect without calling it
    pub async fn run<T, F, Fut>(&self, page: F) -> Result<Guarded<T>>
    where
        F: FnOnce(Session) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        match self.check().await? {
            GuardResult::Allow(session) => Ok(Guarded::Rendered(page(session).await?)),
            GuardResult::Redirect { location } => Ok(Guarded::Redirected { location }),
        }
    }
}
