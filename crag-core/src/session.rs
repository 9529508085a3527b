//! Explicit login session and where it is kept
//!
//! A [`Session`] is created by a successful login and handed to every
//! authenticated API call. Stores only persist it; expiry is judged by the
//! caller (see [`crate::guard`]).

use crate::error::Result;
use crate::model::User;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

/// Authenticated user session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Bearer token returned by `POST /token`
    pub token: String,
    pub user_id: u64,
    pub username: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Session for `user` valid for `lifetime` from now
    ///
    /// Expiry saturates at the latest representable instant.
    pub fn new(token: impl Into<String>, user: &User, lifetime: Duration) -> Self {
        let now = Utc::now();
        Self {
            token: token.into(),
            user_id: user.id,
            username: user.username.clone(),
            issued_at: now,
            expires_at: now.checked_add_signed(lifetime).unwrap_or(DateTime::<Utc>::MAX_UTC),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Time left before expiry, zero once expired
    pub fn remaining(&self) -> Duration {
        (self.expires_at - Utc::now()).max(Duration::zero())
    }

    pub fn bearer(&self) -> &str {
        &self.token
    }
}

/// Session storage trait
///
/// The client holds at most one session at a time.
#[async_trait::async_trait]
pub trait SessionStore: Send + Sync {
    /// The stored session, expired or not
    async fn load(&self) -> Result<Option<Session>>;

    /// Replace the stored session
    async fn save(&self, session: &Session) -> Result<()>;

    /// Forget the stored session
    /// Returns whether one was present
    async fn clear(&self) -> Result<bool>;
}

// Implement SessionStore for Arc<S> to allow sharing one store
#[async_trait::async_trait]
impl<S: SessionStore + ?Sized> SessionStore for std::sync::Arc<S> {
    async fn load(&self) -> Result<Option<Session>> {
        (**self).load().await
    }

    async fn save(&self, session: &Session) -> Result<()> {
        (**self).save(session).await
    }

    async fn clear(&self) -> Result<bool> {
        (**self).clear().await
    }
}

/// In-memory session store
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    session: RwLock<Option<Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with `session`
    pub fn with_session(session: Session) -> Self {
        Self { session: RwLock::new(Some(session)) }
    }
}

#[async_trait::async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self) -> Result<Option<Session>> {
        Ok(self.session.read().await.clone())
    }

    async fn save(&self, session: &Session) -> Result<()> {
        *self.session.write().await = Some(session.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<bool> {
        Ok(self.session.write().await.take().is_some())
    }
}

/// Session persisted as a JSON file, used by the CLI between invocations
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait::async_trait]
impl SessionStore for FileSessionStore {
    async fn load(&self) -> Result<Option<Session>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(session) => Ok(Some(session)),
                Err(e) => {
                    // An unreadable file is as good as no session
                    log::warn!("Ignoring corrupt session file {}: {}", self.path.display(), e);
                    Ok(None)
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_vec_pretty(session)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tokio::fs::set_permissions(&tmp, std::fs::Permissions::from_mode(0o600)).await?;
        }

        tokio::fs::rename(&tmp, &self.path).await?;
        log::debug!("Session saved to {}", self.path.display());
        Ok(())
    }

    async fn clear(&self) -> Result<bool> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User { id: 3, username: "amina".into(), email: None }
    }

    #[test]
    fn test_unrepresentable_lifetime_saturates() {
        let session = Session::new("tok", &user(), Duration::days(100_000_000));
        assert_eq!(session.expires_at, DateTime::<Utc>::MAX_UTC);
        assert!(!session.is_expired());
        assert!(session.remaining() > Duration::days(365));
    }

    #[test]
    fn test_session_expiry() {
        let session = Session::new("tok", &user(), Duration::hours(1));
        assert!(!session.is_expired());
        assert!(session.is_expired_at(session.expires_at));
        assert!(session.remaining() > Duration::minutes(59));

        let stale = Session::new("tok", &user(), Duration::seconds(-5));
        assert!(stale.is_expired());
        assert_eq!(stale.remaining(), Duration::zero());
    }

    #[tokio::test]
    async fn test_memory_store() {
        let store = MemorySessionStore::new();
        assert!(store.load().await.unwrap().is_none());

        let session = Session::new("tok", &user(), Duration::hours(1));
        store.save(&session).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(session));

        assert!(store.clear().await.unwrap());
        assert!(!store.clear().await.unwrap());
    }

    #[tokio::test]
    async fn test_file_store_persists_between_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");
        let session = Session::new("tok", &user(), Duration::hours(1));

        FileSessionStore::new(&path).save(&session).await.unwrap();

        let reopened = FileSessionStore::new(&path);
        assert_eq!(reopened.load().await.unwrap(), Some(session));
        assert!(reopened.clear().await.unwrap());
        assert!(reopened.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_corrupt_file_reads_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, b"not json").unwrap();

        assert!(FileSessionStore::new(&path).load().await.unwrap().is_none());
    }
}
