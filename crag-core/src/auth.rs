//! Account flows: login, register, logout, whoami

use crate::api::CatalogApi;
use crate::config::session::MAX_SESSION_AGE;
use crate::error::{Error, Result};
use crate::forms::{LoginForm, RegisterForm};
use crate::model::User;
use crate::session::{Session, SessionStore};
use chrono::Duration;

/// Exchange credentials for a token, resolve the user and store the session
///
/// The session lives for the token's `expires_in` when the backend reports
/// one, `max_age` seconds otherwise; see [`session_lifetime`].
pub async fn login(
    api: &dyn CatalogApi,
    store: &dyn SessionStore,
    form: &LoginForm,
    max_age: u64,
) -> Result<Session> {
    form.validate()?;

    let token = api.login(form.username.trim(), &form.password).await?;
    let user = api.current_user(&token.access_token).await?;

    let lifetime = session_lifetime(token.expires_in, max_age);
    let session = Session::new(token.access_token, &user, lifetime);
    store.save(&session).await?;

    log::info!("Logged in as {} until {}", session.username, session.expires_at);
    Ok(session)
}

/// `expires_in` beyond [`MAX_SESSION_AGE`] is ignored in favour of `max_age`,
/// and neither may exceed it.
pub fn session_lifetime(expires_in: Option<u64>, max_age: u64) -> Duration {
    let seconds = match expires_in {
        Some(s) if s <= MAX_SESSION_AGE => s,
        Some(s) => {
            log::warn!("Ignoring token expires_in of {}s, using {}s", s, max_age);
            max_age
        }
        None => max_age,
    };
    // bounded by MAX_SESSION_AGE, well inside i64
    Duration::seconds(seconds.min(MAX_SESSION_AGE) as i64)
}

pub async fn register(api: &dyn CatalogApi, form: &RegisterForm) -> Result<()> {
    form.validate()?;
    api.register(form.username.trim(), form.email.trim(), &form.password).await?;
    log::info!("Registered {}", form.username.trim());
    Ok(())
}

/// Forget the stored session; returns whether one existed
pub async fn logout(store: &dyn SessionStore) -> Result<bool> {
    let cleared = store.clear().await?;
    if cleared {
        log::info!("Logged out");
    }
    Ok(cleared)
}

/// The stored session, failing when it is missing or expired
///
/// An expired session is removed from the store. This is the one place
/// expiry is enforced; [`crate::guard::AuthGate`] builds on it.
pub async fn require_session(store: &dyn SessionStore) -> Result<Session> {
    match store.load().await? {
        None => Err(Error::NotAuthenticated),
        Some(session) if session.is_expired() => {
            log::info!("Session of {} expired at {}", session.username, session.expires_at);
            store.clear().await?;
            Err(Error::SessionExpired(session.expires_at))
        }
        Some(session) => Ok(session),
    }
}

/// The user behind the stored session, as the backend sees it
pub async fn whoami(api: &dyn CatalogApi, store: &dyn SessionStore) -> Result<User> {
    let session = require_session(store).await?;
    api.current_user(session.bearer()).await
}
