//! `crag login`, `register`, `logout` and `whoami`

use crate::context::{Context, LoginRequired};
use anyhow::Result;
use crag_core::auth;
use crag_core::prelude::*;

pub async fn login(ctx: &Context, username: &str, password: &str) -> Result<()> {
    let form = LoginForm::new(username, password);
    let session = auth::login(&ctx.api, ctx.store.as_ref(), &form, ctx.config.session.max_age).await?;

    println!("Logged in as {} (session valid until {})", session.username, expiry(&session));
    Ok(())
}

pub async fn register(ctx: &Context, username: &str, email: &str, password: &str) -> Result<()> {
    let form = RegisterForm {
        username: username.to_string(),
        email: email.to_string(),
        password: password.to_string(),
    };
    auth::register(&ctx.api, &form).await?;

    println!("Account {} created, log in with `crag login -u {}`", form.username.trim(), form.username.trim());
    Ok(())
}

pub async fn logout(ctx: &Context) -> Result<()> {
    if auth::logout(ctx.store.as_ref()).await? {
        println!("Logged out");
    } else {
        println!("Not logged in");
    }
    Ok(())
}

pub async fn whoami(ctx: &Context) -> Result<()> {
    let session = ctx.require_session(&Route::Home).await?;

    let user = match ctx.api.current_user(session.bearer()).await {
        Ok(user) => user,
        Err(e) if e.requires_login() => {
            // token revoked on the backend
            auth::logout(ctx.store.as_ref()).await?;
            return Err(LoginRequired { location: Route::Login.path() }.into());
        }
        Err(e) => return Err(e.into()),
    };

    println!("{} (id {}, {})", user.username, user.id, user.href());
    println!("Session valid until {}", expiry(&session));
    Ok(())
}

fn expiry(session: &Session) -> String {
    session.expires_at.format("%Y-%m-%d %H:%M UTC").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    #[test]
    fn expiry_format() {
        let user = User { id: 3, username: "amina".into(), email: None };
        let mut session = Session::new("tok", &user, Duration::hours(1));
        session.expires_at = Utc.with_ymd_and_hms(2024, 3, 1, 18, 30, 0).unwrap();
        assert_eq!(expiry(&session), "2024-03-01 18:30 UTC");
    }
}
