//! Member pages: ticklist, hitlist and ascent logs

use crate::context::Context;
use crate::render;
use crate::LogArgs;
use anyhow::{Context as _, Result};
use chrono::{Local, NaiveDate};
use crag_core::prelude::*;

pub async fn list(ctx: &Context, kind: CollectionKind) -> Result<()> {
    let session = ctx.require_session(&kind.route()).await?;
    let climbs = ctx.api.collection(&session, kind).await?;

    println!("Your {} ({} climbs)\n", kind, climbs.len());
    println!("{}", render::climbs(&climbs));
    Ok(())
}

/// Tick a climb, then log the ascent the way the site sends you to `/log/{id}`
pub async fn tick(ctx: &Context, id: u64, args: LogArgs) -> Result<()> {
    let session = ctx.require_session(&Route::Log(id)).await?;
    let mut detail = ClimbDetail::load(&ctx.api, id, Some(&session)).await?;

    if is_member(&detail, CollectionKind::Ticklist) {
        println!("{} is already on your ticklist", detail.climb.name);
        return Ok(());
    }

    let outcome = detail.toggle(&ctx.api, &session, CollectionKind::Ticklist).await?;
    println!("Added {} to your ticklist", detail.climb.name);

    if let Some(Route::Log(_)) = outcome.redirect {
        submit_log(ctx, &session, &detail.climb, args)
            .await
            .with_context(|| format!("Ticked, but the ascent was not logged; retry with `crag log {}`", id))?;
    }
    Ok(())
}

pub async fn untick(ctx: &Context, id: u64) -> Result<()> {
    let session = ctx.require_session(&Route::Ticklist).await?;
    let mut detail = ClimbDetail::load(&ctx.api, id, Some(&session)).await?;

    if !is_member(&detail, CollectionKind::Ticklist) {
        println!("{} is not on your ticklist", detail.climb.name);
        return Ok(());
    }

    let outcome = detail.toggle(&ctx.api, &session, CollectionKind::Ticklist).await?;
    println!("Removed {} from your ticklist", detail.climb.name);
    if let Some(err) = outcome.log_cleanup_error {
        eprintln!("warning: the ascent log could not be removed: {}", err);
    }
    Ok(())
}

pub async fn hit(ctx: &Context, id: u64) -> Result<()> {
    let session = ctx.require_session(&Route::Hitlist).await?;
    let mut detail = ClimbDetail::load(&ctx.api, id, Some(&session)).await?;

    let outcome = detail.toggle(&ctx.api, &session, CollectionKind::Hitlist).await?;
    if outcome.membership.is_present() {
        println!("Added {} to your hitlist", detail.climb.name);
    } else {
        println!("Removed {} from your hitlist", detail.climb.name);
    }
    Ok(())
}

pub async fn log(ctx: &Context, id: u64, args: LogArgs) -> Result<()> {
    let session = ctx.require_session(&Route::Log(id)).await?;
    let climb = ctx.api.get_climb(id).await?;
    submit_log(ctx, &session, &climb, args).await
}

fn is_member(detail: &ClimbDetail, kind: CollectionKind) -> bool {
    detail.membership(kind).value().is_some_and(CollectionToggle::is_member)
}

/// Log form for `climb`; date defaults to `today`, grade to the consensus
pub fn log_form(climb: &Climb, args: LogArgs, today: NaiveDate) -> LogForm {
    let mut form = LogForm::for_climb(climb, args.date.unwrap_or(today));
    if let Some(grade) = args.grade {
        form.grade = Some(grade);
    }
    if let Some(comment) = args.comment {
        form.comment = comment;
    }
    form
}

async fn submit_log(ctx: &Context, session: &Session, climb: &Climb, args: LogArgs) -> Result<()> {
    let form = log_form(climb, args, Local::now().date_naive());
    let next = form.submit(&ctx.api, session).await?;
    println!("Logged your ascent of {} on {}, see {}", climb.name, form.date, next);
    Ok(())
}
