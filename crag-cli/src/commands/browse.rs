//! Public pages: feed, indexes, map, climb detail, profiles

use crate::context::{Context, LoginRequired};
use crate::render;
use anyhow::{bail, Context as _, Result};
use crag_core::pages::feed::FIRST_ASCENT_LIMIT;
use crag_core::prelude::*;
use crag_core::routes::index_menu;
use std::path::PathBuf;

pub async fn feed(ctx: &Context) -> Result<()> {
    let page = ctx
        .gate
        .run(|_session| async { Ok(FeedPage::load(&ctx.api, FIRST_ASCENT_LIMIT).await) })
        .await?;

    let feed = match page {
        Guarded::Rendered(feed) => feed,
        Guarded::Redirected { location } => return Err(LoginRequired { location }.into()),
    };

    println!("{}", render::feed(&feed));
    if feed.is_unavailable() {
        bail!("Backend unavailable at {}", ctx.config.api.base_url);
    }
    Ok(())
}

/// Dropdown label of a route, e.g. "Sport Index"
pub fn menu_label(route: &Route) -> String {
    index_menu()
        .into_iter()
        .find(|entry| &entry.route == route)
        .map(|entry| entry.label.to_string())
        .unwrap_or_else(|| route.path())
}

pub async fn climbs(
    ctx: &Context,
    climb_type: Option<ClimbType>,
    grades: &[String],
    areas: &[String],
    page: usize,
) -> Result<()> {
    if page == 0 {
        bail!("Pages are numbered from 1");
    }

    let filter = FilterState::with_selection(grades.iter().cloned(), areas.iter().cloned());
    let mut index = ClimbIndex::new(climb_type, ctx.config.api.page_size).with_filter(filter);
    index.go_to(&ctx.api, page - 1).await?;

    println!("{}", menu_label(&Route::Index(climb_type)));
    if let Some(filters) = render::active_filters(index.filter()) {
        println!("{}", filters);
    }
    println!("\n{}\n", render::climb_rows(&index.rows()));
    println!("{}", render::pager_footer(index.pager()));
    Ok(())
}

pub struct MapOptions {
    pub climb_type: Option<ClimbType>,
    pub grades: Vec<String>,
    pub areas: Vec<String>,
    pub cluster: bool,
    pub zoom: Option<u8>,
    pub out: Option<PathBuf>,
}

pub async fn map(ctx: &Context, options: MapOptions) -> Result<()> {
    let mut config = ctx.config.map.clone();
    if let Some(zoom) = options.zoom {
        config.zoom = zoom;
        config.validate()?;
    }

    let filter = FilterState::with_selection(options.grades, options.areas);
    let scene = MapScene::load(&ctx.api, options.climb_type, &filter, &config, options.cluster).await?;

    match &options.out {
        Some(path) => {
            std::fs::write(path, scene.to_json()?)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Wrote {} climbs to {}", scene.marker_count(), path.display());
            for warning in &scene.warnings {
                eprintln!("warning: {}", warning);
            }
        }
        None => {
            let title = match options.climb_type {
                Some(t) => menu_label(&Route::Map(t)),
                None => "Climbs Map".to_string(),
            };
            println!("{}", title);
            println!("{}", render::scene_summary(&scene));
        }
    }
    Ok(())
}

pub async fn show(ctx: &Context, id: u64) -> Result<()> {
    let session = ctx.optional_session().await?;
    let detail = ClimbDetail::load(&ctx.api, id, session.as_ref()).await?;
    println!("{}", render::climb_detail(&detail));
    Ok(())
}

pub async fn profile(ctx: &Context, user: &str) -> Result<()> {
    let page = ProfilePage::load(&ctx.api, user).await?;
    println!("{}", render::profile(&page));
    Ok(())
}

pub async fn users(ctx: &Context, search: Option<&str>) -> Result<()> {
    let users = ctx.api.list_users(search).await?;
    println!("{}", render::users(&users));
    Ok(())
}

pub fn grades(climb_type: Option<ClimbType>) -> Result<()> {
    println!("{}", render::grades(climb_type));
    Ok(())
}
