//! `crag add-climb` and `crag add-area`

use crate::context::Context;
use anyhow::Result;
use chrono::NaiveDate;
use clap::Args;
use crag_core::map::{area_at, area_overlays};
use crag_core::prelude::*;
use std::path::Path;

#[derive(Args, Debug)]
pub struct AddClimbArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long = "type")]
    pub climb_type: ClimbType,
    #[arg(long)]
    pub grade: String,
    /// Stars, 0-5
    #[arg(long)]
    pub quality: u8,
    /// First ascensionist
    #[arg(long = "fa")]
    pub first_ascensionist: String,
    #[arg(long = "fa-date")]
    pub first_ascent_date: NaiveDate,
    #[arg(long, allow_negative_numbers = true)]
    pub lat: f64,
    #[arg(long, allow_negative_numbers = true)]
    pub lon: f64,
    /// Looked up from the area polygons when omitted
    #[arg(long)]
    pub area: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    /// Comma-separated
    #[arg(long)]
    pub tags: Option<String>,
}

/// Fill the climb form as the add-climb page would
pub fn climb_form(args: AddClimbArgs) -> ClimbForm {
    let mut form = ClimbForm::new();
    form.name = args.name;
    form.set_type(args.climb_type);
    form.set_grade(args.grade);
    form.quality = Some(args.quality);
    form.first_ascensionist = args.first_ascensionist;
    form.first_ascent_date = Some(args.first_ascent_date);
    form.area = args.area.unwrap_or_default();
    form.description = args.description.unwrap_or_default();
    form.tags = args.tags.unwrap_or_default();

    let mut pin = PinDropper::new(None);
    pin.toggle();
    if let Some(point) = pin.click(LatLng::new(args.lat, args.lon)) {
        form.set_location(point);
    }
    form
}

pub async fn add_climb(ctx: &Context, args: AddClimbArgs) -> Result<()> {
    let session = ctx.require_session(&Route::AddClimb).await?;
    let mut form = climb_form(args);

    // fail on bad input before any network traffic
    form.validate()?;

    if form.area.trim().is_empty() {
        if let Some(name) = locate_area(ctx, &form).await {
            println!("Inside area {}", name);
            form.area = name;
        }
    }

    let climb = form.submit(&ctx.api, &session).await?;
    println!("Created {} ({})", climb.name, climb.href());
    Ok(())
}

async fn locate_area(ctx: &Context, form: &ClimbForm) -> Option<String> {
    let point = form.location()?;
    let areas = match ctx.api.list_areas().await {
        Ok(areas) => areas,
        Err(e) => {
            log::warn!("Area lookup skipped: {}", e);
            return None;
        }
    };

    let (overlays, warnings) = area_overlays(&areas, &ctx.config.map.polygon_color);
    for warning in warnings {
        log::warn!("{}", warning);
    }
    area_at(&overlays, point).map(|overlay| overlay.name.clone())
}

pub async fn add_area(ctx: &Context, file: &Path) -> Result<()> {
    let upload = AreaUpload::from_path(file)?;
    let session = ctx.require_session(&Route::AddArea).await?;

    let receipt = upload.submit(&ctx.api, &session).await?;
    println!("Uploaded {}", receipt.filename);
    Ok(())
}
