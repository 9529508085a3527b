//! Submission forms
//!
//! Each form collects raw input, validates it against the catalog rules and
//! turns it into the request payload. Validation problems are gathered into
//! a single [`Error::Validation`] so every field can be reported at once.

use crate::api::CatalogApi;
use crate::error::{Error, Result};
use crate::geometry::LatLng;
use crate::grades::{self, MAX_COMMENT_LEN, MAX_QUALITY};
use crate::model::{Climb, ClimbType, NewClimb, NewLog, UploadReceipt};
use crate::routes::Route;
use crate::session::Session;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

/// The "add climb" form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClimbForm {
    pub name: String,
    climb_type: Option<ClimbType>,
    grade: Option<String>,
    pub quality: Option<u8>,
    pub first_ascensionist: String,
    pub first_ascent_date: Option<NaiveDate>,
    pub area: String,
    pub description: String,
    pub tags: String,
    location: Option<LatLng>,
}

impl ClimbForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn climb_type(&self) -> Option<ClimbType> {
        self.climb_type
    }

    pub fn grade(&self) -> Option<&str> {
        self.grade.as_deref()
    }

    pub fn location(&self) -> Option<LatLng> {
        self.location
    }

    /// Change the type; a grade outside the new vocabulary is cleared
    pub fn set_type(&mut self, climb_type: ClimbType) {
        self.climb_type = Some(climb_type);
        if let Some(grade) = &self.grade {
            if !grades::is_valid_grade(climb_type, grade) {
                log::debug!("Clearing grade {} incompatible with {}", grade, climb_type);
                self.grade = None;
            }
        }
    }

    pub fn set_grade(&mut self, grade: impl Into<String>) {
        self.grade = Some(grade.into());
    }

    /// Grades offered by the selector, empty until a type is chosen
    pub fn grade_options(&self) -> &'static [&'static str] {
        self.climb_type.map(grades::grades_for).unwrap_or(&[])
    }

    /// Coordinate reported by the pin-drop map
    pub fn set_location(&mut self, point: LatLng) {
        self.location = Some(point);
    }

    pub fn validate(&self) -> Result<NewClimb> {
        let mut errors = Vec::new();

        let name = self.name.trim();
        if name.is_empty() {
            errors.push("name is required".to_string());
        }

        let grade = match (self.climb_type, self.grade.as_deref()) {
            (None, _) => {
                errors.push("type is required".to_string());
                None
            }
            (Some(_), None) => {
                errors.push("grade is required".to_string());
                None
            }
            (Some(t), Some(g)) if !grades::is_valid_grade(t, g) => {
                errors.push(format!("grade {} is not a {} grade", g, t));
                None
            }
            (Some(_), Some(g)) => Some(g.to_string()),
        };

        match self.quality {
            None => errors.push("quality is required".to_string()),
            Some(q) if q > MAX_QUALITY => {
                errors.push(format!("quality must be between 0 and {}", MAX_QUALITY))
            }
            Some(_) => {}
        }

        let first_ascensionist = self.first_ascensionist.trim();
        if first_ascensionist.is_empty() {
            errors.push("first ascensionist is required".to_string());
        }
        if self.first_ascent_date.is_none() {
            errors.push("first ascent date is required".to_string());
        }

        match self.location {
            None => errors.push("location is required, drop a pin on the map".to_string()),
            Some(p) if !p.is_valid() => errors.push(format!("location {} is out of range", p.display_fixed())),
            Some(_) => {}
        }

        if !errors.is_empty() {
            return Err(Error::Validation(errors));
        }

        // all Options checked above
        let (Some(climb_type), Some(grade), Some(quality), Some(date), Some(location)) =
            (self.climb_type, grade, self.quality, self.first_ascent_date, self.location)
        else {
            return Err(Error::Validation(vec!["incomplete form".to_string()]));
        };

        Ok(NewClimb {
            name: name.to_string(),
            climb_type,
            grade,
            quality,
            first_ascensionist: first_ascensionist.to_string(),
            first_ascent_date: date,
            area: non_empty(&self.area),
            latitude: location.lat,
            longitude: location.lng,
            description: non_empty(&self.description),
            tags: non_empty(&self.tags),
        })
    }

    pub async fn submit(&self, api: &dyn CatalogApi, session: &Session) -> Result<Climb> {
        let climb = self.validate()?;
        let created = api.create_climb(session, &climb).await?;
        log::info!("Created climb {} ({})", created.name, created.id);
        Ok(created)
    }
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Ascent log entry for one climb
#[derive(Debug, Clone, PartialEq)]
pub struct LogForm {
    pub climb_id: u64,
    /// Restricts the grade vocabulary when known
    pub climb_type: Option<ClimbType>,
    pub date: NaiveDate,
    pub grade: Option<String>,
    pub comment: String,
}

impl LogForm {
    pub fn new(climb_id: u64, date: NaiveDate) -> Self {
        Self { climb_id, climb_type: None, date, grade: None, comment: String::new() }
    }

    /// Form seeded with the climb's type and consensus grade
    pub fn for_climb(climb: &Climb, date: NaiveDate) -> Self {
        Self {
            climb_id: climb.id,
            climb_type: Some(climb.climb_type),
            date,
            grade: climb.grade.clone(),
            comment: String::new(),
        }
    }

    pub fn grade_options(&self) -> Vec<&'static str> {
        match self.climb_type {
            Some(t) => grades::grades_for(t).to_vec(),
            None => grades::all_grades(),
        }
    }

    pub fn validate(&self) -> Result<NewLog> {
        let mut errors = Vec::new();

        let grade = self.grade.as_deref().map(str::trim).unwrap_or("");
        if grade.is_empty() {
            errors.push("grade is required".to_string());
        } else if !self.grade_options().contains(&grade) {
            errors.push(format!("unknown grade {}", grade));
        }

        let len = self.comment.chars().count();
        if len > MAX_COMMENT_LEN {
            errors.push(format!("comment is {} characters, the limit is {}", len, MAX_COMMENT_LEN));
        }

        if !errors.is_empty() {
            return Err(Error::Validation(errors));
        }

        Ok(NewLog {
            climb_id: self.climb_id,
            date: self.date,
            grade: grade.to_string(),
            comment: self.comment.trim().to_string(),
        })
    }

    /// Post the log; returns the page to go to next
    pub async fn submit(&self, api: &dyn CatalogApi, session: &Session) -> Result<Route> {
        let log = self.validate()?;
        api.add_log(session, &log).await?;
        log::info!("Logged ascent of climb {} on {}", log.climb_id, log.date);
        Ok(Route::Node(self.climb_id))
    }
}

/// KML area upload
#[derive(Debug, Clone, PartialEq)]
pub struct AreaUpload {
    path: PathBuf,
}

impl AreaUpload {
    /// Accepts only `.kml` files
    pub fn from_path(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let is_kml = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("kml"));

        if !is_kml {
            return Err(Error::Validation(vec![format!(
                "{} is not a .kml file",
                path.display()
            )]));
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "area.kml".to_string())
    }

    pub async fn submit(&self, api: &dyn CatalogApi, session: &Session) -> Result<UploadReceipt> {
        let content = tokio::fs::read(&self.path).await?;
        if content.is_empty() {
            return Err(Error::Validation(vec![format!("{} is empty", self.path.display())]));
        }

        let receipt = api.upload_kml(session, &self.file_name(), content).await?;
        log::info!("Uploaded area file {}", receipt.filename);
        Ok(receipt)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

impl LoginForm {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self { username: username.into(), password: password.into() }
    }

    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();
        if self.username.trim().is_empty() {
            errors.push("username is required".to_string());
        }
        if self.password.is_empty() {
            errors.push("password is required".to_string());
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation(errors))
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl RegisterForm {
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();
        if self.username.trim().is_empty() {
            errors.push("username is required".to_string());
        }
        if !looks_like_email(self.email.trim()) {
            errors.push(format!("\"{}\" is not an email address", self.email.trim()));
        }
        if self.password.is_empty() {
            errors.push("password is required".to_string());
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation(errors))
        }
    }
}

fn looks_like_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
        }
        None => false,
    }
}
