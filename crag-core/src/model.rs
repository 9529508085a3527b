//! Catalog data model as exchanged with the backend API
//!
//! Field names follow the JSON wire format. Optional backend columns stay
//! `Option` so partially filled records still decode.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Climbing discipline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClimbType {
    Boulder,
    Sport,
    Trad,
}

impl ClimbType {
    pub const ALL: [ClimbType; 3] = [ClimbType::Boulder, ClimbType::Sport, ClimbType::Trad];

    pub fn as_str(&self) -> &'static str {
        match self {
            ClimbType::Boulder => "Boulder",
            ClimbType::Sport => "Sport",
            ClimbType::Trad => "Trad",
        }
    }
}

impl fmt::Display for ClimbType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClimbType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "boulder" => Ok(ClimbType::Boulder),
            "sport" => Ok(ClimbType::Sport),
            "trad" => Ok(ClimbType::Trad),
            other => Err(format!("unknown climb type \"{}\" (expected Boulder, Sport or Trad)", other)),
        }
    }
}

/// A catalogued route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Climb {
    pub id: u64,
    pub name: String,
    #[serde(rename = "type")]
    pub climb_type: ClimbType,
    #[serde(default)]
    pub grade: Option<String>,
    /// Star rating, 0-5
    #[serde(default)]
    pub quality: Option<u8>,
    /// Username of the first ascensionist
    #[serde(default)]
    pub first_ascensionist: Option<String>,
    #[serde(default)]
    pub first_ascent_date: Option<String>,
    #[serde(default)]
    pub area: Option<String>,
    #[serde(default)]
    pub area_id: Option<u64>,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub description: Option<String>,
    /// Comma-separated
    #[serde(default)]
    pub tags: Option<String>,
}

impl Climb {
    /// First ascent date, when the backend sent an ISO date (or datetime)
    pub fn first_ascent_on(&self) -> Option<NaiveDate> {
        self.first_ascent_date.as_deref().and_then(parse_date)
    }

    pub fn first_ascent_year(&self) -> Option<i32> {
        self.first_ascent_on().map(|d| d.year())
    }

    /// Quality rendered as a row of stars
    pub fn stars(&self) -> String {
        "★".repeat(self.quality.unwrap_or(0).min(crate::grades::MAX_QUALITY) as usize)
    }

    pub fn tag_list(&self) -> Vec<String> {
        split_tags(self.tags.as_deref().unwrap_or(""))
    }

    /// Link target of this climb's detail page
    pub fn href(&self) -> String {
        format!("/node/{}", self.id)
    }
}

/// Payload of `POST /climbs/`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewClimb {
    pub name: String,
    #[serde(rename = "type")]
    pub climb_type: ClimbType,
    pub grade: String,
    pub quality: u8,
    pub first_ascensionist: String,
    pub first_ascent_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
}

/// A named crag; `polygon` is WKT in (lon, lat) order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Area {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub polygon: Option<String>,
}

impl Area {
    /// Areas without a boundary hold "independent" climbs
    pub fn is_independent(&self) -> bool {
        self.polygon.as_deref().map(str::trim).is_none_or(str::is_empty)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
}

impl User {
    pub fn href(&self) -> String {
        format!("/profile/{}", self.id)
    }
}

/// An ascent record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Log {
    pub id: u64,
    pub user_id: u64,
    pub climb_id: u64,
    pub date: String,
    #[serde(default)]
    pub grade: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
}

impl Log {
    pub fn logged_on(&self) -> Option<NaiveDate> {
        parse_date(&self.date)
    }
}

/// Payload of `POST /logs/add`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewLog {
    pub climb_id: u64,
    pub date: NaiveDate,
    pub grade: String,
    #[serde(default)]
    pub comment: String,
}

/// `POST /token` response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    /// Lifetime in seconds, when the backend reports one
    #[serde(default)]
    pub expires_in: Option<u64>,
}

/// `POST /upload_kml` response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadReceipt {
    pub filename: String,
}

/// Body of collection and log add/remove calls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClimbRef {
    pub climb_id: u64,
}

/// Accepts `YYYY-MM-DD` optionally followed by a time part
pub(crate) fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let date_part = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

pub(crate) fn split_tags(raw: &str) -> Vec<String> {
    raw.split(',').map(str::trim).filter(|t| !t.is_empty()).map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn climb_json() -> &'static str {
        r#"{
            "id": 7,
            "name": "Lake View Arete",
            "type": "Boulder",
            "grade": "V4",
            "quality": 3,
            "first_ascensionist": "amina",
            "first_ascent_date": "2021-08-14",
            "area": "Mwanza Hills",
            "latitude": -2.5164,
            "longitude": 32.9175,
            "description": null,
            "tags": "arete, highball,"
        }"#
    }

    #[test]
    fn test_climb_decodes_wire_format() {
        let climb: Climb = serde_json::from_str(climb_json()).unwrap();
        assert_eq!(climb.climb_type, ClimbType::Boulder);
        assert_eq!(climb.first_ascent_year(), Some(2021));
        assert_eq!(climb.stars(), "★★★");
        assert_eq!(climb.tag_list(), vec!["arete", "highball"]);
        assert_eq!(climb.href(), "/node/7");
        assert!(climb.area_id.is_none());
    }

    #[test]
    fn test_sparse_climb_decodes() {
        let climb: Climb = serde_json::from_str(
            r#"{"id":1,"name":"x","type":"Trad","latitude":0.0,"longitude":0.0}"#,
        )
        .unwrap();
        assert!(climb.grade.is_none());
        assert_eq!(climb.first_ascent_year(), None);
        assert_eq!(climb.stars(), "");
    }

    #[test]
    fn test_new_climb_serializes_type_field() {
        let new = NewClimb {
            name: "Sunrise".into(),
            climb_type: ClimbType::Sport,
            grade: "6b+".into(),
            quality: 2,
            first_ascensionist: "juma".into(),
            first_ascent_date: NaiveDate::from_ymd_opt(2023, 1, 5).unwrap(),
            area: None,
            latitude: -2.0,
            longitude: 33.0,
            description: None,
            tags: None,
        };
        let value = serde_json::to_value(&new).unwrap();
        assert_eq!(value["type"], "Sport");
        assert_eq!(value["first_ascent_date"], "2023-01-05");
        assert!(value.get("area").is_none());
    }

    #[test]
    fn test_climb_type_parsing() {
        assert_eq!("boulder".parse::<ClimbType>().unwrap(), ClimbType::Boulder);
        assert_eq!(" TRAD ".parse::<ClimbType>().unwrap(), ClimbType::Trad);
        assert!("ice".parse::<ClimbType>().is_err());
    }

    #[test]
    fn test_date_parsing_accepts_datetimes() {
        assert_eq!(parse_date("2020-02-29T10:00:00"), NaiveDate::from_ymd_opt(2020, 2, 29));
        assert_eq!(parse_date("29/02/2020"), None);
    }

    #[test]
    fn test_area_independence() {
        let area = Area { id: 1, name: "Kisesa".into(), polygon: None };
        assert!(area.is_independent());
        let area = Area { id: 2, name: "Bujora".into(), polygon: Some("  ".into()) };
        assert!(area.is_independent());
        let area = Area {
            id: 3,
            name: "Igombe".into(),
            polygon: Some("POLYGON((33 -2, 33.1 -2, 33.1 -2.1, 33 -2))".into()),
        };
        assert!(!area.is_independent());
    }
}
