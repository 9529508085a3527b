//! In-memory `CatalogApi` used by unit tests

use crate::api::{CatalogApi, ClimbQuery};
use crate::collections::CollectionKind;
use crate::error::{Error, Result};
use crate::model::{
    Area, Climb, ClimbType, Log, NewClimb, NewLog, TokenResponse, UploadReceipt, User,
};
use crate::session::Session;
use async_trait::async_trait;
use chrono::Duration;
use reqwest::StatusCode;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

pub const PASSWORD: &str = "secret";

pub fn climb(id: u64, name: &str, climb_type: ClimbType, grade: &str) -> Climb {
    Climb {
        id,
        name: name.to_string(),
        climb_type,
        grade: Some(grade.to_string()),
        quality: Some(2),
        first_ascensionist: None,
        first_ascent_date: None,
        area: None,
        area_id: None,
        latitude: -2.5 - id as f64 * 0.01,
        longitude: 32.9 + id as f64 * 0.01,
        description: None,
        tags: None,
    }
}

/// Records writes as `"<endpoint> <climb id>"` and list queries verbatim
#[derive(Default)]
pub struct FakeApi {
    users: Vec<User>,
    climbs: Mutex<Vec<Climb>>,
    areas: Vec<Area>,
    logs: Mutex<Vec<Log>>,
    members: Mutex<HashMap<CollectionKind, Vec<u64>>>,
    failing: Mutex<HashSet<String>>,
    calls: Mutex<Vec<String>>,
    queries: Mutex<Vec<ClimbQuery>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, id: u64, username: &str) -> Self {
        self.users.push(User {
            id,
            username: username.to_string(),
            email: Some(format!("{}@example.org", username)),
        });
        self
    }

    pub fn with_climb(self, climb: Climb) -> Self {
        self.climbs.lock().unwrap().push(climb);
        self
    }

    /// `count` climbs of one type with ids starting at 1
    pub fn with_climbs(self, count: u64, climb_type: ClimbType, grade: &str) -> Self {
        {
            let mut climbs = self.climbs.lock().unwrap();
            for id in 1..=count {
                climbs.push(climb(id, &format!("Route {}", id), climb_type, grade));
            }
        }
        self
    }

    pub fn with_area(mut self, area: Area) -> Self {
        self.areas.push(area);
        self
    }

    pub fn with_log(self, log: Log) -> Self {
        self.logs.lock().unwrap().push(log);
        self
    }

    pub fn with_member(self, kind: CollectionKind, climb_id: u64) -> Self {
        self.members.lock().unwrap().entry(kind).or_default().push(climb_id);
        self
    }

    /// Make the named trait method fail with a 503
    pub fn fail_on(&self, op: &str) {
        self.failing.lock().unwrap().insert(op.to_string());
    }

    pub fn recover(&self, op: &str) {
        self.failing.lock().unwrap().remove(op);
    }

    pub fn session_for(&self, username: &str) -> Session {
        let user = self.users.iter().find(|u| u.username == username).expect("unknown user");
        Session::new(token_for(username), user, Duration::hours(1))
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn queries(&self) -> Vec<ClimbQuery> {
        self.queries.lock().unwrap().clone()
    }

    pub fn members(&self, kind: CollectionKind) -> Vec<u64> {
        self.members.lock().unwrap().get(&kind).cloned().unwrap_or_default()
    }

    fn check(&self, op: &str) -> Result<()> {
        if self.failing.lock().unwrap().contains(op) {
            Err(Error::from_status(StatusCode::SERVICE_UNAVAILABLE, ""))
        } else {
            Ok(())
        }
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn user_by_token(&self, token: &str) -> Result<&User> {
        self.users
            .iter()
            .find(|u| token_for(&u.username) == token)
            .ok_or_else(|| Error::Unauthorized("Invalid token".to_string()))
    }

    fn authorize(&self, session: &Session) -> Result<()> {
        self.user_by_token(session.bearer()).map(|_| ())
    }
}

fn token_for(username: &str) -> String {
    format!("token-{}", username)
}

#[async_trait]
impl CatalogApi for FakeApi {
    async fn list_climbs(&self, query: &ClimbQuery) -> Result<Vec<Climb>> {
        self.check("list_climbs")?;
        self.queries.lock().unwrap().push(query.clone());

        let climbs = self.climbs.lock().unwrap();
        let matching = climbs
            .iter()
            .filter(|c| query.climb_type.map_or(true, |t| c.climb_type == t))
            .filter(|c| {
                query.grades.is_empty()
                    || c.grade.as_ref().is_some_and(|g| query.grades.contains(g))
            })
            .filter(|c| {
                query.areas.is_empty() || c.area.as_ref().is_some_and(|a| query.areas.contains(a))
            })
            .filter(|c| {
                query.first_ascensionist.is_none() || c.first_ascensionist == query.first_ascensionist
            })
            .skip(query.skip);

        Ok(if query.limit > 0 {
            matching.take(query.limit).cloned().collect()
        } else {
            matching.cloned().collect()
        })
    }

    async fn get_climb(&self, id: u64) -> Result<Climb> {
        self.check("get_climb")?;
        self.climbs
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| Error::NotFound("Climb not found".to_string()))
    }

    async fn climb_logs(&self, id: u64) -> Result<Vec<Log>> {
        self.check("climb_logs")?;
        Ok(self.logs.lock().unwrap().iter().filter(|l| l.climb_id == id).cloned().collect())
    }

    async fn recent_first_ascents(&self, limit: usize) -> Result<Vec<Climb>> {
        self.check("recent_first_ascents")?;
        let climbs = self.climbs.lock().unwrap();
        Ok(climbs.iter().filter(|c| c.first_ascensionist.is_some()).take(limit).cloned().collect())
    }

    async fn create_climb(&self, session: &Session, climb: &NewClimb) -> Result<Climb> {
        self.check("create_climb")?;
        self.authorize(session)?;

        let mut climbs = self.climbs.lock().unwrap();
        let id = climbs.iter().map(|c| c.id).max().unwrap_or(0) + 1;
        let created = Climb {
            id,
            name: climb.name.clone(),
            climb_type: climb.climb_type,
            grade: Some(climb.grade.clone()),
            quality: Some(climb.quality),
            first_ascensionist: Some(climb.first_ascensionist.clone()),
            first_ascent_date: Some(climb.first_ascent_date.to_string()),
            area: climb.area.clone(),
            area_id: None,
            latitude: climb.latitude,
            longitude: climb.longitude,
            description: climb.description.clone(),
            tags: climb.tags.clone(),
        };
        climbs.push(created.clone());
        self.record(format!("climbs/create {}", id));
        Ok(created)
    }

    async fn list_areas(&self) -> Result<Vec<Area>> {
        self.check("list_areas")?;
        Ok(self.areas.clone())
    }

    async fn upload_kml(
        &self,
        session: &Session,
        filename: &str,
        _content: Vec<u8>,
    ) -> Result<UploadReceipt> {
        self.check("upload_kml")?;
        self.authorize(session)?;
        self.record(format!("upload_kml {}", filename));
        Ok(UploadReceipt { filename: filename.to_string() })
    }

    async fn list_users(&self, search: Option<&str>) -> Result<Vec<User>> {
        self.check("list_users")?;
        Ok(self
            .users
            .iter()
            .filter(|u| search.map_or(true, |s| u.username.contains(s)))
            .cloned()
            .collect())
    }

    async fn get_user(&self, id: u64) -> Result<User> {
        self.check("get_user")?;
        self.users
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or_else(|| Error::NotFound("User not found".to_string()))
    }

    async fn user_ticks(&self, id: u64) -> Result<Vec<Climb>> {
        self.check("user_ticks")?;
        let ticked: Vec<u64> = self
            .logs
            .lock()
            .unwrap()
            .iter()
            .filter(|l| l.user_id == id)
            .map(|l| l.climb_id)
            .collect();
        let climbs = self.climbs.lock().unwrap();
        Ok(climbs.iter().filter(|c| ticked.contains(&c.id)).cloned().collect())
    }

    async fn current_user(&self, token: &str) -> Result<User> {
        self.check("current_user")?;
        self.user_by_token(token).cloned()
    }

    async fn login(&self, username: &str, password: &str) -> Result<TokenResponse> {
        self.check("login")?;
        if password != PASSWORD || !self.users.iter().any(|u| u.username == username) {
            return Err(Error::Unauthorized("Incorrect username or password".to_string()));
        }
        Ok(TokenResponse {
            access_token: token_for(username),
            token_type: Some("bearer".to_string()),
            expires_in: None,
        })
    }

    async fn register(&self, username: &str, _email: &str, _password: &str) -> Result<()> {
        self.check("register")?;
        if self.users.iter().any(|u| u.username == username) {
            return Err(Error::from_status(
                StatusCode::BAD_REQUEST,
                r#"{"detail":"Username already registered"}"#,
            ));
        }
        self.record(format!("register {}", username));
        Ok(())
    }

    async fn collection(&self, session: &Session, kind: CollectionKind) -> Result<Vec<Climb>> {
        self.check("collection")?;
        self.authorize(session)?;
        let ids = self.members(kind);
        let climbs = self.climbs.lock().unwrap();
        Ok(climbs.iter().filter(|c| ids.contains(&c.id)).cloned().collect())
    }

    async fn collection_add(
        &self,
        session: &Session,
        kind: CollectionKind,
        climb_id: u64,
    ) -> Result<()> {
        self.check("collection_add")?;
        self.authorize(session)?;
        self.members.lock().unwrap().entry(kind).or_default().push(climb_id);
        self.record(format!("{}/add {}", kind.path(), climb_id));
        Ok(())
    }

    async fn collection_remove(
        &self,
        session: &Session,
        kind: CollectionKind,
        climb_id: u64,
    ) -> Result<()> {
        self.check("collection_remove")?;
        self.authorize(session)?;
        self.members.lock().unwrap().entry(kind).or_default().retain(|id| *id != climb_id);
        self.record(format!("{}/remove {}", kind.path(), climb_id));
        Ok(())
    }

    async fn recent_logs(&self) -> Result<Vec<Log>> {
        self.check("recent_logs")?;
        Ok(self.logs.lock().unwrap().clone())
    }

    async fn recent_big_ticks(&self) -> Result<Vec<Log>> {
        self.check("recent_big_ticks")?;
        let logs = self.logs.lock().unwrap();
        Ok(logs.iter().filter(|l| l.comment.is_some()).cloned().collect())
    }

    async fn add_log(&self, session: &Session, log: &NewLog) -> Result<()> {
        self.check("add_log")?;
        let user = self.user_by_token(session.bearer())?;
        let mut logs = self.logs.lock().unwrap();
        let id = logs.len() as u64 + 1;
        logs.push(Log {
            id,
            user_id: user.id,
            climb_id: log.climb_id,
            date: log.date.to_string(),
            grade: Some(log.grade.clone()),
            comment: Some(log.comment.clone()),
        });
        self.record(format!("logs/add {}", log.climb_id));
        Ok(())
    }

    async fn remove_log(&self, session: &Session, climb_id: u64) -> Result<()> {
        self.check("remove_log")?;
        let user_id = self.user_by_token(session.bearer())?.id;
        self.logs.lock().unwrap().retain(|l| !(l.climb_id == climb_id && l.user_id == user_id));
        self.record(format!("logs/remove {}", climb_id));
        Ok(())
    }
}
