//! Backend REST API
//!
//! [`CatalogApi`] is the seam every page controller talks to. [`ApiClient`]
//! implements it over HTTP; tests swap in an in-memory fake.

mod client;
mod query;

pub use client::ApiClient;
pub use query::ClimbQuery;

use crate::collections::CollectionKind;
use crate::error::Result;
use crate::model::{Area, Climb, Log, NewClimb, NewLog, TokenResponse, UploadReceipt, User};
use crate::session::Session;
use async_trait::async_trait;

/// Operations offered by the catalog backend
///
/// Methods taking a [`Session`] send its bearer token; the rest are public.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    // Climbs
    async fn list_climbs(&self, query: &ClimbQuery) -> Result<Vec<Climb>>;
    async fn get_climb(&self, id: u64) -> Result<Climb>;
    async fn climb_logs(&self, id: u64) -> Result<Vec<Log>>;
    async fn recent_first_ascents(&self, limit: usize) -> Result<Vec<Climb>>;
    async fn create_climb(&self, session: &Session, climb: &NewClimb) -> Result<Climb>;

    // Areas
    async fn list_areas(&self) -> Result<Vec<Area>>;
    /// Multipart upload of a KML geography file
    async fn upload_kml(
        &self,
        session: &Session,
        filename: &str,
        content: Vec<u8>,
    ) -> Result<UploadReceipt>;

    // Users
    async fn list_users(&self, search: Option<&str>) -> Result<Vec<User>>;
    async fn get_user(&self, id: u64) -> Result<User>;
    /// Climbs a user has ticked
    async fn user_ticks(&self, id: u64) -> Result<Vec<Climb>>;
    /// Resolve a raw bearer token to its user
    async fn current_user(&self, token: &str) -> Result<User>;

    // Accounts
    async fn login(&self, username: &str, password: &str) -> Result<TokenResponse>;
    async fn register(&self, username: &str, email: &str, password: &str) -> Result<()>;

    // Ticklist / hitlist
    async fn collection(&self, session: &Session, kind: CollectionKind) -> Result<Vec<Climb>>;
    async fn collection_add(&self, session: &Session, kind: CollectionKind, climb_id: u64)
        -> Result<()>;
    async fn collection_remove(
        &self,
        session: &Session,
        kind: CollectionKind,
        climb_id: u64,
    ) -> Result<()>;

    // Logs
    async fn recent_logs(&self) -> Result<Vec<Log>>;
    async fn recent_big_ticks(&self) -> Result<Vec<Log>>;
    async fn add_log(&self, session: &Session, log: &NewLog) -> Result<()>;
    async fn remove_log(&self, session: &Session, climb_id: u64) -> Result<()>;
}
