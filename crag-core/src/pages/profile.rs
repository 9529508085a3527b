//! User profile page and username reconciliation
//!
//! Climb records name their first ascensionist by username while profile
//! links use numeric ids; [`UserDirectory`] maps between the two.

use super::LoadState;
use crate::api::{CatalogApi, ClimbQuery};
use crate::error::{Error, Result};
use crate::model::{Climb, User};
use crate::routes::Route;
use std::collections::HashMap;

/// Username ⇄ id lookup built from `GET /users/`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserDirectory {
    by_name: HashMap<String, u64>,
    by_id: HashMap<u64, String>,
}

impl UserDirectory {
    pub fn new(users: &[User]) -> Self {
        let mut directory = Self::default();
        for user in users {
            directory.by_name.insert(user.username.to_lowercase(), user.id);
            directory.by_id.insert(user.id, user.username.clone());
        }
        directory
    }

    pub async fn load(api: &dyn CatalogApi) -> Result<Self> {
        Ok(Self::new(&api.list_users(None).await?))
    }

    /// Usernames match case-insensitively
    pub fn id_of(&self, username: &str) -> Option<u64> {
        self.by_name.get(&username.trim().to_lowercase()).copied()
    }

    pub fn username_of(&self, id: u64) -> Option<&str> {
        self.by_id.get(&id).map(String::as_str)
    }

    /// Profile link for a username, when the user is known
    pub fn href_for(&self, username: &str) -> Option<String> {
        self.id_of(username).map(|id| Route::Profile(id).path())
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProfileTab {
    #[default]
    Ticks,
    FirstAscents,
}

impl ProfileTab {
    pub fn title(&self) -> &'static str {
        match self {
            ProfileTab::Ticks => "Ticks",
            ProfileTab::FirstAscents => "First Ascents",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProfilePage {
    pub user: User,
    pub ticks: LoadState<Vec<Climb>>,
    pub first_ascents: LoadState<Vec<Climb>>,
    pub active_tab: ProfileTab,
}

impl ProfilePage {
    /// Load by numeric id or by username
    pub async fn load(api: &dyn CatalogApi, user_ref: &str) -> Result<Self> {
        let user = resolve_user(api, user_ref).await?;

        let first_ascents_query = ClimbQuery::first_ascents_by(user.username.clone());
        let (ticks, first_ascents) =
            futures::join!(api.user_ticks(user.id), api.list_climbs(&first_ascents_query));

        Ok(Self {
            user,
            ticks: LoadState::from_result(ticks),
            first_ascents: LoadState::from_result(first_ascents),
            active_tab: ProfileTab::default(),
        })
    }

    pub fn select_tab(&mut self, tab: ProfileTab) {
        self.active_tab = tab;
    }

    /// Climbs of the active tab
    pub fn active(&self) -> &LoadState<Vec<Climb>> {
        match self.active_tab {
            ProfileTab::Ticks => &self.ticks,
            ProfileTab::FirstAscents => &self.first_ascents,
        }
    }
}

async fn resolve_user(api: &dyn CatalogApi, user_ref: &str) -> Result<User> {
    let user_ref = user_ref.trim();
    if let Ok(id) = user_ref.parse::<u64>() {
        return api.get_user(id).await;
    }

    let candidates = api.list_users(Some(user_ref)).await?;
    candidates
        .into_iter()
        .find(|u| u.username.eq_ignore_ascii_case(user_ref))
        .ok_or_else(|| Error::NotFound(format!("No user named {}", user_ref)))
}
