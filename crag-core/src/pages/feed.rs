//! Home feed: recent ascents, big ticks and new first ascents

use super::{LoadState, UserDirectory};
use crate::api::CatalogApi;
use crate::model::{Climb, Log};

/// How many recent first ascents the feed shows
pub const FIRST_ASCENT_LIMIT: usize = 10;

#[derive(Debug, Clone)]
pub struct FeedPage {
    pub recent_logs: LoadState<Vec<Log>>,
    pub big_ticks: LoadState<Vec<Log>>,
    pub first_ascents: LoadState<Vec<Climb>>,
    pub users: LoadState<UserDirectory>,
}

impl FeedPage {
    /// Never fails as a whole; each section carries its own outcome
    pub async fn load(api: &dyn CatalogApi, first_ascent_limit: usize) -> Self {
        let (recent_logs, big_ticks, first_ascents, users) = futures::join!(
            api.recent_logs(),
            api.recent_big_ticks(),
            api.recent_first_ascents(first_ascent_limit),
            UserDirectory::load(api),
        );

        Self {
            recent_logs: LoadState::from_result(recent_logs),
            big_ticks: LoadState::from_result(big_ticks),
            first_ascents: LoadState::from_result(first_ascents),
            users: LoadState::from_result(users),
        }
    }

    pub fn author(&self, log: &Log) -> String {
        self.users
            .value()
            .and_then(|d| d.username_of(log.user_id))
            .map(str::to_string)
            .unwrap_or_else(|| format!("user #{}", log.user_id))
    }

    /// Whether every section failed, e.g. because the backend is down
    pub fn is_unavailable(&self) -> bool {
        self.recent_logs.error().is_some()
            && self.big_ticks.error().is_some()
            && self.first_ascents.error().is_some()
    }
}
