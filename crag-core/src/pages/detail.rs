//! Climb detail page

use super::{LoadState, UserDirectory};
use crate::api::CatalogApi;
use crate::collections::{CollectionKind, CollectionToggle, ToggleOutcome};
use crate::error::{Error, Result};
use crate::model::{Climb, Log};
use crate::session::Session;

#[derive(Debug, Clone)]
pub struct ClimbDetail {
    pub climb: Climb,
    pub logs: LoadState<Vec<Log>>,
    pub users: LoadState<UserDirectory>,
    /// Idle when nobody is logged in
    pub ticklist: LoadState<CollectionToggle>,
    pub hitlist: LoadState<CollectionToggle>,
}

impl ClimbDetail {
    /// Load the climb plus, concurrently, its logs, the user directory and,
    /// with a session, the climb's ticklist / hitlist membership.
    ///
    /// Only a failure to fetch the climb itself fails the page.
    pub async fn load(api: &dyn CatalogApi, id: u64, session: Option<&Session>) -> Result<Self> {
        let memberships = async {
            match session {
                Some(session) => {
                    let (tick, hit) = futures::join!(
                        CollectionToggle::load(api, session, CollectionKind::Ticklist, id),
                        CollectionToggle::load(api, session, CollectionKind::Hitlist, id),
                    );
                    (LoadState::from_result(tick), LoadState::from_result(hit))
                }
                None => (LoadState::Idle, LoadState::Idle),
            }
        };

        let (climb, logs, users, (ticklist, hitlist)) = futures::join!(
            api.get_climb(id),
            api.climb_logs(id),
            UserDirectory::load(api),
            memberships,
        );

        Ok(Self {
            climb: climb?,
            logs: LoadState::from_result(logs),
            users: LoadState::from_result(users),
            ticklist,
            hitlist,
        })
    }

    pub fn membership(&self, kind: CollectionKind) -> &LoadState<CollectionToggle> {
        match kind {
            CollectionKind::Ticklist => &self.ticklist,
            CollectionKind::Hitlist => &self.hitlist,
        }
    }

    /// Profile link of the first ascensionist, when known
    pub fn first_ascensionist_href(&self) -> Option<String> {
        let username = self.climb.first_ascensionist.as_deref()?;
        self.users.value()?.href_for(username)
    }

    /// Username of a log's author, falling back to the raw id
    pub fn log_author(&self, log: &Log) -> String {
        self.users
            .value()
            .and_then(|d| d.username_of(log.user_id))
            .map(str::to_string)
            .unwrap_or_else(|| format!("user #{}", log.user_id))
    }

    /// Toggle membership of this climb in `kind`
    ///
    /// Fails with [`Error::NotAuthenticated`] when the membership was never
    /// loaded because nobody was logged in.
    pub async fn toggle(
        &mut self,
        api: &dyn CatalogApi,
        session: &Session,
        kind: CollectionKind,
    ) -> Result<ToggleOutcome> {
        let state = match kind {
            CollectionKind::Ticklist => &mut self.ticklist,
            CollectionKind::Hitlist => &mut self.hitlist,
        };

        match state {
            LoadState::Loaded(toggle) => toggle.toggle(api, session).await,
            LoadState::Idle => Err(Error::NotAuthenticated),
            LoadState::Failed(msg) => {
                Err(Error::Transport(format!("{} membership unavailable: {}", kind, msg)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collections::Membership;
    use crate::model::ClimbType;
    use crate::routes::Route;
    use crate::testing::{climb, FakeApi};

    fn api() -> FakeApi {
        let mut boulder = climb(7, "Lake View Arete", ClimbType::Boulder, "V4");
        boulder.first_ascensionist = Some("amina".into());

        FakeApi::new()
            .with_user(3, "amina")
            .with_user(4, "juma")
            .with_climb(boulder)
            .with_log(Log {
                id: 1,
                user_id: 4,
                climb_id: 7,
                date: "2024-02-10".into(),
                grade: Some("V5".into()),
                comment: Some("sandbagged".into()),
            })
            .with_member(CollectionKind::Hitlist, 7)
    }

    #[tokio::test]
    async fn test_anonymous_detail() {
        let api = api();
        let detail = ClimbDetail::load(&api, 7, None).await.unwrap();

        assert_eq!(detail.climb.name, "Lake View Arete");
        assert_eq!(detail.logs.value().map(Vec::len), Some(1));
        assert_eq!(detail.first_ascensionist_href().as_deref(), Some("/profile/3"));
        assert_eq!(detail.log_author(&detail.logs.value().unwrap()[0]), "juma");
        assert_eq!(detail.ticklist, LoadState::Idle);
    }

    #[tokio::test]
    async fn test_logged_in_detail_toggles() {
        let api = api();
        let session = api.session_for("juma");
        let mut detail = ClimbDetail::load(&api, 7, Some(&session)).await.unwrap();

        let hit = detail.membership(CollectionKind::Hitlist).value().unwrap();
        assert_eq!(hit.membership(), Membership::Present);

        let outcome = detail.toggle(&api, &session, CollectionKind::Ticklist).await.unwrap();
        assert_eq!(outcome.redirect, Some(Route::Log(7)));
        assert!(detail.ticklist.value().unwrap().is_member());
    }

    #[tokio::test]
    async fn test_partial_failure_keeps_page() {
        let api = api();
        api.fail_on("climb_logs");
        api.fail_on("list_users");

        let detail = ClimbDetail::load(&api, 7, None).await.unwrap();
        assert!(detail.logs.error().is_some());
        assert_eq!(detail.first_ascensionist_href(), None);
    }

    #[tokio::test]
    async fn test_missing_climb_fails_page() {
        let err = ClimbDetail::load(&api(), 99, None).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_toggle_without_session_state() {
        let api = api();
        let session = api.session_for("juma");
        let mut detail = ClimbDetail::load(&api, 7, None).await.unwrap();

        let err = detail.toggle(&api, &session, CollectionKind::Hitlist).await.unwrap_err();
        assert!(err.requires_login());
        assert!(api.calls().is_empty());
    }
}
