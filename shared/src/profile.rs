use futures::future::try_join;
use tracing::{debug, warn};

use crate::{ApiError, Post, Profile, SocialApi, StateCell, User};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileTarget {
    /// Whoever the stored token belongs to.
    Me,
    User(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowList {
    Followers,
    Following,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProfileState {
    pub profile: Option<Profile>,
    pub posts: Vec<Post>,
    pub followers: Vec<User>,
    pub following: Vec<User>,
    /// Popup currently shown, if any.
    pub open: Option<FollowList>,
    pub error: Option<String>,
}

impl ProfileState {
    pub fn open_users(&self) -> Option<&[User]> {
        match self.open? {
            FollowList::Followers => Some(&self.followers),
            FollowList::Following => Some(&self.following),
        }
    }
}

/// Read-only profile page: one profile, its posts, and follow lists on demand.
#[derive(Debug, Clone)]
pub struct ProfileViewer<A, S> {
    api: A,
    state: S,
}

impl<A, S> ProfileViewer<A, S>
where
    A: SocialApi,
    S: StateCell<ProfileState>,
{
    pub fn new(api: A, state: S) -> Self {
        Self { api, state }
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    pub async fn load(&self, target: &ProfileTarget) -> Result<(), ApiError> {
        debug!(?target, "loading profile");
        let result = match target {
            ProfileTarget::Me => self.load_me().await,
            ProfileTarget::User(id) => {
                try_join(self.api.get_user_profile(id), self.api.get_posts_by_user(id))
                    .await
                    .map(|(profile, page)| (profile, page.posts))
            }
        };

        match result {
            Ok((profile, posts)) => {
                self.state.update(|s| {
                    s.profile = Some(profile);
                    s.posts = posts;
                    s.error = None;
                });
                Ok(())
            }
            Err(err) => {
                warn!(?target, error = %err, "profile load failed");
                let message = err.message_or("Error fetching data");
                self.state.update(|s| s.error = Some(message));
                Err(err)
            }
        }
    }

    async fn load_me(&self) -> Result<(Profile, Vec<Post>), ApiError> {
        let profile = self.api.get_logged_user().await?;
        // Shown even if the posts fetch below fails.
        self.state.update(|s| s.profile = Some(profile.clone()));
        let page = self.api.get_posts_by_user(&profile.id).await?;
        Ok((profile, page.posts))
    }

    /// Fetch one follow list for the loaded profile and show it.
    pub async fn open(&self, list: FollowList) -> Result<(), ApiError> {
        let Some(user_id) = self
            .state
            .read(|s| s.profile.as_ref().map(|p| p.id.clone()))
            .flatten()
        else {
            return Ok(());
        };

        let result = match list {
            FollowList::Followers => self.api.get_followers(&user_id).await,
            FollowList::Following => self.api.get_following(&user_id).await,
        };

        match result {
            Ok(users) => {
                self.state.update(|s| {
                    match list {
                        FollowList::Followers => s.followers = users,
                        FollowList::Following => s.following = users,
                    }
                    s.open = Some(list);
                });
                Ok(())
            }
            Err(err) => {
                warn!(user_id = %user_id, ?list, error = %err, "follow list fetch failed");
                let fallback = match list {
                    FollowList::Followers => "Error fetching followers",
                    FollowList::Following => "Error fetching following",
                };
                let message = err.message_or(fallback);
                self.state.update(|s| s.error = Some(message));
                Err(err)
            }
        }
    }

    pub fn close(&self) {
        self.state.update(|s| s.open = None);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::testing::{post, profile, user, MockApi};

    fn viewer(api: &MockApi) -> ProfileViewer<MockApi, Rc<RefCell<ProfileState>>> {
        ProfileViewer::new(api.clone(), Rc::default())
    }

    #[tokio::test]
    async fn loads_other_user_with_posts() {
        let api = MockApi::new().profile(profile("u7"), vec![post("p1", 0, None)]);
        let view = viewer(&api);

        view.load(&ProfileTarget::User("u7".to_string())).await.unwrap();
        let state = view.state().borrow().clone();
        assert_eq!(state.profile.unwrap().id, "u7");
        assert_eq!(state.posts.len(), 1);
        assert_eq!(state.error, None);
    }

    #[tokio::test]
    async fn loads_logged_in_user() {
        let api = MockApi::new()
            .profile(profile("me"), vec![post("p1", 0, None), post("p2", 0, None)])
            .logged_in_as("me");
        let view = viewer(&api);

        view.load(&ProfileTarget::Me).await.unwrap();
        assert_eq!(view.state().borrow().posts.len(), 2);
        assert_eq!(api.calls(), ["me", "user_posts:me"]);
    }

    #[tokio::test]
    async fn own_profile_survives_failed_posts_fetch() {
        let api = MockApi::new()
            .profile(profile("me"), vec![post("p1", 0, None)])
            .logged_in_as("me");
        api.fail("user_posts:me");
        let view = viewer(&api);

        assert!(view.load(&ProfileTarget::Me).await.is_err());
        let state = view.state().borrow().clone();
        assert_eq!(state.profile.unwrap().id, "me");
        assert!(state.posts.is_empty());
        assert_eq!(state.error.as_deref(), Some("user_posts:me failed"));
    }

    #[tokio::test]
    async fn failure_sets_error() {
        let api = MockApi::new();
        let view = viewer(&api);

        assert!(view.load(&ProfileTarget::Me).await.is_err());
        let state = view.state().borrow().clone();
        assert!(state.profile.is_none());
        assert_eq!(state.error.as_deref(), Some("API error: 401"));
    }

    #[tokio::test]
    async fn open_before_load_is_a_no_op() {
        let api = MockApi::new();
        let view = viewer(&api);

        view.open(FollowList::Followers).await.unwrap();
        assert!(api.calls().is_empty());
        assert_eq!(view.state().borrow().open, None);
    }

    #[tokio::test]
    async fn opens_and_closes_follow_lists() {
        let api = MockApi::new()
            .profile(profile("u7"), vec![])
            .follows("u7", vec![user("f1"), user("f2")], vec![user("g1")]);
        let view = viewer(&api);
        view.load(&ProfileTarget::User("u7".to_string())).await.unwrap();

        view.open(FollowList::Followers).await.unwrap();
        assert_eq!(view.state().borrow().open_users().map(<[User]>::len), Some(2));

        view.open(FollowList::Following).await.unwrap();
        {
            let state = view.state().borrow();
            assert_eq!(state.open, Some(FollowList::Following));
            assert_eq!(state.open_users().unwrap()[0].id, "g1");
        }

        view.close();
        assert_eq!(view.state().borrow().open_users(), None);
    }

    #[tokio::test]
    async fn follow_list_failure_sets_error() {
        let api = MockApi::new().profile(profile("u7"), vec![]);
        api.fail("followers:u7");
        let view = viewer(&api);
        view.load(&ProfileTarget::User("u7".to_string())).await.unwrap();

        assert!(view.open(FollowList::Followers).await.is_err());
        let state = view.state().borrow().clone();
        assert_eq!(state.open, None);
        assert_eq!(state.error.as_deref(), Some("followers:u7 failed"));
    }
}
