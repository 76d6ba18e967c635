//! Scripted in-memory `SocialApi` used by the unit tests.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use async_trait::async_trait;
use futures::channel::oneshot;

use crate::{
    ApiError, Comment, CreatedComment, LoginRequest, LoginResponse, Post, PostDetail, PostPage,
    Profile, SocialApi, User,
};

pub fn user(id: &str) -> User {
    User {
        id: id.to_string(),
        username: format!("user-{id}"),
        profile_picture_url: None,
    }
}

pub fn post(id: &str, total_likes: u64, is_liked: Option<bool>) -> Post {
    Post {
        id: id.to_string(),
        caption: format!("caption {id}"),
        image_url: None,
        total_likes,
        user: Some(user("author")),
        is_liked,
    }
}

pub fn comment(id: &str, content: &str) -> Comment {
    Comment {
        id: id.to_string(),
        content: content.to_string(),
        user: user("commenter"),
    }
}

pub fn profile(id: &str) -> Profile {
    Profile {
        id: id.to_string(),
        username: format!("user-{id}"),
        name: None,
        email: None,
        profile_picture_url: None,
        phone_number: None,
        bio: Some("hi".to_string()),
        website: None,
        total_following: 1,
        total_followers: 2,
    }
}

#[derive(Default)]
struct Script {
    following: Vec<Post>,
    explore: Vec<Post>,
    comments: HashMap<String, Vec<Comment>>,
    profiles: HashMap<String, Profile>,
    me: Option<String>,
    user_posts: HashMap<String, Vec<Post>>,
    followers: HashMap<String, Vec<User>>,
    followed: HashMap<String, Vec<User>>,
    failing: HashSet<String>,
    gates: HashMap<String, oneshot::Receiver<()>>,
    calls: Vec<String>,
    next_comment: u32,
}

/// Cheap to clone; clones share one script so tests can keep a handle after
/// moving the api into a viewer.
#[derive(Clone, Default)]
pub struct MockApi {
    script: Rc<RefCell<Script>>,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn following(self, posts: Vec<Post>) -> Self {
        self.script.borrow_mut().following = posts;
        self
    }

    pub fn explore(self, posts: Vec<Post>) -> Self {
        self.script.borrow_mut().explore = posts;
        self
    }

    pub fn comments(self, post_id: &str, comments: Vec<Comment>) -> Self {
        self.script
            .borrow_mut()
            .comments
            .insert(post_id.to_string(), comments);
        self
    }

    pub fn profile(self, profile: Profile, posts: Vec<Post>) -> Self {
        let mut script = self.script.borrow_mut();
        script.user_posts.insert(profile.id.clone(), posts);
        script.profiles.insert(profile.id.clone(), profile);
        drop(script);
        self
    }

    pub fn logged_in_as(self, user_id: &str) -> Self {
        self.script.borrow_mut().me = Some(user_id.to_string());
        self
    }

    pub fn follows(self, user_id: &str, followers: Vec<User>, following: Vec<User>) -> Self {
        let mut script = self.script.borrow_mut();
        script.followers.insert(user_id.to_string(), followers);
        script.followed.insert(user_id.to_string(), following);
        drop(script);
        self
    }

    /// Make every call whose key matches fail until `heal` is called.
    pub fn fail(&self, key: &str) {
        self.script.borrow_mut().failing.insert(key.to_string());
    }

    /// Park the next call with this key until the returned sender fires or
    /// is dropped. Later calls with the same key are not held.
    pub fn hold(&self, key: &str) -> oneshot::Sender<()> {
        let (release, gate) = oneshot::channel();
        self.script.borrow_mut().gates.insert(key.to_string(), gate);
        release
    }

    pub fn set_following(&self, posts: Vec<Post>) {
        self.script.borrow_mut().following = posts;
    }

    pub fn heal(&self, key: &str) {
        self.script.borrow_mut().failing.remove(key);
    }

    pub fn calls(&self) -> Vec<String> {
        self.script.borrow().calls.clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.script
            .borrow()
            .calls
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }

    async fn record(&self, key: String) -> Result<(), ApiError> {
        let gate = {
            let mut script = self.script.borrow_mut();
            script.calls.push(key.clone());
            script.gates.remove(&key)
        };
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        if self.script.borrow().failing.contains(&key) {
            Err(ApiError::Rejected(format!("{key} failed")))
        } else {
            Ok(())
        }
    }
}

#[async_trait(?Send)]
impl SocialApi for MockApi {
    async fn login(&self, credentials: &LoginRequest) -> Result<LoginResponse, ApiError> {
        self.record(format!("login:{}", credentials.email)).await?;
        Ok(LoginResponse {
            token: format!("token-for-{}", credentials.email),
            user: None,
        })
    }

    async fn list_following_posts(
        &self,
        page_size: u32,
        page: u32,
    ) -> Result<PostPage, ApiError> {
        self.record(format!("list_following:{page_size}:{page}")).await?;
        Ok(self.script.borrow().following.clone().into())
    }

    async fn list_explore_posts(&self) -> Result<PostPage, ApiError> {
        self.record("list_explore".to_string()).await?;
        Ok(self.script.borrow().explore.clone().into())
    }

    async fn get_post(&self, post_id: &str) -> Result<PostDetail, ApiError> {
        self.record(format!("get_post:{post_id}")).await?;
        let script = self.script.borrow();
        let post = script
            .following
            .iter()
            .chain(script.explore.iter())
            .find(|p| p.id == post_id)
            .cloned()
            .ok_or_else(|| ApiError::Rejected("Post not found".to_string()))?;
        Ok(PostDetail {
            post,
            comments: script.comments.get(post_id).cloned().unwrap_or_default(),
        })
    }

    async fn create_comment(&self, post_id: &str, text: &str) -> Result<CreatedComment, ApiError> {
        self.record(format!("create_comment:{post_id}:{text}")).await?;
        let mut script = self.script.borrow_mut();
        script.next_comment += 1;
        Ok(CreatedComment {
            comment_id: format!("new-{}", script.next_comment),
            user: user("me"),
        })
    }

    async fn delete_comment(&self, comment_id: &str) -> Result<(), ApiError> {
        self.record(format!("delete_comment:{comment_id}")).await
    }

    async fn like_post(&self, post_id: &str) -> Result<(), ApiError> {
        self.record(format!("like:{post_id}")).await
    }

    async fn unlike_post(&self, post_id: &str) -> Result<(), ApiError> {
        self.record(format!("unlike:{post_id}")).await
    }

    async fn get_logged_user(&self) -> Result<Profile, ApiError> {
        self.record("me".to_string()).await?;
        let script = self.script.borrow();
        script
            .me
            .as_ref()
            .and_then(|id| script.profiles.get(id))
            .cloned()
            .ok_or_else(|| ApiError::status(401, None))
    }

    async fn get_user_profile(&self, user_id: &str) -> Result<Profile, ApiError> {
        self.record(format!("profile:{user_id}")).await?;
        self.script
            .borrow()
            .profiles
            .get(user_id)
            .cloned()
            .ok_or_else(|| ApiError::Rejected("User not found".to_string()))
    }

    async fn get_posts_by_user(&self, user_id: &str) -> Result<PostPage, ApiError> {
        self.record(format!("user_posts:{user_id}")).await?;
        let posts = self
            .script
            .borrow()
            .user_posts
            .get(user_id)
            .cloned()
            .unwrap_or_default();
        Ok(posts.into())
    }

    async fn get_followers(&self, user_id: &str) -> Result<Vec<User>, ApiError> {
        self.record(format!("followers:{user_id}")).await?;
        Ok(self
            .script
            .borrow()
            .followers
            .get(user_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn get_following(&self, user_id: &str) -> Result<Vec<User>, ApiError> {
        self.record(format!("following:{user_id}")).await?;
        Ok(self
            .script
            .borrow()
            .followed
            .get(user_id)
            .cloned()
            .unwrap_or_default())
    }
}
