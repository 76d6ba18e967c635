use async_trait::async_trait;

use crate::{
    ApiError, CreatedComment, LoginRequest, LoginResponse, PostDetail, PostPage, Profile, User,
};

/// Request/response contract of the remote social API.
///
/// Futures are not `Send`: every implementation runs on a single-threaded
/// executor (the browser event loop, or a current-thread runtime in tests).
#[async_trait(?Send)]
pub trait SocialApi {
    async fn login(&self, credentials: &LoginRequest) -> Result<LoginResponse, ApiError>;

    async fn list_following_posts(&self, page_size: u32, page: u32)
        -> Result<PostPage, ApiError>;
    async fn list_explore_posts(&self) -> Result<PostPage, ApiError>;
    async fn get_post(&self, post_id: &str) -> Result<PostDetail, ApiError>;

    async fn create_comment(&self, post_id: &str, text: &str)
        -> Result<CreatedComment, ApiError>;
    async fn delete_comment(&self, comment_id: &str) -> Result<(), ApiError>;

    async fn like_post(&self, post_id: &str) -> Result<(), ApiError>;
    async fn unlike_post(&self, post_id: &str) -> Result<(), ApiError>;

    async fn get_logged_user(&self) -> Result<Profile, ApiError>;
    async fn get_user_profile(&self, user_id: &str) -> Result<Profile, ApiError>;
    async fn get_posts_by_user(&self, user_id: &str) -> Result<PostPage, ApiError>;
    async fn get_followers(&self, user_id: &str) -> Result<Vec<User>, ApiError>;
    async fn get_following(&self, user_id: &str) -> Result<Vec<User>, ApiError>;
}
