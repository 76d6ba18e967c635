use tracing::warn;

use crate::{ApiError, PostDetail, SocialApi, StateCell};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PostDetailState {
    pub post: Option<PostDetail>,
    pub loading: bool,
    pub error: Option<String>,
}

/// Single post page with its comments. Nothing here mutates the post.
#[derive(Debug, Clone)]
pub struct PostDetailViewer<A, S> {
    api: A,
    state: S,
}

impl<A, S> PostDetailViewer<A, S>
where
    A: SocialApi,
    S: StateCell<PostDetailState>,
{
    pub fn new(api: A, state: S) -> Self {
        Self { api, state }
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    pub async fn load(&self, post_id: &str) -> Result<(), ApiError> {
        if post_id.is_empty() {
            return Ok(());
        }
        self.state.update(|s| {
            s.loading = true;
            s.post = None;
            s.error = None;
        });

        let result = self.api.get_post(post_id).await;
        match result {
            Ok(detail) => {
                self.state.update(|s| {
                    s.post = Some(detail);
                    s.loading = false;
                    s.error = None;
                });
                Ok(())
            }
            Err(err) => {
                warn!(post_id, error = %err, "post fetch failed");
                let message = match &err {
                    ApiError::Rejected(_) | ApiError::MissingData => "Post not found",
                    _ => "An error occurred while fetching the post.",
                };
                self.state.update(|s| {
                    s.loading = false;
                    s.error = Some(message.to_string());
                });
                Err(err)
            }
        }
    }
}
