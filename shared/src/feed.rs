//! Feed view-state synchronization.
//!
//! A feed is fetched in one go (base list, then every post's comments in
//! parallel), and afterwards patched in place by user actions. Local
//! mutations are applied only once the server has confirmed the call. The
//! next full load throws all of that away and starts from the server's list
//! again.

use std::collections::{HashMap, HashSet};

use futures::future::try_join_all;
use tracing::{debug, warn};

use crate::{
    Action, ApiError, Comment, FeedError, Post, SocialApi, StateCell, User, HOME_PAGE_SIZE,
};

/// Where a feed gets its base list of posts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedSource {
    /// Posts by accounts the user follows, one page of it.
    Following { page_size: u32, page: u32 },
    /// Every post.
    Explore,
}

impl FeedSource {
    pub const fn home() -> Self {
        FeedSource::Following {
            page_size: HOME_PAGE_SIZE,
            page: 1,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            FeedSource::Following { .. } => "Feeds.",
            FeedSource::Explore => "Explore",
        }
    }

    pub async fn fetch<A>(&self, api: &A) -> Result<Vec<Post>, ApiError>
    where
        A: SocialApi + ?Sized,
    {
        let page = match *self {
            FeedSource::Following { page_size, page } => {
                api.list_following_posts(page_size, page).await?
            }
            FeedSource::Explore => api.list_explore_posts().await?,
        };
        Ok(page.posts)
    }
}

/// UI-facing post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostView {
    pub id: String,
    pub caption: String,
    pub image_url: Option<String>,
    pub total_likes: u64,
    pub user: Option<User>,
    pub is_liked: bool,
    pub comments: Vec<Comment>,
    pub show_comment_input: bool,
}

impl PostView {
    pub fn new(post: Post, comments: Vec<Comment>) -> Self {
        Self {
            id: post.id,
            caption: post.caption,
            image_url: post.image_url,
            total_likes: post.total_likes,
            user: post.user,
            is_liked: post.is_liked.unwrap_or(false),
            comments,
            show_comment_input: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reaction {
    Like,
    Unlike,
}

impl Reaction {
    fn action(self) -> Action {
        match self {
            Reaction::Like => Action::Like,
            Reaction::Unlike => Action::Unlike,
        }
    }
}

/// Everything a feed renderer reads. Every mutation addresses posts by id.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FeedState {
    phase: Phase,
    posts: Vec<PostView>,
    drafts: HashMap<String, String>,
    error: Option<String>,
    generation: u64,
    reacting: HashSet<String>,
}

impl FeedState {
    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    pub fn posts(&self) -> &[PostView] {
        &self.posts
    }

    pub fn post(&self, post_id: &str) -> Option<&PostView> {
        self.posts.iter().find(|p| p.id == post_id)
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn draft(&self, post_id: &str) -> &str {
        self.drafts.get(post_id).map(String::as_str).unwrap_or("")
    }

    /// Enter `Loading` and hand out the generation the result must carry.
    pub fn begin_load(&mut self) -> u64 {
        self.generation += 1;
        self.phase = Phase::Loading;
        self.generation
    }

    /// Replace the whole list. Returns false if a newer load has started.
    pub fn commit_load(&mut self, generation: u64, posts: Vec<PostView>) -> bool {
        if generation != self.generation {
            return false;
        }
        self.posts = posts;
        self.phase = Phase::Ready;
        self.error = None;
        true
    }

    /// Mark the load failed, leaving the previous list in place.
    pub fn fail_load(&mut self, generation: u64, message: String) -> bool {
        if generation != self.generation {
            return false;
        }
        self.phase = Phase::Failed;
        self.error = Some(message);
        true
    }

    pub fn record_error(&mut self, message: String) {
        self.error = Some(message);
    }

    /// Claim the reaction slot for a post; false if one is already in flight.
    pub fn claim_reaction(&mut self, post_id: &str) -> bool {
        self.reacting.insert(post_id.to_string())
    }

    pub fn release_reaction(&mut self, post_id: &str) {
        self.reacting.remove(post_id);
    }

    pub fn apply_reaction(&mut self, post_id: &str, reaction: Reaction) {
        if let Some(post) = self.post_mut(post_id) {
            match reaction {
                Reaction::Like => {
                    post.total_likes += 1;
                    post.is_liked = true;
                }
                Reaction::Unlike => {
                    post.total_likes = post.total_likes.saturating_sub(1);
                    post.is_liked = false;
                }
            }
        }
    }

    pub fn append_comment(&mut self, post_id: &str, comment: Comment) {
        if let Some(post) = self.post_mut(post_id) {
            post.comments.push(comment);
        }
    }

    /// Drop the comment from every post held, not only its owner.
    pub fn remove_comment(&mut self, comment_id: &str) {
        for post in &mut self.posts {
            post.comments.retain(|c| c.id != comment_id);
        }
    }

    pub fn toggle_comment_input(&mut self, post_id: &str) {
        if let Some(post) = self.post_mut(post_id) {
            post.show_comment_input = !post.show_comment_input;
        }
    }

    pub fn set_draft(&mut self, post_id: &str, text: String) {
        self.drafts.insert(post_id.to_string(), text);
    }

    pub fn clear_draft(&mut self, post_id: &str) {
        self.drafts.remove(post_id);
    }

    fn post_mut(&mut self, post_id: &str) -> Option<&mut PostView> {
        self.posts.iter_mut().find(|p| p.id == post_id)
    }
}

/// Drives one feed: full loads from its source and confirmed mutations.
///
/// The same type backs both the home and the explore screen; only the
/// `FeedSource` differs.
#[derive(Debug, Clone)]
pub struct FeedSynchronizer<A, S> {
    api: A,
    source: FeedSource,
    state: S,
}

impl<A, S> FeedSynchronizer<A, S>
where
    A: SocialApi,
    S: StateCell<FeedState>,
{
    pub fn new(api: A, source: FeedSource, state: S) -> Self {
        Self { api, source, state }
    }

    pub fn source(&self) -> FeedSource {
        self.source
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    /// Fetch the base list and every post's comments, then replace the list.
    ///
    /// Nothing is committed unless every enrichment fetch succeeds.
    pub async fn load(&self) -> Result<(), FeedError> {
        let Some(generation) = self.state.update(FeedState::begin_load) else {
            return Ok(());
        };
        debug!(source = ?self.source, generation, "loading feed");

        match self.fetch_enriched().await {
            Ok(posts) => {
                let count = posts.len();
                let committed = self.state.update(|s| s.commit_load(generation, posts));
                if committed == Some(false) {
                    debug!(generation, "discarding superseded feed load");
                } else {
                    debug!(generation, count, "feed loaded");
                }
                Ok(())
            }
            Err(err) => {
                warn!(source = ?self.source, error = %err, "feed load failed");
                let err = FeedError::fetch(&err);
                let message = err.to_string();
                self.state.update(|s| s.fail_load(generation, message));
                Err(err)
            }
        }
    }

    async fn fetch_enriched(&self) -> Result<Vec<PostView>, ApiError> {
        let posts = self.source.fetch(&self.api).await?;
        let api = &self.api;
        try_join_all(posts.into_iter().map(|post| async move {
            let detail = api.get_post(&post.id).await?;
            Ok::<_, ApiError>(PostView::new(post, detail.comments))
        }))
        .await
    }

    pub async fn like(&self, post_id: &str) -> Result<(), FeedError> {
        self.react(post_id, Reaction::Like).await
    }

    pub async fn unlike(&self, post_id: &str) -> Result<(), FeedError> {
        self.react(post_id, Reaction::Unlike).await
    }

    async fn react(&self, post_id: &str, reaction: Reaction) -> Result<(), FeedError> {
        if self.state.update(|s| s.claim_reaction(post_id)) != Some(true) {
            debug!(post_id, ?reaction, "reaction already in flight, ignoring");
            return Ok(());
        }

        let result = match reaction {
            Reaction::Like => self.api.like_post(post_id).await,
            Reaction::Unlike => self.api.unlike_post(post_id).await,
        };

        match result {
            Ok(()) => {
                self.state.update(|s| {
                    s.release_reaction(post_id);
                    s.apply_reaction(post_id, reaction);
                });
                Ok(())
            }
            Err(err) => {
                warn!(post_id, ?reaction, error = %err, "reaction failed");
                let err = FeedError::action(reaction.action(), &err);
                let message = err.to_string();
                self.state.update(|s| {
                    s.release_reaction(post_id);
                    s.record_error(message);
                });
                Err(err)
            }
        }
    }

    /// Post a comment. Absent or empty text is ignored without a call.
    pub async fn submit_comment(&self, post_id: &str, text: Option<&str>) -> Result<(), FeedError> {
        let Some(text) = text.filter(|t| !t.is_empty()) else {
            debug!(post_id, "empty comment, nothing to submit");
            return Ok(());
        };

        match self.api.create_comment(post_id, text).await {
            Ok(created) => {
                let comment = Comment {
                    id: created.comment_id,
                    content: text.to_string(),
                    user: created.user,
                };
                self.state.update(|s| {
                    s.append_comment(post_id, comment);
                    s.clear_draft(post_id);
                });
                Ok(())
            }
            Err(err) => {
                warn!(post_id, error = %err, "comment submit failed");
                let err = FeedError::action(Action::CreateComment, &err);
                let message = err.to_string();
                self.state.update(|s| s.record_error(message));
                Err(err)
            }
        }
    }

    /// Submit whatever draft text is stored for the post.
    pub async fn submit_draft(&self, post_id: &str) -> Result<(), FeedError> {
        let text = self.state.read(|s| s.draft(post_id).to_string());
        self.submit_comment(post_id, text.as_deref()).await
    }

    pub async fn delete_comment(&self, comment_id: &str) -> Result<(), FeedError> {
        match self.api.delete_comment(comment_id).await {
            Ok(()) => {
                self.state.update(|s| s.remove_comment(comment_id));
                Ok(())
            }
            Err(err) => {
                warn!(comment_id, error = %err, "comment delete failed");
                let err = FeedError::action(Action::DeleteComment, &err);
                let message = err.to_string();
                self.state.update(|s| s.record_error(message));
                Err(err)
            }
        }
    }

    pub fn toggle_comment_input(&self, post_id: &str) {
        self.state.update(|s| s.toggle_comment_input(post_id));
    }

    pub fn set_draft(&self, post_id: &str, text: String) {
        self.state.update(|s| s.set_draft(post_id, text));
    }
}
