//! Driving port for feed, reply, and bookmark listings.

use async_trait::async_trait;
use pagination::Page;

use crate::domain::{Error, FeedRequest, PostId, PostView, UserId};

/// Domain use-case port for reading posts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FeedQuery: Send + Sync {
    /// One page of the feed.
    async fn fetch_posts(&self, request: FeedRequest) -> Result<Page<PostView>, Error>;

    /// One post rendered for `viewer`.
    async fn get_post(&self, post_id: &PostId, viewer: Option<UserId>) -> Result<PostView, Error>;

    /// One page of direct replies.
    async fn fetch_replies(
        &self,
        post_id: &PostId,
        viewer: Option<UserId>,
        cursor: Option<String>,
        limit: Option<usize>,
    ) -> Result<Page<PostView>, Error>;

    /// One page of the user's bookmarks.
    async fn bookmarks(
        &self,
        user_id: &UserId,
        cursor: Option<String>,
        limit: Option<usize>,
    ) -> Result<Page<PostView>, Error>;
}
