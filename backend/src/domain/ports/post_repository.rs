//! Port for posts, replies, and per-user interactions.
//!
//! Listing methods follow the keyset contract: callers pass the boundary key
//! of the previous page (exclusive) and a fetch limit that is one larger than
//! the page size, so adapters never need to know about cursors or pages.
use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::{
    FeedFilter, InteractionKind, NewPost, PostCursorKey, PostId, PostRecord, ToggleOutcome,
    UserId, ViewerFlags,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by post repository adapters.
    pub enum PostRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "post repository connection failed: {message}",
        /// The transaction lost a serialisation race or deadlocked.
        Contention { message: String } => "post repository contention: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "post repository query failed: {message}",
    }
    transient: Connection, Contention
}

/// Storage for posts and their interactions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Insert a post and bump the parent's reply counter when replying.
    async fn create(&self, post: &NewPost) -> Result<PostRecord, PostRepositoryError>;

    /// Fetch one post with its author and counters.
    async fn find(&self, id: &PostId) -> Result<Option<PostRecord>, PostRepositoryError>;

    /// Delete a post's replies, then the post, in one transaction.
    async fn delete_with_replies(&self, id: &PostId) -> Result<(), PostRepositoryError>;

    /// Feed rows after `after`, ordered for `filter.view`.
    async fn feed(
        &self,
        filter: &FeedFilter,
        after: Option<PostCursorKey>,
        fetch_limit: usize,
    ) -> Result<Vec<PostRecord>, PostRepositoryError>;

    /// Direct replies to `parent`, newest first.
    async fn replies(
        &self,
        parent: &PostId,
        after: Option<PostCursorKey>,
        fetch_limit: usize,
    ) -> Result<Vec<PostRecord>, PostRepositoryError>;

    /// Up to `per_parent` newest replies for each parent.
    async fn reply_previews(
        &self,
        parents: &[PostId],
        per_parent: usize,
    ) -> Result<Vec<PostRecord>, PostRepositoryError>;

    /// Posts bookmarked by `user`, ordered by post creation, newest first.
    async fn bookmarks(
        &self,
        user: &UserId,
        after: Option<PostCursorKey>,
        fetch_limit: usize,
    ) -> Result<Vec<PostRecord>, PostRepositoryError>;

    /// Interaction flags of `viewer` for each post that has any.
    async fn viewer_flags(
        &self,
        viewer: &UserId,
        posts: &[PostId],
    ) -> Result<HashMap<PostId, ViewerFlags>, PostRepositoryError>;

    /// Flip one interaction inside a transaction and adjust the counter.
    ///
    /// Returns `None` when the post does not exist.
    async fn toggle_interaction(
        &self,
        kind: InteractionKind,
        user: &UserId,
        post: &PostId,
    ) -> Result<Option<ToggleOutcome>, PostRepositoryError>;

    /// Number of posts, replies included, written by `author`.
    async fn count_by_author(&self, author: &UserId) -> Result<u64, PostRepositoryError>;
}
