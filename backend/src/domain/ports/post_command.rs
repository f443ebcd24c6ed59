//! Driving port for creating, deleting, and interacting with posts.

use async_trait::async_trait;

use crate::domain::{Error, InteractionKind, NewPost, PostId, PostView, ToggleOutcome, UserId};

/// Outcome of an interaction toggle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractionResult {
    /// Authoritative state and counters.
    pub outcome: ToggleOutcome,
    /// Refreshed post; populated for likes.
    pub post: Option<PostView>,
}

/// Domain use-case port for post mutations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostCommand: Send + Sync {
    /// Publish a post or reply.
    async fn create_post(&self, post: NewPost) -> Result<PostView, Error>;

    /// Delete a post authored by `user_id`, replies first.
    async fn delete_post(&self, user_id: &UserId, post_id: &PostId) -> Result<(), Error>;

    /// Toggle a like, bookmark, or repost.
    async fn toggle_interaction(
        &self,
        kind: InteractionKind,
        user_id: &UserId,
        post_id: &PostId,
    ) -> Result<InteractionResult, Error>;
}
