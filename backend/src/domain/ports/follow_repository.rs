//! Port for the follower graph.
use async_trait::async_trait;

use crate::domain::{UserId, UserSummary};

use super::define_port_error;

define_port_error! {
    /// Errors raised by follow repository adapters.
    pub enum FollowRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "follow repository connection failed: {message}",
        /// The transaction lost a serialisation race or deadlocked.
        Contention { message: String } => "follow repository contention: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "follow repository query failed: {message}",
    }
    transient: Connection, Contention
}

/// Follower and following totals for one user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FollowCounts {
    /// Users following the subject.
    pub followers: u64,
    /// Users the subject follows.
    pub following: u64,
}

/// Storage for follow edges. Self-follows are rejected by callers.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FollowRepository: Send + Sync {
    /// Add the edge when absent, remove it when present. Returns the new state.
    async fn toggle(
        &self,
        follower: &UserId,
        following: &UserId,
    ) -> Result<bool, FollowRepositoryError>;

    /// Whether `follower` follows `following`.
    async fn is_following(
        &self,
        follower: &UserId,
        following: &UserId,
    ) -> Result<bool, FollowRepositoryError>;

    /// Subset of `candidates` followed by `follower`.
    async fn followed_among(
        &self,
        follower: &UserId,
        candidates: &[UserId],
    ) -> Result<Vec<UserId>, FollowRepositoryError>;

    /// Users following `user`, newest edge first.
    async fn followers(&self, user: &UserId) -> Result<Vec<UserSummary>, FollowRepositoryError>;

    /// Users followed by `user`, newest edge first.
    async fn following(&self, user: &UserId) -> Result<Vec<UserSummary>, FollowRepositoryError>;

    /// Totals for `user`.
    async fn counts(&self, user: &UserId) -> Result<FollowCounts, FollowRepositoryError>;
}
