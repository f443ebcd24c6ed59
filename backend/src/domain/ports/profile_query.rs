//! Driving port for profile and follow-graph reads.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::{Error, FollowLists, UserId, UserProfile};

/// Domain use-case port for reading profiles.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileQuery: Send + Sync {
    /// Load a profile by UUID or case-insensitive username.
    async fn profile(
        &self,
        username_or_id: &str,
        viewer: Option<UserId>,
    ) -> Result<UserProfile, Error>;

    /// Load a profile by identifier.
    async fn profile_by_id(
        &self,
        user_id: &UserId,
        viewer: Option<UserId>,
    ) -> Result<UserProfile, Error>;

    /// Followers and followed users of `user_id`.
    async fn follow_lists(&self, user_id: &UserId) -> Result<FollowLists, Error>;

    /// Whether `viewer` follows each of `user_ids`. Empty without a viewer.
    async fn follow_status(
        &self,
        viewer: Option<UserId>,
        user_ids: Vec<UserId>,
    ) -> Result<HashMap<UserId, bool>, Error>;
}
