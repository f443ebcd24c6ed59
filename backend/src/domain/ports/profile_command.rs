//! Driving port for profile edits and follows.

use async_trait::async_trait;

use crate::domain::{Error, ProfileUpdate, User, UserId};

/// Domain use-case port for changing profiles.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileCommand: Send + Sync {
    /// Apply a partial profile edit.
    async fn update_profile(&self, user_id: &UserId, update: ProfileUpdate) -> Result<User, Error>;

    /// Replace the avatar with an already validated URL.
    async fn update_image(&self, user_id: &UserId, image_url: String) -> Result<User, Error>;

    /// Follow or unfollow `target`. Returns whether `user_id` now follows.
    async fn toggle_follow(&self, user_id: &UserId, target: &UserId) -> Result<bool, Error>;
}
