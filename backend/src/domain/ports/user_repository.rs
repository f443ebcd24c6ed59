//! Port abstraction for user persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{FullName, NewUser, ProfileUpdate, User, UserId, Username};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// The transaction lost a serialisation race or deadlocked.
        Contention { message: String } => "user repository contention: {message}",
        /// A unique constraint rejected the write.
        Duplicate { constraint: String } => "user repository unique violation on {constraint}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
    }
    transient: Connection, Contention
}

/// Unique constraint guarding usernames.
pub const USERNAME_CONSTRAINT: &str = "users_username_lower_key";
/// Unique constraint guarding emails.
pub const EMAIL_CONSTRAINT: &str = "users_email_key";
/// Unique constraint guarding identity provider subjects.
pub const SUBJECT_CONSTRAINT: &str = "users_external_subject_key";

/// Storage for user accounts.
///
/// Username lookups are case-insensitive; stored usernames are lowercase.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError>;

    /// Fetch a user by username, ignoring case.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, UserRepositoryError>;

    /// Fetch a user by identity provider subject.
    async fn find_by_subject(&self, subject: &str) -> Result<Option<User>, UserRepositoryError>;

    /// Fetch a user by email.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserRepositoryError>;

    /// Insert a new user with `onboarding_complete = false`.
    async fn create(&self, user: &NewUser) -> Result<User, UserRepositoryError>;

    /// Apply a partial profile edit. Returns `None` when the user is missing.
    async fn update_profile(
        &self,
        id: &UserId,
        update: &ProfileUpdate,
    ) -> Result<Option<User>, UserRepositoryError>;

    /// Set the final username and name and mark onboarding complete.
    async fn complete_onboarding(
        &self,
        id: &UserId,
        username: &Username,
        full_name: &FullName,
    ) -> Result<Option<User>, UserRepositoryError>;

    /// Replace the avatar URL.
    async fn update_image(
        &self,
        id: &UserId,
        image_url: &str,
    ) -> Result<Option<User>, UserRepositoryError>;
}
