//! Driving port for the onboarding flow that turns an external identity into
//! an account.

use async_trait::async_trait;

use crate::domain::{Error, ExternalIdentity, FullName, User, UserId, Username};

/// Domain use-case port for onboarding.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OnboardingCommand: Send + Sync {
    /// Suggest a free username derived from the identity's email.
    async fn suggest_username(&self, identity: &ExternalIdentity) -> Result<Username, Error>;

    /// Create the account for a pending identity.
    async fn setup_account(
        &self,
        identity: &ExternalIdentity,
        username: Username,
        full_name: FullName,
    ) -> Result<User, Error>;

    /// Confirm the username and name and mark onboarding complete.
    async fn complete_onboarding(
        &self,
        user_id: &UserId,
        username: Username,
        full_name: FullName,
    ) -> Result<User, Error>;
}
