//! Driving port for exchanging identity tokens for a session.

use async_trait::async_trait;

use crate::domain::{Error, ExternalIdentity, User};

/// Result of a successful sign-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignInOutcome {
    /// Identity asserted by the provider.
    pub identity: ExternalIdentity,
    /// Existing account for the identity, if onboarding has started.
    pub user: Option<User>,
}

/// Domain use-case port for signing in.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionCommand: Send + Sync {
    /// Verify `token` and look up the matching account.
    async fn sign_in(&self, token: &str) -> Result<SignInOutcome, Error>;
}
