//! Port for verifying tokens issued by the external identity provider.
//!
//! Authentication itself is delegated; the backend only exchanges a bearer
//! token for the identity it represents.
use async_trait::async_trait;

use crate::domain::ExternalIdentity;

use super::define_port_error;

define_port_error! {
    /// Errors raised by identity provider adapters.
    pub enum IdentityProviderError {
        /// The provider refused the token.
        Rejected { message: String } => "identity token rejected: {message}",
        /// The provider could not be reached.
        Unavailable { message: String } => "identity provider unavailable: {message}",
        /// The provider answered with a payload we cannot use.
        Malformed { message: String } => "identity provider response malformed: {message}",
    }
    transient: Unavailable
}

/// Exchanges bearer tokens for identities.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Resolve `token` to the identity it was issued for.
    async fn verify(&self, token: &str) -> Result<ExternalIdentity, IdentityProviderError>;
}

/// Prefix of tokens accepted by [`FixtureIdentityProvider`].
pub const FIXTURE_TOKEN_PREFIX: &str = "dev:";

/// Development provider accepting `dev:<email>` tokens.
///
/// The subject is `dev|<email>` so fixture accounts never collide with real
/// provider subjects.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureIdentityProvider;

#[async_trait]
impl IdentityProvider for FixtureIdentityProvider {
    async fn verify(&self, token: &str) -> Result<ExternalIdentity, IdentityProviderError> {
        let email = token
            .strip_prefix(FIXTURE_TOKEN_PREFIX)
            .map(str::trim)
            .filter(|email| email.contains('@'))
            .ok_or_else(|| IdentityProviderError::rejected("expected dev:<email>"))?;
        let local = email.split('@').next().unwrap_or_default();
        Ok(ExternalIdentity {
            subject: format!("dev|{email}"),
            email: email.to_owned(),
            first_name: Some(local.to_owned()),
            last_name: None,
            image_url: None,
        })
    }
}
