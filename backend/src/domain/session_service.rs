//! Sign-in service exchanging identity tokens for account lookups.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::Error;
use crate::domain::ports::{
    IdentityProvider, IdentityProviderError, SessionCommand, SignInOutcome, UserRepository,
};
use crate::domain::service_errors::map_user_error;

/// Service implementing [`SessionCommand`].
#[derive(Clone)]
pub struct SessionService<I, U> {
    identity: Arc<I>,
    users: Arc<U>,
}

impl<I, U> SessionService<I, U> {
    /// Create a new service.
    pub fn new(identity: Arc<I>, users: Arc<U>) -> Self {
        Self { identity, users }
    }
}

fn map_identity_error(error: IdentityProviderError) -> Error {
    match error {
        IdentityProviderError::Rejected { .. } => Error::unauthorized("invalid identity token"),
        IdentityProviderError::Unavailable { message } => {
            Error::service_unavailable(format!("identity provider unavailable: {message}"))
        }
        IdentityProviderError::Malformed { message } => {
            Error::internal(format!("identity provider error: {message}"))
        }
    }
}

#[async_trait]
impl<I, U> SessionCommand for SessionService<I, U>
where
    I: IdentityProvider,
    U: UserRepository,
{
    async fn sign_in(&self, token: &str) -> Result<SignInOutcome, Error> {
        let token = token.trim();
        if token.is_empty() {
            return Err(Error::unauthorized("identity token is required"));
        }
        let identity = self
            .identity
            .verify(token)
            .await
            .map_err(map_identity_error)?;
        let user = self
            .users
            .find_by_subject(&identity.subject)
            .await
            .map_err(map_user_error)?;
        info!(
            subject = %identity.subject,
            existing = user.is_some(),
            "identity verified"
        );
        Ok(SignInOutcome { identity, user })
    }
}

#[cfg(test)]
mod tests {
    //! Service behaviour against mocked ports.
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ExternalIdentity;
    use crate::domain::ports::{MockIdentityProvider, MockUserRepository};
    use rstest::rstest;

    fn identity() -> ExternalIdentity {
        ExternalIdentity {
            subject: "idp|1".to_owned(),
            email: "ada@example.com".to_owned(),
            first_name: Some("Ada".to_owned()),
            last_name: None,
            image_url: None,
        }
    }

    #[rstest]
    #[tokio::test]
    async fn new_identity_signs_in_without_account() {
        let mut provider = MockIdentityProvider::new();
        provider
            .expect_verify()
            .times(1)
            .return_once(|_| Ok(identity()));
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_subject()
            .withf(|subject| subject == "idp|1")
            .times(1)
            .return_once(|_| Ok(None));

        let service = SessionService::new(Arc::new(provider), Arc::new(users));
        let outcome = service.sign_in("token").await.expect("sign in");
        assert_eq!(outcome.identity, identity());
        assert!(outcome.user.is_none());
    }

    #[rstest]
    #[tokio::test]
    async fn rejected_tokens_are_unauthorised() {
        let mut provider = MockIdentityProvider::new();
        provider
            .expect_verify()
            .return_once(|_| Err(IdentityProviderError::rejected("expired")));
        let service = SessionService::new(Arc::new(provider), Arc::new(MockUserRepository::new()));

        let error = service.sign_in("token").await.expect_err("rejected");
        assert_eq!(error.code(), ErrorCode::Unauthorized);
    }

    #[rstest]
    #[tokio::test]
    async fn blank_tokens_skip_the_provider() {
        let service = SessionService::new(
            Arc::new(MockIdentityProvider::new()),
            Arc::new(MockUserRepository::new()),
        );
        let error = service.sign_in("  ").await.expect_err("blank");
        assert_eq!(error.code(), ErrorCode::Unauthorized);
    }

    #[rstest]
    #[tokio::test]
    async fn provider_outage_is_service_unavailable() {
        let mut provider = MockIdentityProvider::new();
        provider
            .expect_verify()
            .return_once(|_| Err(IdentityProviderError::unavailable("timeout")));
        let service = SessionService::new(Arc::new(provider), Arc::new(MockUserRepository::new()));

        let error = service.sign_in("token").await.expect_err("outage");
        assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
    }
}
