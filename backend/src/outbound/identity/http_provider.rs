//! Reqwest-backed userinfo identity adapter.
//!
//! This adapter owns transport details only: bearer authentication, timeout
//! and HTTP error mapping, and JSON decoding into domain identities.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use tracing::debug;

use super::dto::UserinfoDto;
use crate::domain::ExternalIdentity;
use crate::domain::ports::{IdentityProvider, IdentityProviderError};

const USER_AGENT: &str = "whoami-backend/0.1";

/// Identity provider that exchanges bearer tokens at a userinfo endpoint.
pub struct UserinfoIdentityProvider {
    client: Client,
    endpoint: Url,
}

impl UserinfoIdentityProvider {
    /// Build an adapter using a reqwest client with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl IdentityProvider for UserinfoIdentityProvider {
    async fn verify(&self, token: &str) -> Result<ExternalIdentity, IdentityProviderError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(IdentityProviderError::rejected("empty bearer token"));
        }
        let response = self
            .client
            .get(self.endpoint.clone())
            .bearer_auth(token)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|error| IdentityProviderError::unavailable(error.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|error| IdentityProviderError::unavailable(error.to_string()))?;
        if !status.is_success() {
            debug!(status = status.as_u16(), "userinfo request refused");
            return Err(map_status_error(status));
        }
        parse_identity(body.as_ref())
    }
}

fn parse_identity(body: &[u8]) -> Result<ExternalIdentity, IdentityProviderError> {
    let decoded: UserinfoDto = serde_json::from_slice(body).map_err(|error| {
        IdentityProviderError::malformed(format!("invalid userinfo JSON payload: {error}"))
    })?;
    decoded
        .into_identity()
        .map_err(IdentityProviderError::malformed)
}

fn map_status_error(status: StatusCode) -> IdentityProviderError {
    let message = format!("status {}", status.as_u16());
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            IdentityProviderError::rejected(message)
        }
        _ if status.is_client_error() => IdentityProviderError::malformed(message),
        _ => IdentityProviderError::unavailable(message),
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for non-network userinfo mapping helpers.

    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::unauthorised(StatusCode::UNAUTHORIZED, "Rejected")]
    #[case::forbidden(StatusCode::FORBIDDEN, "Rejected")]
    #[case::not_found(StatusCode::NOT_FOUND, "Malformed")]
    #[case::server_error(StatusCode::BAD_GATEWAY, "Unavailable")]
    fn maps_http_statuses_to_expected_domain_errors(
        #[case] status: StatusCode,
        #[case] expected: &str,
    ) {
        let error = map_status_error(status);
        let matched = match expected {
            "Rejected" => matches!(error, IdentityProviderError::Rejected { .. }),
            "Malformed" => matches!(error, IdentityProviderError::Malformed { .. }),
            _ => matches!(error, IdentityProviderError::Unavailable { .. }),
        };
        assert!(matched, "{status} mapped to {error:?}");
    }

    #[rstest]
    fn decodes_userinfo_payloads() {
        let identity = parse_identity(br#"{"sub": "auth0|7", "email": "grace@example.com"}"#)
            .expect("identity");
        assert_eq!(identity.subject, "auth0|7");
        assert_eq!(identity.email, "grace@example.com");
    }

    #[rstest]
    fn garbage_payloads_are_malformed() {
        let error = parse_identity(b"<html>").expect_err("not JSON");
        assert!(matches!(error, IdentityProviderError::Malformed { .. }));
    }

    #[rstest]
    #[tokio::test]
    async fn blank_tokens_are_rejected_without_a_request() {
        let endpoint = Url::parse("http://127.0.0.1:9/userinfo").expect("url");
        let provider =
            UserinfoIdentityProvider::new(endpoint, Duration::from_secs(1)).expect("client");
        let error = provider.verify("   ").await.expect_err("blank token");
        assert!(matches!(error, IdentityProviderError::Rejected { .. }));
    }
}
