//! Sign-in and sign-out handlers.
//!
//! ```text
//! POST /api/v1/auth/session {"token":"dev:ada@example.com"}
//! DELETE /api/v1/auth/session
//! ```
//!
//! Signing in stores the verified identity in the cookie session. When an
//! account already exists for the identity its id is stored too; otherwise
//! the client continues with onboarding.

use actix_web::{HttpResponse, delete, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::UserId;
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Sign-in request body.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignInRequest {
    /// Bearer token issued by the identity provider.
    #[schema(example = "dev:ada@example.com")]
    pub token: String,
}

/// Sign-in response body.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignInResponse {
    /// Existing account id; absent until onboarding creates one.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub user_id: Option<UserId>,
    /// Whether the account finished onboarding.
    pub onboarding_complete: bool,
}

/// Verify an identity token and establish a session.
#[utoipa::path(
    post,
    path = "/api/v1/auth/session",
    request_body = SignInRequest,
    responses(
        (status = 200, description = "Signed in", body = SignInResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Token rejected", body = ErrorSchema),
        (status = 503, description = "Identity provider unavailable", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "signIn",
    security([])
)]
#[post("/auth/session")]
pub async fn sign_in(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<SignInRequest>,
) -> ApiResult<web::Json<SignInResponse>> {
    let outcome = state.session.sign_in(&payload.token).await?;
    session.reset();
    session.persist_identity(&outcome.identity)?;
    let response = match outcome.user {
        Some(user) => {
            session.persist_user(&user.id)?;
            SignInResponse {
                user_id: Some(user.id),
                onboarding_complete: user.onboarding_complete,
            }
        }
        None => SignInResponse {
            user_id: None,
            onboarding_complete: false,
        },
    };
    Ok(web::Json(response))
}

/// End the session.
#[utoipa::path(
    delete,
    path = "/api/v1/auth/session",
    responses((status = 204, description = "Session cleared")),
    tags = ["auth"],
    operation_id = "signOut",
    security([])
)]
#[delete("/auth/session")]
pub async fn sign_out(session: SessionContext) -> HttpResponse {
    session.purge();
    HttpResponse::NoContent().finish()
}

#[cfg(test)]
mod tests {
    //! Session establishment coverage.
    use super::*;
    use crate::domain::Error;
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use rstest::rstest;
    use serde_json::Value;

    use crate::domain::ports::SignInOutcome;
    use crate::domain::User;
    use crate::inbound::http::test_utils::{MockPorts, ada_identity, test_app, user_named};

    fn ada(onboarding_complete: bool) -> User {
        User {
            onboarding_complete,
            ..user_named("ada")
        }
    }

    fn sign_in_request(token: &str) -> actix_test::TestRequest {
        actix_test::TestRequest::post()
            .uri("/api/v1/auth/session")
            .set_json(SignInRequest {
                token: token.to_owned(),
            })
    }

    #[rstest]
    #[actix_web::test]
    async fn known_accounts_are_signed_in() {
        let user = ada(true);
        let user_id = user.id;
        let mut mocks = MockPorts::default();
        mocks
            .session
            .expect_sign_in()
            .withf(|token: &str| token == "dev:ada@example.com")
            .return_once(move |_| {
                Ok(SignInOutcome {
                    identity: ada_identity(),
                    user: Some(user),
                })
            });
        let app = actix_test::init_service(test_app(mocks.into(), |cfg| {
            cfg.service(sign_in).service(sign_out);
        }))
        .await;

        let response =
            actix_test::call_service(&app, sign_in_request("dev:ada@example.com").to_request())
                .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(
            response
                .response()
                .cookies()
                .any(|cookie| cookie.name() == "session")
        );
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(
            body.get("userId").and_then(Value::as_str),
            Some(user_id.to_string().as_str())
        );
        assert_eq!(body.get("onboardingComplete"), Some(&Value::Bool(true)));
    }

    #[rstest]
    #[actix_web::test]
    async fn new_identities_have_no_user_id() {
        let mut mocks = MockPorts::default();
        mocks.session.expect_sign_in().return_once(|_| {
            Ok(SignInOutcome {
                identity: ada_identity(),
                user: None,
            })
        });
        let app = actix_test::init_service(test_app(mocks.into(), |cfg| {
            cfg.service(sign_in);
        }))
        .await;

        let response =
            actix_test::call_service(&app, sign_in_request("dev:ada@example.com").to_request())
                .await;
        let body: Value = actix_test::read_body_json(response).await;
        assert!(body.get("userId").is_none());
        assert_eq!(body.get("onboardingComplete"), Some(&Value::Bool(false)));
    }

    #[rstest]
    #[actix_web::test]
    async fn rejected_tokens_are_unauthorised() {
        let mut mocks = MockPorts::default();
        mocks
            .session
            .expect_sign_in()
            .return_once(|_| Err(Error::unauthorized("invalid token")));
        let app = actix_test::init_service(test_app(mocks.into(), |cfg| {
            cfg.service(sign_in);
        }))
        .await;

        let response =
            actix_test::call_service(&app, sign_in_request("garbage").to_request()).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[rstest]
    #[actix_web::test]
    async fn sign_out_clears_the_cookie() {
        let app = actix_test::init_service(test_app(MockPorts::default().into(), |cfg| {
            cfg.service(sign_out);
        }))
        .await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::delete()
                .uri("/api/v1/auth/session")
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }
}
