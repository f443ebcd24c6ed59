//! Onboarding handlers: username suggestion, account creation, completion.
//!
//! ```text
//! GET  /api/v1/onboarding/username-suggestion
//! POST /api/v1/onboarding/account {"username":"ada","fullName":"Ada Lovelace"}
//! POST /api/v1/onboarding/complete {"username":"ada","fullName":"Ada Lovelace"}
//! ```
//!
//! The first two routes run before an account exists and read the verified
//! identity stored at sign in. Account creation stores the new user id so the
//! rest of the API becomes available in the same session.

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{FullName, Username};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::users::UserResponse;
use crate::inbound::http::validation::{FieldName, user_validation_error};

/// Suggested handle for a new account.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UsernameSuggestion {
    #[schema(example = "adalovelace")]
    pub username: String,
}

/// Username and display name chosen during onboarding.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingRequest {
    #[schema(min_length = 3, max_length = 20, example = "ada")]
    pub username: String,
    #[schema(example = "Ada Lovelace")]
    pub full_name: String,
}

impl OnboardingRequest {
    fn validate(self) -> ApiResult<(Username, FullName)> {
        let username = Username::for_onboarding(self.username)
            .map_err(|error| user_validation_error(&error, FieldName::new("username")))?;
        let full_name = FullName::new(self.full_name)
            .map_err(|error| user_validation_error(&error, FieldName::new("fullName")))?;
        Ok((username, full_name))
    }
}

/// Suggest an available username derived from the signed-in email.
#[utoipa::path(
    get,
    path = "/api/v1/onboarding/username-suggestion",
    responses(
        (status = 200, description = "Available username", body = UsernameSuggestion),
        (status = 401, description = "Sign in required", body = ErrorSchema),
        (status = 409, description = "No free candidate", body = ErrorSchema)
    ),
    tags = ["onboarding"],
    operation_id = "suggestUsername"
)]
#[get("/onboarding/username-suggestion")]
pub async fn suggest_username(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<UsernameSuggestion>> {
    let identity = session.require_identity()?;
    let username = state.onboarding.suggest_username(&identity).await?;
    Ok(web::Json(UsernameSuggestion {
        username: username.into(),
    }))
}

/// Create the account for the signed-in identity.
#[utoipa::path(
    post,
    path = "/api/v1/onboarding/account",
    request_body = OnboardingRequest,
    responses(
        (status = 201, description = "Account created", body = UserResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Sign in required", body = ErrorSchema),
        (status = 409, description = "Username taken or account exists", body = ErrorSchema)
    ),
    tags = ["onboarding"],
    operation_id = "setupAccount"
)]
#[post("/onboarding/account")]
pub async fn setup_account(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<OnboardingRequest>,
) -> ApiResult<HttpResponse> {
    let identity = session.require_identity()?;
    let (username, full_name) = payload.into_inner().validate()?;
    let user = state
        .onboarding
        .setup_account(&identity, username, full_name)
        .await?;
    session.persist_user(&user.id)?;
    Ok(HttpResponse::Created().json(UserResponse::from(user)))
}

/// Finish onboarding for an existing account.
#[utoipa::path(
    post,
    path = "/api/v1/onboarding/complete",
    request_body = OnboardingRequest,
    responses(
        (status = 200, description = "Onboarding complete", body = UserResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 409, description = "Username taken", body = ErrorSchema)
    ),
    tags = ["onboarding"],
    operation_id = "completeOnboarding"
)]
#[post("/onboarding/complete")]
pub async fn complete_onboarding(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<OnboardingRequest>,
) -> ApiResult<web::Json<UserResponse>> {
    let user_id = session.require_user_id()?;
    let (username, full_name) = payload.into_inner().validate()?;
    let user = state
        .onboarding
        .complete_onboarding(&user_id, username, full_name)
        .await?;
    Ok(web::Json(user.into()))
}
