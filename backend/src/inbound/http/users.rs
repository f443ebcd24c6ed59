//! Profile and follow handlers.
//!
//! ```text
//! GET   /api/v1/users/me
//! PATCH /api/v1/users/me {"fullName":"Ada Lovelace","website":"https://ada.dev"}
//! PUT   /api/v1/users/me/image {"imageUrl":"https://img.example/ada.png"}
//! GET   /api/v1/users/{usernameOrId}
//! POST  /api/v1/users/{id}/follow
//! GET   /api/v1/users/{id}/follows
//! POST  /api/v1/users/follow-status {"userIds":["..."]}
//! ```

use std::collections::HashMap;

use actix_web::{HttpResponse, get, patch, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    ContactMethod, Experience, FollowLists, FullName, ProfileCounts, ProfileUpdate, Project, User,
    UserId, UserProfile, Username,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::cache_control::private_no_cache_header;
use crate::inbound::http::schemas::{
    ContactMethodSchema, ErrorSchema, ExperienceSchema, FollowListsSchema, ProjectSchema,
};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, parse_id, parse_user_id_list, profile_validation_error, user_validation_error,
};

/// Public account fields.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[schema(value_type = String, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: UserId,
    #[schema(example = "ada")]
    pub username: String,
    pub email: String,
    pub full_name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub job_title: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub profile_image: Option<String>,
    pub verified: bool,
    pub onboarding_complete: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username.into(),
            email: user.email,
            full_name: user.full_name,
            first_name: user.first_name,
            last_name: user.last_name,
            job_title: user.job_title,
            website: user.website,
            location: user.location,
            description: user.description,
            profile_image: user.profile_image,
            verified: user.verified,
            onboarding_complete: user.onboarding_complete,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Follower, following, and post totals.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
pub struct CountsResponse {
    pub followers: u64,
    pub following: u64,
    pub posts: u64,
}

impl From<ProfileCounts> for CountsResponse {
    fn from(counts: ProfileCounts) -> Self {
        Self {
            followers: counts.followers,
            following: counts.following,
            posts: counts.posts,
        }
    }
}

/// Profile page payload.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    #[schema(value_type = Vec<ContactMethodSchema>)]
    pub contacts: Vec<ContactMethod>,
    #[schema(value_type = Vec<ProjectSchema>)]
    pub projects: Vec<Project>,
    #[schema(value_type = Vec<ExperienceSchema>)]
    pub experiences: Vec<Experience>,
    pub counts: CountsResponse,
    /// Present only for signed-in viewers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_following: Option<bool>,
}

impl From<UserProfile> for ProfileResponse {
    fn from(profile: UserProfile) -> Self {
        Self {
            user: profile.user.into(),
            contacts: profile.contacts,
            projects: profile.projects,
            experiences: profile.experiences,
            counts: profile.counts.into(),
            is_following: profile.is_following,
        }
    }
}

/// Partial profile edit; omitted fields stay unchanged.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub username: Option<String>,
    pub full_name: Option<String>,
    pub job_title: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    #[schema(max_length = 500)]
    pub description: Option<String>,
}

impl UpdateProfileRequest {
    fn into_update(self) -> ApiResult<ProfileUpdate> {
        let username = self
            .username
            .map(Username::new)
            .transpose()
            .map_err(|error| user_validation_error(&error, FieldName::new("username")))?;
        let full_name = self
            .full_name
            .map(FullName::new)
            .transpose()
            .map_err(|error| user_validation_error(&error, FieldName::new("fullName")))?;
        let website = self
            .website
            .as_deref()
            .map(ProfileUpdate::website)
            .transpose()
            .map_err(|error| profile_validation_error(&error))?;
        let description = self
            .description
            .as_deref()
            .map(ProfileUpdate::description)
            .transpose()
            .map_err(|error| profile_validation_error(&error))?;
        Ok(ProfileUpdate {
            username,
            full_name,
            job_title: self.job_title.map(|value| value.trim().to_owned()),
            website,
            location: self.location.map(|value| value.trim().to_owned()),
            description,
        })
    }
}

/// Profile image replacement.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateImageRequest {
    #[schema(example = "https://img.example/ada.png")]
    pub image_url: String,
}

/// Follow toggle result.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct FollowResponse {
    /// Whether the viewer now follows the target.
    pub following: bool,
}

/// Batch follow-status lookup.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FollowStatusRequest {
    #[schema(max_items = 100)]
    pub user_ids: Vec<String>,
}

/// Profile of the signed-in user.
#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    responses(
        (status = 200, description = "Profile", body = ProfileResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "currentUserProfile"
)]
#[get("/users/me")]
pub async fn current_user_profile(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let profile = state
        .profile_query
        .profile_by_id(&user_id, Some(user_id))
        .await?;
    Ok(HttpResponse::Ok()
        .insert_header(private_no_cache_header())
        .json(ProfileResponse::from(profile)))
}

/// Public profile by username or id.
#[utoipa::path(
    get,
    path = "/api/v1/users/{usernameOrId}",
    params(("usernameOrId" = String, Path, description = "Username (any case) or UUID")),
    responses(
        (status = 200, description = "Profile", body = ProfileResponse),
        (status = 404, description = "User not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getUserProfile",
    security([], ("SessionCookie" = []))
)]
#[get("/users/{username_or_id}")]
pub async fn get_user_profile(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<ProfileResponse>> {
    let viewer = session.user_id()?;
    let profile = state.profile_query.profile(&path, viewer).await?;
    Ok(web::Json(profile.into()))
}

/// Edit the signed-in user's profile.
#[utoipa::path(
    patch,
    path = "/api/v1/users/me",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Updated user", body = UserResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 409, description = "Username taken", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "updateProfile"
)]
#[patch("/users/me")]
pub async fn update_profile(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<UpdateProfileRequest>,
) -> ApiResult<web::Json<UserResponse>> {
    let user_id = session.require_user_id()?;
    let update = payload.into_inner().into_update()?;
    let user = state.profile.update_profile(&user_id, update).await?;
    Ok(web::Json(user.into()))
}

/// Replace the signed-in user's profile image.
#[utoipa::path(
    put,
    path = "/api/v1/users/me/image",
    request_body = UpdateImageRequest,
    responses(
        (status = 200, description = "Updated user", body = UserResponse),
        (status = 400, description = "Invalid URL", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "updateProfileImage"
)]
#[put("/users/me/image")]
pub async fn update_profile_image(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<UpdateImageRequest>,
) -> ApiResult<web::Json<UserResponse>> {
    let user_id = session.require_user_id()?;
    let user = state
        .profile
        .update_image(&user_id, payload.into_inner().image_url)
        .await?;
    Ok(web::Json(user.into()))
}

/// Follow or unfollow a user.
#[utoipa::path(
    post,
    path = "/api/v1/users/{id}/follow",
    params(("id" = String, Path, description = "Target user id")),
    responses(
        (status = 200, description = "New follow state", body = FollowResponse),
        (status = 400, description = "Self follow or bad id", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "User not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "toggleFollow"
)]
#[post("/users/{id}/follow")]
pub async fn toggle_follow(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<FollowResponse>> {
    let user_id = session.require_user_id()?;
    let target = parse_id(&path, FieldName::new("id"), UserId::new)?;
    let following = state.profile.toggle_follow(&user_id, &target).await?;
    Ok(web::Json(FollowResponse { following }))
}

/// Followers and followed users.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}/follows",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "Follow lists", body = FollowListsSchema),
        (status = 400, description = "Bad id", body = ErrorSchema),
        (status = 404, description = "User not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getFollows",
    security([], ("SessionCookie" = []))
)]
#[get("/users/{id}/follows")]
pub async fn get_follows(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<FollowLists>> {
    let user_id = parse_id(&path, FieldName::new("id"), UserId::new)?;
    let lists = state.profile_query.follow_lists(&user_id).await?;
    Ok(web::Json(lists))
}

/// Whether the viewer follows each listed user.
#[utoipa::path(
    post,
    path = "/api/v1/users/follow-status",
    request_body = FollowStatusRequest,
    responses(
        (status = 200, description = "Map of user id to follow state",
            body = HashMap<String, bool>),
        (status = 400, description = "Bad id or too many ids", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "batchFollowStatus",
    security([], ("SessionCookie" = []))
)]
#[post("/users/follow-status")]
pub async fn batch_follow_status(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<FollowStatusRequest>,
) -> ApiResult<web::Json<HashMap<UserId, bool>>> {
    let viewer = session.user_id()?;
    let user_ids = parse_user_id_list(&payload.user_ids, FieldName::new("userIds"))?;
    let statuses = state.profile_query.follow_status(viewer, user_ids).await?;
    Ok(web::Json(statuses))
}

#[cfg(test)]
mod tests;
