//! Portfolio handlers for the signed-in user's projects, experiences, and
//! contact methods.
//!
//! ```text
//! POST   /api/v1/users/me/projects
//! PUT    /api/v1/users/me/projects/{id}
//! DELETE /api/v1/users/me/projects/{id}
//! DELETE /api/v1/users/me/projects/{id}/images {"imageUrl":"https://..."}
//! ```
//!
//! Experiences follow the same shape under `/users/me/experiences`; contacts
//! live under `/users/me/contacts` without the image route. Records owned by
//! someone else are reported as missing.

use actix_web::{HttpResponse, delete, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    ContactDraft, ContactMethod, ContactMethodId, ContactType, Experience, ExperienceDraft,
    ExperienceId, ExperienceInput, Month, Project, ProjectDraft, ProjectId, ProjectInput,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{
    ContactMethodSchema, ErrorSchema, ExperienceSchema, ProjectSchema,
};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, invalid_value_error, parse_id, portfolio_validation_error,
};

/// Project form.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRequest {
    pub title: String,
    pub description: Option<String>,
    /// Absolute http(s) or ftp URL.
    pub url: Option<String>,
    pub client: Option<String>,
    #[schema(example = "MARCH")]
    pub start_month: Option<String>,
    #[schema(example = "2021")]
    pub start_year: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
}

/// Experience form.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceRequest {
    pub title: String,
    pub company: String,
    pub description: String,
    pub url: Option<String>,
    #[schema(example = "JANUARY")]
    pub start_month: Option<String>,
    #[schema(example = "2019")]
    pub start_year: Option<String>,
    /// Required together with `endYear`.
    pub end_month: Option<String>,
    pub end_year: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
}

/// Contact method form.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContactRequest {
    /// `FIGMA`, `GITHUB`, `LINKEDIN`, `TWITTER`, `EMAIL`, or `PHONE`.
    #[serde(rename = "type")]
    #[schema(example = "GITHUB")]
    pub kind: Option<String>,
    #[schema(example = "ada")]
    pub contact_username: String,
}

/// Image removal body.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RemoveImageRequest {
    pub image_url: String,
}

fn parse_month(raw: Option<String>, field: &'static str) -> ApiResult<Option<Month>> {
    raw.map(|value| {
        let trimmed = value.trim();
        Month::parse(trimmed).ok_or_else(|| {
            invalid_value_error(
                FieldName::new(field),
                format!("{field} must be a month name such as JANUARY"),
                trimmed,
            )
        })
    })
    .transpose()
}

impl ProjectRequest {
    fn into_draft(self) -> ApiResult<ProjectDraft> {
        let input = ProjectInput {
            start_month: parse_month(self.start_month, "startMonth")?,
            title: self.title,
            description: self.description,
            url: self.url,
            client: self.client,
            start_year: self.start_year,
            images: self.images,
        };
        ProjectDraft::try_from(input).map_err(|error| portfolio_validation_error(&error))
    }
}

impl ExperienceRequest {
    fn into_draft(self) -> ApiResult<ExperienceDraft> {
        let input = ExperienceInput {
            start_month: parse_month(self.start_month, "startMonth")?,
            end_month: parse_month(self.end_month, "endMonth")?,
            title: self.title,
            company: self.company,
            description: self.description,
            url: self.url,
            start_year: self.start_year,
            end_year: self.end_year,
            images: self.images,
        };
        ExperienceDraft::try_from(input).map_err(|error| portfolio_validation_error(&error))
    }
}

impl ContactRequest {
    fn into_draft(self) -> ApiResult<ContactDraft> {
        let kind = self
            .kind
            .as_deref()
            .map(|raw| {
                ContactType::parse(raw.trim()).ok_or_else(|| {
                    invalid_value_error(
                        FieldName::new("type"),
                        "type must be one of FIGMA, GITHUB, LINKEDIN, TWITTER, EMAIL, PHONE",
                        raw,
                    )
                })
            })
            .transpose()?;
        ContactDraft::new(kind, self.contact_username)
            .map_err(|error| portfolio_validation_error(&error))
    }
}

fn project_id(raw: &str) -> ApiResult<ProjectId> {
    parse_id(raw, FieldName::new("id"), ProjectId::new)
}

fn experience_id(raw: &str) -> ApiResult<ExperienceId> {
    parse_id(raw, FieldName::new("id"), ExperienceId::new)
}

fn contact_id(raw: &str) -> ApiResult<ContactMethodId> {
    parse_id(raw, FieldName::new("id"), ContactMethodId::new)
}

/// Add a project.
#[utoipa::path(
    post,
    path = "/api/v1/users/me/projects",
    request_body = ProjectRequest,
    responses(
        (status = 201, description = "Created project", body = ProjectSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["portfolio"],
    operation_id = "createProject"
)]
#[post("/users/me/projects")]
pub async fn create_project(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<ProjectRequest>,
) -> ApiResult<HttpResponse> {
    let owner = session.require_user_id()?;
    let draft = payload.into_inner().into_draft()?;
    let project = state.portfolio.create_project(&owner, draft).await?;
    Ok(HttpResponse::Created().json(project))
}

/// Replace a project.
#[utoipa::path(
    put,
    path = "/api/v1/users/me/projects/{id}",
    params(("id" = String, Path, description = "Project id")),
    request_body = ProjectRequest,
    responses(
        (status = 200, description = "Updated project", body = ProjectSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found or not owned", body = ErrorSchema)
    ),
    tags = ["portfolio"],
    operation_id = "updateProject"
)]
#[put("/users/me/projects/{id}")]
pub async fn update_project(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<ProjectRequest>,
) -> ApiResult<web::Json<Project>> {
    let owner = session.require_user_id()?;
    let id = project_id(&path)?;
    let draft = payload.into_inner().into_draft()?;
    Ok(web::Json(
        state.portfolio.update_project(&owner, &id, draft).await?,
    ))
}

/// Delete a project.
#[utoipa::path(
    delete,
    path = "/api/v1/users/me/projects/{id}",
    params(("id" = String, Path, description = "Project id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found or not owned", body = ErrorSchema)
    ),
    tags = ["portfolio"],
    operation_id = "deleteProject"
)]
#[delete("/users/me/projects/{id}")]
pub async fn delete_project(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let owner = session.require_user_id()?;
    let id = project_id(&path)?;
    state.portfolio.delete_project(&owner, &id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Remove one image from a project.
#[utoipa::path(
    delete,
    path = "/api/v1/users/me/projects/{id}/images",
    params(("id" = String, Path, description = "Project id")),
    request_body = RemoveImageRequest,
    responses(
        (status = 200, description = "Updated project", body = ProjectSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found or not owned", body = ErrorSchema)
    ),
    tags = ["portfolio"],
    operation_id = "removeProjectImage"
)]
#[delete("/users/me/projects/{id}/images")]
pub async fn remove_project_image(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<RemoveImageRequest>,
) -> ApiResult<web::Json<Project>> {
    let owner = session.require_user_id()?;
    let id = project_id(&path)?;
    Ok(web::Json(
        state
            .portfolio
            .remove_project_image(&owner, &id, payload.into_inner().image_url)
            .await?,
    ))
}

/// Add a work experience.
#[utoipa::path(
    post,
    path = "/api/v1/users/me/experiences",
    request_body = ExperienceRequest,
    responses(
        (status = 201, description = "Created experience", body = ExperienceSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["portfolio"],
    operation_id = "createExperience"
)]
#[post("/users/me/experiences")]
pub async fn create_experience(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<ExperienceRequest>,
) -> ApiResult<HttpResponse> {
    let owner = session.require_user_id()?;
    let draft = payload.into_inner().into_draft()?;
    let experience = state.portfolio.create_experience(&owner, draft).await?;
    Ok(HttpResponse::Created().json(experience))
}

/// Replace a work experience.
#[utoipa::path(
    put,
    path = "/api/v1/users/me/experiences/{id}",
    params(("id" = String, Path, description = "Experience id")),
    request_body = ExperienceRequest,
    responses(
        (status = 200, description = "Updated experience", body = ExperienceSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found or not owned", body = ErrorSchema)
    ),
    tags = ["portfolio"],
    operation_id = "updateExperience"
)]
#[put("/users/me/experiences/{id}")]
pub async fn update_experience(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<ExperienceRequest>,
) -> ApiResult<web::Json<Experience>> {
    let owner = session.require_user_id()?;
    let id = experience_id(&path)?;
    let draft = payload.into_inner().into_draft()?;
    Ok(web::Json(
        state.portfolio.update_experience(&owner, &id, draft).await?,
    ))
}

/// Delete a work experience.
#[utoipa::path(
    delete,
    path = "/api/v1/users/me/experiences/{id}",
    params(("id" = String, Path, description = "Experience id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found or not owned", body = ErrorSchema)
    ),
    tags = ["portfolio"],
    operation_id = "deleteExperience"
)]
#[delete("/users/me/experiences/{id}")]
pub async fn delete_experience(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let owner = session.require_user_id()?;
    let id = experience_id(&path)?;
    state.portfolio.delete_experience(&owner, &id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Remove one image from a work experience.
#[utoipa::path(
    delete,
    path = "/api/v1/users/me/experiences/{id}/images",
    params(("id" = String, Path, description = "Experience id")),
    request_body = RemoveImageRequest,
    responses(
        (status = 200, description = "Updated experience", body = ExperienceSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found or not owned", body = ErrorSchema)
    ),
    tags = ["portfolio"],
    operation_id = "removeExperienceImage"
)]
#[delete("/users/me/experiences/{id}/images")]
pub async fn remove_experience_image(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<RemoveImageRequest>,
) -> ApiResult<web::Json<Experience>> {
    let owner = session.require_user_id()?;
    let id = experience_id(&path)?;
    Ok(web::Json(
        state
            .portfolio
            .remove_experience_image(&owner, &id, payload.into_inner().image_url)
            .await?,
    ))
}

/// Add a contact method.
#[utoipa::path(
    post,
    path = "/api/v1/users/me/contacts",
    request_body = ContactRequest,
    responses(
        (status = 201, description = "Created contact", body = ContactMethodSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["portfolio"],
    operation_id = "createContact"
)]
#[post("/users/me/contacts")]
pub async fn create_contact(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<ContactRequest>,
) -> ApiResult<HttpResponse> {
    let owner = session.require_user_id()?;
    let draft = payload.into_inner().into_draft()?;
    let contact = state.portfolio.create_contact(&owner, draft).await?;
    Ok(HttpResponse::Created().json(contact))
}

/// Replace a contact method.
#[utoipa::path(
    put,
    path = "/api/v1/users/me/contacts/{id}",
    params(("id" = String, Path, description = "Contact method id")),
    request_body = ContactRequest,
    responses(
        (status = 200, description = "Updated contact", body = ContactMethodSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found or not owned", body = ErrorSchema)
    ),
    tags = ["portfolio"],
    operation_id = "updateContact"
)]
#[put("/users/me/contacts/{id}")]
pub async fn update_contact(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<ContactRequest>,
) -> ApiResult<web::Json<ContactMethod>> {
    let owner = session.require_user_id()?;
    let id = contact_id(&path)?;
    let draft = payload.into_inner().into_draft()?;
    Ok(web::Json(
        state.portfolio.update_contact(&owner, &id, draft).await?,
    ))
}

/// Delete a contact method.
#[utoipa::path(
    delete,
    path = "/api/v1/users/me/contacts/{id}",
    params(("id" = String, Path, description = "Contact method id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found or not owned", body = ErrorSchema)
    ),
    tags = ["portfolio"],
    operation_id = "deleteContact"
)]
#[delete("/users/me/contacts/{id}")]
pub async fn delete_contact(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let owner = session.require_user_id()?;
    let id = contact_id(&path)?;
    state.portfolio.delete_contact(&owner, &id).await?;
    Ok(HttpResponse::NoContent().finish())
}
