//! OpenAPI schema definitions for domain types.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`. This
//! module provides the schema definitions required for OpenAPI documentation
//! using utoipa's external schema registration.
//!
//! The schema wrappers mirror the serialised shape of their domain types but
//! live in the inbound adapter layer where framework concerns belong.
#![expect(
    dead_code,
    reason = "Schema wrappers are only used for OpenAPI generation via utoipa"
)]

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
///
/// Stable machine-readable error codes returned in API error responses.
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// Authentication failed or is missing.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// Authenticated but not permitted to perform this action.
    #[schema(rename = "forbidden")]
    Forbidden,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// A uniqueness rule was violated.
    #[schema(rename = "conflict")]
    Conflict,
    /// A dependency is temporarily unavailable.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error, rename_all = "camelCase")]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "That username is taken. Please try another.")]
    message: String,
    /// Correlation identifier echoed in the `Trace-Id` header.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Field-level context such as `{field, code, value}`.
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::UserSummary`].
#[derive(ToSchema)]
#[schema(as = crate::domain::UserSummary, rename_all = "camelCase")]
pub struct UserSummarySchema {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    id: String,
    #[schema(example = "ada")]
    username: String,
    full_name: Option<String>,
    profile_image: Option<String>,
    verified: bool,
    /// Whether the viewer follows this user.
    is_following: bool,
}

/// OpenAPI schema for [`crate::domain::PostCounts`].
#[derive(ToSchema)]
#[schema(as = crate::domain::PostCounts)]
pub struct PostCountsSchema {
    likes: u64,
    replies: u64,
    reposts: u64,
}

/// OpenAPI schema for [`crate::domain::ViewerFlags`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ViewerFlags, rename_all = "camelCase")]
pub struct ViewerFlagsSchema {
    is_liked: bool,
    is_bookmarked: bool,
    is_reposted: bool,
}

/// OpenAPI schema for [`crate::domain::ReplyPrivacy`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ReplyPrivacy)]
pub enum ReplyPrivacySchema {
    /// Anyone signed in may reply.
    #[schema(rename = "PUBLIC")]
    Public,
    /// Only the author and their followers may reply.
    #[schema(rename = "FOLLOWERS_ONLY")]
    FollowersOnly,
}

/// OpenAPI schema for [`crate::domain::FeedView`].
#[derive(ToSchema)]
#[schema(as = crate::domain::FeedView)]
pub enum FeedViewSchema {
    /// Every top-level post.
    #[schema(rename = "all")]
    All,
    /// Authors the viewer follows.
    #[schema(rename = "following")]
    Following,
    /// Most liked first.
    #[schema(rename = "top")]
    Top,
}

/// OpenAPI schema for [`crate::domain::ReplyPreview`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ReplyPreview, rename_all = "camelCase")]
pub struct ReplyPreviewSchema {
    id: String,
    author: UserSummarySchema,
    text: String,
    created_at: String,
}

/// OpenAPI schema for [`crate::domain::PostView`].
#[derive(ToSchema)]
#[schema(as = crate::domain::PostView, rename_all = "camelCase")]
pub struct PostViewSchema {
    id: String,
    author: UserSummarySchema,
    #[schema(example = "Hello, world")]
    text: String,
    images: Vec<String>,
    reply_privacy: ReplyPrivacySchema,
    parent_id: Option<String>,
    created_at: String,
    updated_at: String,
    counts: PostCountsSchema,
    viewer: ViewerFlagsSchema,
    /// Up to three newest replies.
    replies: Vec<ReplyPreviewSchema>,
    view: FeedViewSchema,
}

/// OpenAPI schema for a page of [`crate::domain::PostView`].
#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct PostPageSchema {
    data: Vec<PostViewSchema>,
    /// Opaque cursor for the next page.
    next_cursor: Option<String>,
    has_next_page: bool,
}

/// OpenAPI schema for [`crate::domain::ToggleOutcome`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ToggleOutcome)]
pub struct ToggleOutcomeSchema {
    /// Whether the interaction is now present.
    active: bool,
    counts: PostCountsSchema,
}

/// OpenAPI schema for [`crate::domain::Month`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Month)]
pub enum MonthSchema {
    #[schema(rename = "JANUARY")]
    January,
    #[schema(rename = "FEBRUARY")]
    February,
    #[schema(rename = "MARCH")]
    March,
    #[schema(rename = "APRIL")]
    April,
    #[schema(rename = "MAY")]
    May,
    #[schema(rename = "JUNE")]
    June,
    #[schema(rename = "JULY")]
    July,
    #[schema(rename = "AUGUST")]
    August,
    #[schema(rename = "SEPTEMBER")]
    September,
    #[schema(rename = "OCTOBER")]
    October,
    #[schema(rename = "NOVEMBER")]
    November,
    #[schema(rename = "DECEMBER")]
    December,
}

/// OpenAPI schema for [`crate::domain::ContactType`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ContactType)]
pub enum ContactTypeSchema {
    #[schema(rename = "FIGMA")]
    Figma,
    #[schema(rename = "GITHUB")]
    Github,
    #[schema(rename = "LINKEDIN")]
    Linkedin,
    #[schema(rename = "TWITTER")]
    Twitter,
    #[schema(rename = "EMAIL")]
    Email,
    #[schema(rename = "PHONE")]
    Phone,
}

/// OpenAPI schema for [`crate::domain::Project`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Project, rename_all = "camelCase")]
pub struct ProjectSchema {
    id: String,
    author_id: String,
    title: String,
    description: Option<String>,
    url: Option<String>,
    client: Option<String>,
    start_month: MonthSchema,
    #[schema(example = "2021")]
    start_year: String,
    images: Vec<String>,
    created_at: String,
    updated_at: String,
}

/// OpenAPI schema for [`crate::domain::Experience`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Experience, rename_all = "camelCase")]
pub struct ExperienceSchema {
    id: String,
    author_id: String,
    title: String,
    company: String,
    description: String,
    url: Option<String>,
    start_month: MonthSchema,
    start_year: String,
    end_month: Option<MonthSchema>,
    end_year: Option<String>,
    images: Vec<String>,
    created_at: String,
    updated_at: String,
}

/// OpenAPI schema for [`crate::domain::ContactMethod`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ContactMethod, rename_all = "camelCase")]
pub struct ContactMethodSchema {
    id: String,
    user_id: String,
    #[schema(rename = "type")]
    kind: ContactTypeSchema,
    contact_username: String,
    /// Channel prefix joined with the handle.
    #[schema(example = "https://github.com/ada")]
    url: String,
}

/// OpenAPI schema for [`crate::domain::PostHit`].
#[derive(ToSchema)]
#[schema(as = crate::domain::PostHit, rename_all = "camelCase")]
pub struct PostHitSchema {
    id: String,
    author: UserSummarySchema,
    text: String,
    images: Vec<String>,
    created_at: String,
    counts: PostCountsSchema,
}

/// OpenAPI schema for [`crate::domain::FollowLists`].
#[derive(ToSchema)]
#[schema(as = crate::domain::FollowLists)]
pub struct FollowListsSchema {
    followers: Vec<UserSummarySchema>,
    following: Vec<UserSummarySchema>,
}

/// OpenAPI schema for a page of user summaries.
#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct UserPageSchema {
    data: Vec<UserSummarySchema>,
    next_cursor: Option<String>,
    has_next_page: bool,
}

/// OpenAPI schema for a page of post hits.
#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct PostHitPageSchema {
    data: Vec<PostHitSchema>,
    next_cursor: Option<String>,
    has_next_page: bool,
}

/// OpenAPI schema for a page of projects.
#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct ProjectPageSchema {
    data: Vec<ProjectSchema>,
    next_cursor: Option<String>,
    has_next_page: bool,
}

/// OpenAPI schema for a page of experiences.
#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct ExperiencePageSchema {
    data: Vec<ExperienceSchema>,
    next_cursor: Option<String>,
    has_next_page: bool,
}

/// OpenAPI schema for [`crate::domain::SearchResults`].
///
/// Categories excluded by the filter come back as empty pages.
#[derive(ToSchema)]
#[schema(as = crate::domain::SearchResults)]
pub struct SearchResultsSchema {
    users: UserPageSchema,
    posts: PostHitPageSchema,
    projects: ProjectPageSchema,
    experiences: ExperiencePageSchema,
}
