//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! specification for the REST API. It registers:
//!
//! - **Paths**: every HTTP endpoint from the inbound layer (auth, onboarding,
//!   users, portfolio, posts, search, crawlers, health)
//! - **Schemas**: wrappers in [`crate::inbound::http::schemas`] that describe
//!   domain types without coupling them to utoipa, plus the request and
//!   response DTOs owned by the handlers
//! - **Security**: session cookie authentication scheme
//!
//! The generated specification is used by Swagger UI (debug builds) and
//! exported via `cargo run --bin openapi-dump` for external tooling.

use crate::inbound::http::auth::{SignInRequest, SignInResponse};
use crate::inbound::http::onboarding::{OnboardingRequest, UsernameSuggestion};
use crate::inbound::http::portfolio::{
    ContactRequest, ExperienceRequest, ProjectRequest, RemoveImageRequest,
};
use crate::inbound::http::posts::{CreatePostRequest, InteractionResponse, ReplyRequest};
use crate::inbound::http::schemas::{
    ContactMethodSchema, ContactTypeSchema, ErrorCodeSchema, ErrorSchema, ExperiencePageSchema,
    ExperienceSchema, FeedViewSchema, FollowListsSchema, MonthSchema, PostCountsSchema,
    PostHitPageSchema, PostHitSchema, PostPageSchema, PostViewSchema, ProjectPageSchema,
    ProjectSchema, ReplyPreviewSchema, ReplyPrivacySchema, SearchResultsSchema,
    ToggleOutcomeSchema, UserPageSchema, UserSummarySchema, ViewerFlagsSchema,
};
use crate::inbound::http::users::{
    CountsResponse, FollowResponse, FollowStatusRequest, ProfileResponse, UpdateImageRequest,
    UpdateProfileRequest, UserResponse,
};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/auth/session.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "whoami backend API",
        description = "Profiles, portfolios, posts, and the social feed.",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0.html"
        )
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::sign_in,
        crate::inbound::http::auth::sign_out,
        crate::inbound::http::onboarding::suggest_username,
        crate::inbound::http::onboarding::setup_account,
        crate::inbound::http::onboarding::complete_onboarding,
        crate::inbound::http::users::current_user_profile,
        crate::inbound::http::users::get_user_profile,
        crate::inbound::http::users::update_profile,
        crate::inbound::http::users::update_profile_image,
        crate::inbound::http::users::toggle_follow,
        crate::inbound::http::users::get_follows,
        crate::inbound::http::users::batch_follow_status,
        crate::inbound::http::portfolio::create_project,
        crate::inbound::http::portfolio::update_project,
        crate::inbound::http::portfolio::delete_project,
        crate::inbound::http::portfolio::remove_project_image,
        crate::inbound::http::portfolio::create_experience,
        crate::inbound::http::portfolio::update_experience,
        crate::inbound::http::portfolio::delete_experience,
        crate::inbound::http::portfolio::remove_experience_image,
        crate::inbound::http::portfolio::create_contact,
        crate::inbound::http::portfolio::update_contact,
        crate::inbound::http::portfolio::delete_contact,
        crate::inbound::http::posts::fetch_posts,
        crate::inbound::http::posts::create_post,
        crate::inbound::http::posts::reply_to_post,
        crate::inbound::http::posts::get_post,
        crate::inbound::http::posts::delete_post,
        crate::inbound::http::posts::fetch_replies,
        crate::inbound::http::posts::get_bookmarks,
        crate::inbound::http::posts::toggle_like,
        crate::inbound::http::posts::toggle_bookmark,
        crate::inbound::http::posts::toggle_repost,
        crate::inbound::http::search::search_all,
        crate::inbound::http::sitemap::sitemap,
        crate::inbound::http::sitemap::robots,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        SignInRequest,
        SignInResponse,
        UsernameSuggestion,
        OnboardingRequest,
        UserResponse,
        CountsResponse,
        ProfileResponse,
        UpdateProfileRequest,
        UpdateImageRequest,
        FollowResponse,
        FollowStatusRequest,
        FollowListsSchema,
        UserSummarySchema,
        ProjectRequest,
        ExperienceRequest,
        ContactRequest,
        RemoveImageRequest,
        ProjectSchema,
        ExperienceSchema,
        ContactMethodSchema,
        ContactTypeSchema,
        MonthSchema,
        CreatePostRequest,
        ReplyRequest,
        InteractionResponse,
        PostViewSchema,
        PostPageSchema,
        PostCountsSchema,
        ViewerFlagsSchema,
        ReplyPreviewSchema,
        ReplyPrivacySchema,
        FeedViewSchema,
        ToggleOutcomeSchema,
        PostHitSchema,
        UserPageSchema,
        PostHitPageSchema,
        ProjectPageSchema,
        ExperiencePageSchema,
        SearchResultsSchema,
    )),
    tags(
        (name = "auth", description = "Sign-in through the identity provider"),
        (name = "onboarding", description = "Account creation after first sign-in"),
        (name = "users", description = "Profiles and the follow graph"),
        (name = "portfolio", description = "Projects, experiences, and contact methods"),
        (name = "posts", description = "Posts, replies, and interactions"),
        (name = "search", description = "Cross-category search"),
        (name = "crawlers", description = "Sitemap and robots.txt"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying OpenAPI schema field structure and path coverage.

    use super::*;
    use rstest::rstest;
    use utoipa::OpenApi;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    // Note: utoipa replaces :: with . in schema names
    const ERROR_SCHEMA_NAME: &str = "crate.domain.Error";
    const POST_SCHEMA_NAME: &str = "crate.domain.PostView";

    /// Assert that an Object schema contains a field with the given name.
    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[rstest]
    fn error_schema_has_required_fields() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let error_schema = schemas.get(ERROR_SCHEMA_NAME).expect("Error schema");

        assert_object_schema_has_field(error_schema, "code");
        assert_object_schema_has_field(error_schema, "message");
    }

    #[rstest]
    fn post_schema_uses_camel_case_fields() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let post_schema = schemas.get(POST_SCHEMA_NAME).expect("PostView schema");

        assert_object_schema_has_field(post_schema, "replyPrivacy");
        assert_object_schema_has_field(post_schema, "createdAt");
    }

    #[rstest]
    #[case("/api/v1/auth/session")]
    #[case("/api/v1/onboarding/account")]
    #[case("/api/v1/users/me")]
    #[case("/api/v1/users/{usernameOrId}")]
    #[case("/api/v1/users/me/projects")]
    #[case("/api/v1/posts")]
    #[case("/api/v1/posts/{id}/replies")]
    #[case("/api/v1/bookmarks")]
    #[case("/api/v1/search")]
    #[case("/sitemap.xml")]
    #[case("/health/ready")]
    fn endpoints_are_documented(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(
            doc.paths.paths.contains_key(path),
            "missing documented path {path}"
        );
    }

    #[rstest]
    fn session_cookie_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("SessionCookie"));
    }
}
