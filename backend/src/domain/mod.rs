//! Domain primitives, aggregates, and services.
//!
//! Purpose: Define strongly typed domain entities used by the API and
//! persistence layers, the ports that separate them, and the services that
//! implement the use cases. Types validate on construction and document their
//! invariants and serialisation contracts in Rustdoc.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - TraceId: request correlation identifier.
//! - User, Username, FullName, UserSummary: accounts and author cards.
//! - PostRecord, PostView, FeedRequest: posts and the feed read model.
//! - Project, Experience, ContactMethod: portfolio entries.
//! - SearchRequest, SearchResults: cross-category search.
//! - RetryPolicy, Transient: retry of transient repository failures.
//! - Services implementing the driving ports in [`ports`].

pub mod error;
pub mod portfolio;
pub mod ports;
pub mod post;
pub mod profile;
pub mod retry;
pub mod search;
pub mod sitemap;
pub mod trace_id;
pub mod user;
pub mod web_url;

mod onboarding_service;
mod portfolio_service;
mod post_service;
mod profile_service;
mod search_service;
mod service_errors;
#[cfg(test)]
mod service_test_helpers;
mod session_service;
mod sitemap_service;

pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::onboarding_service::{OnboardingService, username_base};
pub use self::portfolio::{
    ContactDraft, ContactMethod, ContactMethodId, ContactType, Experience, ExperienceDraft,
    ExperienceId, ExperienceInput, Month, PortfolioValidationError, Project, ProjectDraft,
    ProjectId, ProjectInput, Year,
};
pub use self::portfolio_service::PortfolioService;
pub use self::post::{
    FeedFilter, FeedRequest, FeedView, InteractionKind, MAX_POST_IMAGES, NewPost, POST_TEXT_MAX,
    PostCounts, PostCursorKey, PostId, PostRecord, PostText, PostValidationError, PostView,
    REPLY_PREVIEW_COUNT, ReplyPreview, ReplyPrivacy, ToggleOutcome, ViewerFlags,
    validate_post_images,
};
pub use self::post_service::{FEED_DEFAULT_LIMIT, FEED_MAX_LIMIT, PostService};
pub use self::profile::{
    DESCRIPTION_MAX, FollowLists, ProfileCounts, ProfileUpdate, ProfileValidationError,
    UserProfile,
};
pub use self::profile_service::{FOLLOW_STATUS_MAX, ProfileService};
pub use self::retry::{RetryPolicy, Transient};
pub use self::search::{
    PostHit, SEARCH_PAGE_SIZE, SEARCH_TERM_MAX, SearchCursors, SearchFilter, SearchKey,
    SearchRequest, SearchResults, SearchTerm,
};
pub use self::search_service::SearchService;
pub use self::session_service::SessionService;
pub use self::sitemap::{SitemapEntry, SitemapPost};
pub use self::sitemap_service::SitemapService;
pub use self::trace_id::TraceId;
pub use self::user::{
    ExternalIdentity, FullName, NewUser, ONBOARDING_USERNAME_MAX, USERNAME_MAX, USERNAME_MIN,
    User, UserId, UserSummary, UserValidationError, Username,
};
