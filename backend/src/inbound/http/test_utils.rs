//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::test::TestRequest;
use actix_web::{App, HttpResponse, web};

use crate::domain::ports::{
    MockFeedQuery, MockOnboardingCommand, MockPortfolioCommand, MockPostCommand,
    MockProfileCommand, MockProfileQuery, MockSearchQuery, MockSessionCommand, MockSitemapQuery,
};
use chrono::{DateTime, TimeZone, Utc};

use crate::domain::{
    Error, ExternalIdentity, FeedView, PostCounts, PostId, PostView, ReplyPrivacy, User, UserId,
    Username, ViewerFlags,
};
use crate::inbound::http::error::{json_config, path_config, query_config};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::{HttpState, HttpStatePorts};

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Extract the session cookie set by a response.
pub fn session_cookie<B>(response: &ServiceResponse<B>) -> Cookie<'static> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(|cookie| cookie.into_owned())
        .expect("session cookie set")
}

/// Mock doubles for every driving port; tests set expectations on the
/// ones they exercise and convert the rest untouched.
#[derive(Default)]
pub struct MockPorts {
    pub session: MockSessionCommand,
    pub onboarding: MockOnboardingCommand,
    pub profile: MockProfileCommand,
    pub profile_query: MockProfileQuery,
    pub posts: MockPostCommand,
    pub feed: MockFeedQuery,
    pub portfolio: MockPortfolioCommand,
    pub search: MockSearchQuery,
    pub sitemap: MockSitemapQuery,
}

impl From<MockPorts> for HttpState {
    fn from(mocks: MockPorts) -> Self {
        HttpState::new(HttpStatePorts {
            session: Arc::new(mocks.session),
            onboarding: Arc::new(mocks.onboarding),
            profile: Arc::new(mocks.profile),
            profile_query: Arc::new(mocks.profile_query),
            posts: Arc::new(mocks.posts),
            feed: Arc::new(mocks.feed),
            portfolio: Arc::new(mocks.portfolio),
            search: Arc::new(mocks.search),
            sitemap: Arc::new(mocks.sitemap),
        })
    }
}

async fn sign_in_as(path: web::Path<UserId>, session: SessionContext) -> Result<HttpResponse, Error> {
    session.persist_user(&path.into_inner())?;
    Ok(HttpResponse::NoContent().finish())
}

async fn stash_identity(
    identity: web::Json<ExternalIdentity>,
    session: SessionContext,
) -> Result<HttpResponse, Error> {
    session.persist_identity(&identity)?;
    Ok(HttpResponse::NoContent().finish())
}

/// Application wired like the server: session middleware, extractor error
/// handlers, the given state, and handlers registered under `/api/v1`.
///
/// Two helper routes seed the session: `POST /test/session/{id}` and
/// `POST /test/identity`.
pub fn test_app(
    state: HttpState,
    configure: impl FnOnce(&mut web::ServiceConfig),
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .wrap(test_session_middleware())
        .app_data(web::Data::new(state))
        .app_data(json_config())
        .app_data(query_config())
        .app_data(path_config())
        .route("/test/session/{id}", web::post().to(sign_in_as))
        .route("/test/identity", web::post().to(stash_identity))
        .service(web::scope("/api/v1").configure(configure))
}

/// Request that stores `user` in the session.
pub fn login_request(user: &UserId) -> TestRequest {
    TestRequest::post().uri(&format!("/test/session/{user}"))
}

/// Request that stores a pending identity in the session.
pub fn identity_request(identity: &ExternalIdentity) -> TestRequest {
    TestRequest::post().uri("/test/identity").set_json(identity)
}

/// Identity used by onboarding and session tests.
pub fn ada_identity() -> ExternalIdentity {
    ExternalIdentity {
        subject: "dev|ada@example.com".to_owned(),
        email: "ada@example.com".to_owned(),
        first_name: Some("Ada".to_owned()),
        last_name: Some("Lovelace".to_owned()),
        image_url: None,
    }
}

/// Fixed timestamp shared by fixtures.
pub fn fixture_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0)
        .single()
        .expect("valid timestamp")
}

/// Onboarded account named `username`.
pub fn user_named(username: &str) -> User {
    User {
        id: UserId::random(),
        external_subject: format!("dev|{username}@example.com"),
        email: format!("{username}@example.com"),
        username: Username::new(username).expect("fixture username"),
        full_name: Some(username.to_owned()),
        first_name: None,
        last_name: None,
        job_title: None,
        website: None,
        location: None,
        description: None,
        profile_image: None,
        verified: false,
        onboarding_complete: true,
        created_at: fixture_time(),
        updated_at: fixture_time(),
    }
}

/// Top-level post by `author` as seen by an anonymous viewer.
pub fn post_by(author: &User, text: &str) -> PostView {
    PostView {
        id: PostId::random(),
        author: author.summary(),
        text: text.to_owned(),
        images: Vec::new(),
        reply_privacy: ReplyPrivacy::Public,
        parent_id: None,
        created_at: fixture_time(),
        updated_at: fixture_time(),
        counts: PostCounts::default(),
        viewer: ViewerFlags::default(),
        replies: Vec::new(),
        view: FeedView::All,
    }
}
