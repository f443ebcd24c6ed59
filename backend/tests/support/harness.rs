//! Live server harness and shared world for the HTTP behaviour suites.
//!
//! The harness owns a single-threaded Tokio runtime plus a `LocalSet` because
//! Actix uses `spawn_local` internally. The server runs on the in-memory
//! store with the development identity provider, so `dev:<email>` tokens
//! sign in. The `WorldFixture` ensures the server is stopped even if a test
//! panics.

use std::cell::RefCell;
use std::collections::HashMap;
use std::net::TcpListener;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use actix_session::SessionMiddleware;
use actix_session::config::CookieContentSecurity;
use actix_session::storage::CookieSessionStore;
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::ServerHandle;
use actix_web::http::{Method, header};
use actix_web::{App, HttpServer, web};
use awc::Client;
use mockable::DefaultClock;
use rstest::fixture;
use serde_json::Value;
use tokio::runtime::Runtime;
use tokio::task::LocalSet;
use whoami::Trace;
use whoami::domain::ports::FixtureIdentityProvider;
use whoami::domain::{
    OnboardingService, PortfolioService, PostService, ProfileService, SearchService,
    SessionService, SitemapService,
};
use whoami::inbound::http::error::{json_config, path_config, query_config};
use whoami::inbound::http::routes::{configure_api, configure_crawlers};
use whoami::inbound::http::state::{HttpState, HttpStatePorts};
use whoami::outbound::cache::InMemoryFeedCache;
use whoami::outbound::memory::InMemoryStore;

pub(crate) const PUBLIC_BASE_URL: &str = "https://whoami.page";

/// Last HTTP exchange observed by a step.
#[derive(Debug, Default)]
pub(crate) struct LastResponse {
    pub(crate) status: Option<u16>,
    pub(crate) body: Option<Value>,
    pub(crate) text: Option<String>,
    pub(crate) headers: HashMap<String, String>,
}

pub(crate) struct HttpWorld {
    pub(crate) runtime: Runtime,
    pub(crate) local: LocalSet,
    pub(crate) base_url: String,
    pub(crate) server: ServerHandle,
    /// Session cookie pair per member name.
    pub(crate) sessions: HashMap<String, String>,
    /// Account id per member name.
    pub(crate) user_ids: HashMap<String, String>,
    /// Most recently created post id.
    pub(crate) latest_post: Option<String>,
    pub(crate) last: LastResponse,
}

pub(crate) type SharedWorld = Rc<RefCell<HttpWorld>>;

pub(crate) struct WorldFixture {
    world: SharedWorld,
}

impl WorldFixture {
    pub(crate) fn world(&self) -> SharedWorld {
        self.world.clone()
    }
}

impl Drop for WorldFixture {
    fn drop(&mut self) {
        shutdown(self.world.clone());
    }
}

pub(crate) fn shutdown(world: SharedWorld) {
    // `LocalSet` must be driven on the thread that owns it, so we lock the world
    // while calling `block_on`. The future must not try to lock the world.
    let ctx = world.borrow();
    let server = ctx.server.clone();
    ctx.local.block_on(&ctx.runtime, async move {
        server.stop(true).await;
    });
}

pub(crate) fn with_world_async<R, F>(world: &SharedWorld, operation: impl FnOnce(String) -> F) -> R
where
    F: std::future::Future<Output = R>,
{
    let ctx = world.borrow();
    let base_url = ctx.base_url.clone();
    ctx.local.block_on(&ctx.runtime, operation(base_url))
}

fn test_session_middleware(key: Key) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".to_owned())
        .cookie_path("/".to_owned())
        .cookie_secure(false)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(SameSite::Lax)
        .build()
}

fn in_memory_state() -> HttpState {
    let store = Arc::new(InMemoryStore::new(Arc::new(DefaultClock)));
    let cache = Arc::new(InMemoryFeedCache::new(
        Duration::from_secs(30),
        Arc::new(DefaultClock),
    ));
    let posts = Arc::new(PostService::new(store.clone(), store.clone(), cache.clone()));
    let profiles = Arc::new(ProfileService::new(
        store.clone(),
        store.clone(),
        store.clone(),
        store.clone(),
        cache,
    ));
    HttpState::new(HttpStatePorts {
        session: Arc::new(SessionService::new(
            Arc::new(FixtureIdentityProvider),
            store.clone(),
        )),
        onboarding: Arc::new(OnboardingService::new(store.clone())),
        profile: profiles.clone(),
        profile_query: profiles,
        posts: posts.clone(),
        feed: posts,
        portfolio: Arc::new(PortfolioService::new(store.clone())),
        search: Arc::new(SearchService::new(store.clone())),
        sitemap: Arc::new(SitemapService::new(store, PUBLIC_BASE_URL)),
    })
}

async fn spawn_server(http_state: HttpState) -> Result<(String, ServerHandle), String> {
    let key = Key::generate();
    let listener = TcpListener::bind("127.0.0.1:0").map_err(|err| err.to_string())?;
    let addr = listener.local_addr().map_err(|err| err.to_string())?;

    let http_data = web::Data::new(http_state);

    let server = HttpServer::new(move || {
        let api = web::scope("/api/v1")
            .wrap(test_session_middleware(key.clone()))
            .configure(configure_api);

        App::new()
            .app_data(http_data.clone())
            .app_data(json_config())
            .app_data(query_config())
            .app_data(path_config())
            .wrap(Trace)
            .service(api)
            .configure(configure_crawlers)
    })
    .disable_signals()
    .workers(1)
    .listen(listener)
    .map_err(|err| err.to_string())?
    .run();

    let handle = server.handle();
    actix_web::rt::spawn(server);

    Ok((format!("http://{addr}"), handle))
}

fn create_runtime_and_local() -> (Runtime, LocalSet) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("tokio runtime");
    let local = LocalSet::new();

    (runtime, local)
}

#[fixture]
pub(crate) fn world() -> WorldFixture {
    let (runtime, local) = create_runtime_and_local();
    let (base_url, server) = local
        .block_on(&runtime, spawn_server(in_memory_state()))
        .expect("server should start");

    WorldFixture {
        world: Rc::new(RefCell::new(HttpWorld {
            runtime,
            local,
            base_url,
            server,
            sessions: HashMap::new(),
            user_ids: HashMap::new(),
            latest_post: None,
            last: LastResponse::default(),
        })),
    }
}

/// Request issued by a step on behalf of a member or anonymously.
pub(crate) struct RequestSpec<'a> {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) payload: Option<Value>,
    pub(crate) member: Option<&'a str>,
}

impl<'a> RequestSpec<'a> {
    pub(crate) fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            path: path.into(),
            payload: None,
            member: None,
        }
    }

    pub(crate) fn post(path: impl Into<String>, payload: Value) -> Self {
        Self {
            method: Method::POST,
            path: path.into(),
            payload: Some(payload),
            member: None,
        }
    }

    pub(crate) fn delete(path: impl Into<String>) -> Self {
        Self {
            method: Method::DELETE,
            path: path.into(),
            payload: None,
            member: None,
        }
    }

    pub(crate) fn as_member(mut self, member: &'a str) -> Self {
        self.member = Some(member);
        self
    }
}

fn session_pair(set_cookie: &str) -> Option<String> {
    set_cookie
        .split(';')
        .next()
        .filter(|pair| pair.starts_with("session="))
        .map(str::to_owned)
}

/// Perform a request, record the response, and refresh the member's session
/// cookie when the server rotated it.
pub(crate) fn perform(world: &SharedWorld, spec: RequestSpec<'_>) {
    let RequestSpec {
        method,
        path,
        payload,
        member,
    } = spec;
    let cookie = member.and_then(|name| world.borrow().sessions.get(name).cloned());
    let (status, headers, rotated, bytes) = with_world_async(world, |base_url| async move {
        let mut request = Client::default().request(method, format!("{base_url}{path}"));
        if let Some(cookie) = cookie {
            request = request.insert_header((header::COOKIE, cookie));
        }
        let mut response = match payload {
            Some(payload) => request.send_json(&payload).await.expect("request"),
            None => request.send().await.expect("request"),
        };
        let status = response.status().as_u16();
        let headers: HashMap<String, String> = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_owned(), value.to_owned()))
            })
            .collect();
        let rotated = response
            .headers()
            .get_all(header::SET_COOKIE)
            .filter_map(|value| value.to_str().ok())
            .find_map(session_pair);
        let bytes = response.body().await.expect("response body");
        (status, headers, rotated, bytes)
    });

    let mut ctx = world.borrow_mut();
    if let (Some(name), Some(pair)) = (member, rotated) {
        ctx.sessions.insert(name.to_owned(), pair);
    }
    ctx.last = LastResponse {
        status: Some(status),
        body: serde_json::from_slice(&bytes).ok(),
        text: String::from_utf8(bytes.to_vec()).ok(),
        headers,
    };
}

/// Sign `name` in with a development token and finish onboarding with the
/// same username.
pub(crate) fn onboard(world: &SharedWorld, name: &str) {
    perform(
        world,
        RequestSpec::post(
            "/api/v1/auth/session",
            serde_json::json!({ "token": format!("dev:{name}@example.com") }),
        )
        .as_member(name),
    );
    assert_eq!(world.borrow().last.status, Some(200), "sign-in for {name}");

    let account = serde_json::json!({ "username": name, "fullName": name });
    perform(
        world,
        RequestSpec::post("/api/v1/onboarding/account", account.clone()).as_member(name),
    );
    assert_eq!(world.borrow().last.status, Some(201), "account for {name}");
    let id = last_json(world, "/id")
        .as_str()
        .map(str::to_owned)
        .expect("account id");
    world.borrow_mut().user_ids.insert(name.to_owned(), id);

    perform(
        world,
        RequestSpec::post("/api/v1/onboarding/complete", account).as_member(name),
    );
    assert_eq!(world.borrow().last.status, Some(200), "onboarding for {name}");
}

/// Value at `pointer` in the last JSON body, or `Null`.
pub(crate) fn last_json(world: &SharedWorld, pointer: &str) -> Value {
    world
        .borrow()
        .last
        .body
        .as_ref()
        .and_then(|body| body.pointer(pointer))
        .cloned()
        .unwrap_or(Value::Null)
}

pub(crate) fn user_id(world: &SharedWorld, name: &str) -> String {
    world
        .borrow()
        .user_ids
        .get(name)
        .cloned()
        .unwrap_or_else(|| panic!("{name} has no account"))
}

pub(crate) fn latest_post(world: &SharedWorld) -> String {
    world
        .borrow()
        .latest_post
        .clone()
        .expect("a post was created")
}
