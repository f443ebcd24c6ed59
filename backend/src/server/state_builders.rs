//! Builders wiring repositories, the feed cache, and the identity provider
//! into the HTTP state.
//!
//! Services are generic over their driven ports, so the runtime choices
//! (database or memory, cache on or off, userinfo or fixture identities) are
//! resolved by dispatching into monomorphised builders.

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;
use tracing::info;

use whoami::domain::ports::{
    DisabledFeedCache, FeedCache, FixtureIdentityProvider, FollowRepository, IdentityProvider,
    PortfolioRepository, PostRepository, SearchRepository, SitemapRepository, UserRepository,
};
use whoami::domain::{
    OnboardingService, PortfolioService, PostService, ProfileService, SearchService,
    SessionService, SitemapService,
};
use whoami::inbound::http::state::{HttpState, HttpStatePorts};
use whoami::outbound::cache::InMemoryFeedCache;
use whoami::outbound::memory::InMemoryStore;
use whoami::outbound::persistence::{
    DbPool, DieselFollowRepository, DieselPortfolioRepository, DieselPostRepository,
    DieselSearchRepository, DieselSitemapRepository, DieselUserRepository,
};

use super::config::{ServerConfig, Storage};

/// Driven repository ports shared by the services.
struct Repositories<U, F, P, Pf, S, M> {
    users: Arc<U>,
    follows: Arc<F>,
    posts: Arc<P>,
    portfolio: Arc<Pf>,
    search: Arc<S>,
    sitemap: Arc<M>,
}

type DieselRepositories = Repositories<
    DieselUserRepository,
    DieselFollowRepository,
    DieselPostRepository,
    DieselPortfolioRepository,
    DieselSearchRepository,
    DieselSitemapRepository,
>;

type MemoryRepositories = Repositories<
    InMemoryStore,
    InMemoryStore,
    InMemoryStore,
    InMemoryStore,
    InMemoryStore,
    InMemoryStore,
>;

fn diesel_repositories(pool: &DbPool) -> DieselRepositories {
    Repositories {
        users: Arc::new(DieselUserRepository::new(pool.clone())),
        follows: Arc::new(DieselFollowRepository::new(pool.clone())),
        posts: Arc::new(DieselPostRepository::new(pool.clone())),
        portfolio: Arc::new(DieselPortfolioRepository::new(pool.clone())),
        search: Arc::new(DieselSearchRepository::new(pool.clone())),
        sitemap: Arc::new(DieselSitemapRepository::new(pool.clone())),
    }
}

fn memory_repositories(store: &Arc<InMemoryStore>) -> MemoryRepositories {
    Repositories {
        users: store.clone(),
        follows: store.clone(),
        posts: store.clone(),
        portfolio: store.clone(),
        search: store.clone(),
        sitemap: store.clone(),
    }
}

/// Build the HTTP state for `config`.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let state = match &config.storage {
        Storage::Database(pool) => with_cache(config, diesel_repositories(pool)),
        Storage::Memory(store) => with_cache(config, memory_repositories(store)),
    };
    web::Data::new(state)
}

fn with_cache<U, F, P, Pf, S, M>(
    config: &ServerConfig,
    repos: Repositories<U, F, P, Pf, S, M>,
) -> HttpState
where
    U: UserRepository + 'static,
    F: FollowRepository + 'static,
    P: PostRepository + 'static,
    Pf: PortfolioRepository + 'static,
    S: SearchRepository + 'static,
    M: SitemapRepository + 'static,
{
    if config.feed_cache_ttl.is_zero() {
        info!("feed cache disabled");
        return with_identity(config, repos, Arc::new(DisabledFeedCache));
    }
    info!(ttl_secs = config.feed_cache_ttl.as_secs(), "feed cache enabled");
    let cache = InMemoryFeedCache::new(config.feed_cache_ttl, Arc::new(DefaultClock));
    with_identity(config, repos, Arc::new(cache))
}

fn with_identity<U, F, P, Pf, S, M, C>(
    config: &ServerConfig,
    repos: Repositories<U, F, P, Pf, S, M>,
    cache: Arc<C>,
) -> HttpState
where
    U: UserRepository + 'static,
    F: FollowRepository + 'static,
    P: PostRepository + 'static,
    Pf: PortfolioRepository + 'static,
    S: SearchRepository + 'static,
    M: SitemapRepository + 'static,
    C: FeedCache + 'static,
{
    match &config.identity {
        Some(provider) => assemble(config, repos, cache, provider.clone()),
        None => {
            info!("accepting development identity tokens");
            assemble(config, repos, cache, Arc::new(FixtureIdentityProvider))
        }
    }
}

fn assemble<U, F, P, Pf, S, M, C, I>(
    config: &ServerConfig,
    repos: Repositories<U, F, P, Pf, S, M>,
    cache: Arc<C>,
    identity: Arc<I>,
) -> HttpState
where
    U: UserRepository + 'static,
    F: FollowRepository + 'static,
    P: PostRepository + 'static,
    Pf: PortfolioRepository + 'static,
    S: SearchRepository + 'static,
    M: SitemapRepository + 'static,
    C: FeedCache + 'static,
    I: IdentityProvider + 'static,
{
    let Repositories {
        users,
        follows,
        posts,
        portfolio,
        search,
        sitemap,
    } = repos;

    let post_service = Arc::new(PostService::new(
        posts.clone(),
        follows.clone(),
        cache.clone(),
    ));
    let profile_service = Arc::new(ProfileService::new(
        users.clone(),
        follows,
        portfolio.clone(),
        posts,
        cache,
    ));

    HttpState::new(HttpStatePorts {
        session: Arc::new(SessionService::new(identity, users.clone())),
        onboarding: Arc::new(OnboardingService::new(users)),
        profile: profile_service.clone(),
        profile_query: profile_service,
        posts: post_service.clone(),
        feed: post_service,
        portfolio: Arc::new(PortfolioService::new(portfolio)),
        search: Arc::new(SearchService::new(search)),
        sitemap: Arc::new(SitemapService::new(
            sitemap,
            config.public_base_url.clone(),
        )),
    })
}
