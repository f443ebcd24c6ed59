//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    FeedQuery, OnboardingCommand, PortfolioCommand, PostCommand, ProfileCommand, ProfileQuery,
    SearchQuery, SessionCommand, SitemapQuery,
};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    /// Sign in through the identity provider.
    pub session: Arc<dyn SessionCommand>,
    /// Username suggestion and account setup.
    pub onboarding: Arc<dyn OnboardingCommand>,
    /// Profile edits and follows.
    pub profile: Arc<dyn ProfileCommand>,
    /// Profile pages and follow lists.
    pub profile_query: Arc<dyn ProfileQuery>,
    /// Post creation, deletion, and interactions.
    pub posts: Arc<dyn PostCommand>,
    /// Feed, replies, and bookmarks.
    pub feed: Arc<dyn FeedQuery>,
    /// Projects, experiences, and contact methods.
    pub portfolio: Arc<dyn PortfolioCommand>,
    /// Cross-category search.
    pub search: Arc<dyn SearchQuery>,
    /// Sitemap and robots.txt.
    pub sitemap: Arc<dyn SitemapQuery>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Sign in through the identity provider.
    pub session: Arc<dyn SessionCommand>,
    /// Username suggestion and account setup.
    pub onboarding: Arc<dyn OnboardingCommand>,
    /// Profile edits and follows.
    pub profile: Arc<dyn ProfileCommand>,
    /// Profile pages and follow lists.
    pub profile_query: Arc<dyn ProfileQuery>,
    /// Post creation, deletion, and interactions.
    pub posts: Arc<dyn PostCommand>,
    /// Feed, replies, and bookmarks.
    pub feed: Arc<dyn FeedQuery>,
    /// Projects, experiences, and contact methods.
    pub portfolio: Arc<dyn PortfolioCommand>,
    /// Cross-category search.
    pub search: Arc<dyn SearchQuery>,
    /// Sitemap and robots.txt.
    pub sitemap: Arc<dyn SitemapQuery>,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    /// Construct state from a ports bundle.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use mockable::DefaultClock;
    /// use whoami::domain::ports::{DisabledFeedCache, FixtureIdentityProvider};
    /// use whoami::domain::{
    ///     OnboardingService, PortfolioService, PostService, ProfileService, SearchService,
    ///     SessionService, SitemapService,
    /// };
    /// use whoami::inbound::http::state::{HttpState, HttpStatePorts};
    /// use whoami::outbound::memory::InMemoryStore;
    ///
    /// let store = Arc::new(InMemoryStore::new(Arc::new(DefaultClock)));
    /// let cache = Arc::new(DisabledFeedCache);
    /// let posts = Arc::new(PostService::new(store.clone(), store.clone(), cache.clone()));
    /// let profiles = Arc::new(ProfileService::new(
    ///     store.clone(),
    ///     store.clone(),
    ///     store.clone(),
    ///     store.clone(),
    ///     cache,
    /// ));
    /// let state = HttpState::new(HttpStatePorts {
    ///     session: Arc::new(SessionService::new(Arc::new(FixtureIdentityProvider), store.clone())),
    ///     onboarding: Arc::new(OnboardingService::new(store.clone())),
    ///     profile: profiles.clone(),
    ///     profile_query: profiles,
    ///     posts: posts.clone(),
    ///     feed: posts,
    ///     portfolio: Arc::new(PortfolioService::new(store.clone())),
    ///     search: Arc::new(SearchService::new(store.clone())),
    ///     sitemap: Arc::new(SitemapService::new(store, "https://whoami.page")),
    /// });
    /// let _feed = state.feed.clone();
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            session,
            onboarding,
            profile,
            profile_query,
            posts,
            feed,
            portfolio,
            search,
            sitemap,
        } = ports;
        Self {
            session,
            onboarding,
            profile,
            profile_query,
            posts,
            feed,
            portfolio,
            search,
            sitemap,
        }
    }
}
