//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use actix_web::cookie::{Key, SameSite};
use whoami::outbound::identity::UserinfoIdentityProvider;
use whoami::outbound::memory::InMemoryStore;
use whoami::outbound::persistence::DbPool;

/// Where repositories keep their rows.
#[derive(Clone)]
pub enum Storage {
    /// PostgreSQL through the Diesel adapters.
    Database(DbPool),
    /// Process-local tables; contents are lost on restart.
    Memory(Arc<InMemoryStore>),
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) storage: Storage,
    pub(crate) identity: Option<Arc<UserinfoIdentityProvider>>,
    pub(crate) feed_cache_ttl: Duration,
    pub(crate) public_base_url: String,
}

impl ServerConfig {
    /// Construct a server configuration from session and binding settings.
    #[must_use]
    pub fn new(
        key: Key,
        cookie_secure: bool,
        same_site: SameSite,
        bind_addr: SocketAddr,
        storage: Storage,
    ) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            storage,
            identity: None,
            feed_cache_ttl: Duration::ZERO,
            public_base_url: String::new(),
        }
    }

    /// Verify sign-in tokens at a userinfo endpoint instead of accepting
    /// development `dev:` tokens.
    #[must_use]
    pub fn with_identity_provider(mut self, provider: UserinfoIdentityProvider) -> Self {
        self.identity = Some(Arc::new(provider));
        self
    }

    /// Cache feed pages for `ttl`; zero disables the cache.
    #[must_use]
    pub fn with_feed_cache_ttl(mut self, ttl: Duration) -> Self {
        self.feed_cache_ttl = ttl;
        self
    }

    /// Origin written into the sitemap and robots.txt.
    #[must_use]
    pub fn with_public_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.public_base_url = base_url.into();
        self
    }
}
