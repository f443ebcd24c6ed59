//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`FeedCache`], [`IdentityProvider`]) are
//! implemented by outbound adapters. Driving ports (`*Command`, `*Query`) are
//! implemented by domain services and consumed by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod feed_cache;
mod feed_query;
mod follow_repository;
mod identity_provider;
mod onboarding_command;
mod portfolio_command;
mod portfolio_repository;
mod post_command;
mod post_repository;
mod profile_command;
mod profile_query;
mod search_query;
mod search_repository;
mod session_command;
mod sitemap_query;
mod sitemap_repository;
mod user_repository;

#[cfg(test)]
pub use feed_cache::MockFeedCache;
pub use feed_cache::{CacheTag, DisabledFeedCache, FeedCache, FeedCacheError, FeedCacheKey, FeedScope};
#[cfg(test)]
pub use feed_query::MockFeedQuery;
pub use feed_query::FeedQuery;
#[cfg(test)]
pub use follow_repository::MockFollowRepository;
pub use follow_repository::{FollowCounts, FollowRepository, FollowRepositoryError};
#[cfg(test)]
pub use identity_provider::MockIdentityProvider;
pub use identity_provider::{
    FIXTURE_TOKEN_PREFIX, FixtureIdentityProvider, IdentityProvider, IdentityProviderError,
};
#[cfg(test)]
pub use onboarding_command::MockOnboardingCommand;
pub use onboarding_command::OnboardingCommand;
#[cfg(test)]
pub use portfolio_command::MockPortfolioCommand;
pub use portfolio_command::PortfolioCommand;
#[cfg(test)]
pub use portfolio_repository::MockPortfolioRepository;
pub use portfolio_repository::{PortfolioRepository, PortfolioRepositoryError};
#[cfg(test)]
pub use post_command::MockPostCommand;
pub use post_command::{InteractionResult, PostCommand};
#[cfg(test)]
pub use post_repository::MockPostRepository;
pub use post_repository::{PostRepository, PostRepositoryError};
#[cfg(test)]
pub use profile_command::MockProfileCommand;
pub use profile_command::ProfileCommand;
#[cfg(test)]
pub use profile_query::MockProfileQuery;
pub use profile_query::ProfileQuery;
#[cfg(test)]
pub use search_query::MockSearchQuery;
pub use search_query::SearchQuery;
#[cfg(test)]
pub use search_repository::MockSearchRepository;
pub use search_repository::{SearchRepository, SearchRepositoryError};
#[cfg(test)]
pub use session_command::MockSessionCommand;
pub use session_command::{SessionCommand, SignInOutcome};
#[cfg(test)]
pub use sitemap_query::MockSitemapQuery;
pub use sitemap_query::SitemapQuery;
#[cfg(test)]
pub use sitemap_repository::MockSitemapRepository;
pub use sitemap_repository::{SitemapRepository, SitemapRepositoryError};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{
    EMAIL_CONSTRAINT, SUBJECT_CONSTRAINT, USERNAME_CONSTRAINT, UserRepository,
    UserRepositoryError,
};
