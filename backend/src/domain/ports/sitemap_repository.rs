//! Port listing the public pages advertised to crawlers.
use async_trait::async_trait;

use crate::domain::SitemapPost;

use super::define_port_error;

define_port_error! {
    /// Errors raised while listing sitemap sources.
    pub enum SitemapRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "sitemap repository connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } => "sitemap repository query failed: {message}",
    }
}

/// Read-only listing of profiles and posts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SitemapRepository: Send + Sync {
    /// Every username.
    async fn usernames(&self) -> Result<Vec<String>, SitemapRepositoryError>;

    /// Every post with its author's username.
    async fn posts(&self) -> Result<Vec<SitemapPost>, SitemapRepositoryError>;
}
