//! Driving port for crawler documents.

use async_trait::async_trait;

use crate::domain::Error;

/// Domain use-case port for sitemap.xml and robots.txt.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SitemapQuery: Send + Sync {
    /// Render the sitemap, falling back to the home page alone.
    async fn sitemap_xml(&self) -> Result<String, Error>;

    /// Render robots.txt.
    fn robots_txt(&self) -> String;
}
