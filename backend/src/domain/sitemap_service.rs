//! Crawler documents built from public profiles and posts.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use crate::domain::Error;
use crate::domain::ports::{SitemapQuery, SitemapRepository, SitemapRepositoryError};
use crate::domain::service_errors::map_sitemap_error;
use crate::domain::sitemap::{home_entry, render_robots, render_sitemap, sitemap_entries};

/// Service implementing [`SitemapQuery`].
#[derive(Clone)]
pub struct SitemapService<R> {
    repo: Arc<R>,
    base_url: String,
}

impl<R> SitemapService<R> {
    /// Create a new service advertising pages under `base_url`.
    pub fn new(repo: Arc<R>, base_url: impl Into<String>) -> Self {
        Self {
            repo,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl<R> SitemapQuery for SitemapService<R>
where
    R: SitemapRepository,
{
    async fn sitemap_xml(&self) -> Result<String, Error> {
        let listings = async {
            let usernames = self.repo.usernames().await?;
            let posts = self.repo.posts().await?;
            Ok::<_, SitemapRepositoryError>((usernames, posts))
        }
        .await;
        let entries = match listings {
            Ok((usernames, posts)) => sitemap_entries(&self.base_url, &usernames, &posts),
            Err(error) => {
                let error = map_sitemap_error(error);
                warn!(error = %error, "sitemap listings unavailable; emitting home page only");
                vec![home_entry(&self.base_url)]
            }
        };
        Ok(render_sitemap(&entries))
    }

    fn robots_txt(&self) -> String {
        render_robots(&self.base_url)
    }
}
