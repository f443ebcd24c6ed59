//! Cross-category search with an independent keyset cursor per category.

use std::sync::Arc;

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::ports::{SearchQuery, SearchRepository};
use crate::domain::search::user_key;
use crate::domain::service_errors::{decode_cursor, map_page_error, map_search_error};
use crate::domain::{
    Error, PostHit, RetryPolicy, SEARCH_PAGE_SIZE, SearchFilter, SearchKey, SearchRequest,
    SearchResults, SearchTerm,
};

fn page_request(raw: Option<&str>) -> Result<PageRequest<SearchKey>, Error> {
    Ok(PageRequest::new(
        decode_cursor(raw)?,
        None,
        SEARCH_PAGE_SIZE,
        SEARCH_PAGE_SIZE,
    ))
}

/// Service implementing [`SearchQuery`].
#[derive(Clone)]
pub struct SearchService<S> {
    repo: Arc<S>,
    retry: RetryPolicy,
}

impl<S> SearchService<S> {
    /// Create a new service using the default retry policy.
    pub fn new(repo: Arc<S>) -> Self {
        Self {
            repo,
            retry: RetryPolicy::default(),
        }
    }

    /// Replace the retry policy.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

#[async_trait]
impl<S> SearchQuery for SearchService<S>
where
    S: SearchRepository,
{
    async fn search(&self, request: SearchRequest) -> Result<SearchResults, Error> {
        let Some(term) = SearchTerm::parse(&request.query) else {
            return Ok(SearchResults::default());
        };
        let filter = request.filter;
        let cursors = &request.cursors;
        let mut results = SearchResults::default();

        if filter.includes(SearchFilter::Users) {
            let page = page_request(cursors.users.as_deref())?;
            let after = page.after().copied();
            let rows = self
                .retry
                .run("search_users", || {
                    self.repo.users(&term, after, page.fetch_limit())
                })
                .await
                .map_err(map_search_error)?;
            results.users = Page::from_overfetched(rows, page.limit(), |user| {
                user_key(user.id, user.created_at)
            })
            .map_err(map_page_error)?
            .map(|user| user.summary());
        }

        if filter.includes(SearchFilter::Posts) {
            let page = page_request(cursors.posts.as_deref())?;
            let after = page.after().copied();
            let rows = self
                .retry
                .run("search_posts", || {
                    self.repo.posts(&term, after, page.fetch_limit())
                })
                .await
                .map_err(map_search_error)?;
            results.posts = Page::from_overfetched(rows, page.limit(), |post| SearchKey {
                created_at: post.created_at,
                id: *post.id.as_uuid(),
            })
            .map_err(map_page_error)?
            .map(PostHit::from);
        }

        if filter.includes(SearchFilter::Projects) {
            let page = page_request(cursors.projects.as_deref())?;
            let after = page.after().copied();
            let rows = self
                .retry
                .run("search_projects", || {
                    self.repo.projects(&term, after, page.fetch_limit())
                })
                .await
                .map_err(map_search_error)?;
            results.projects = Page::from_overfetched(rows, page.limit(), |project| SearchKey {
                created_at: project.created_at,
                id: *project.id.as_uuid(),
            })
            .map_err(map_page_error)?;
        }

        if filter.includes(SearchFilter::Experiences) {
            let page = page_request(cursors.experiences.as_deref())?;
            let after = page.after().copied();
            let rows = self
                .retry
                .run("search_experiences", || {
                    self.repo.experiences(&term, after, page.fetch_limit())
                })
                .await
                .map_err(map_search_error)?;
            results.experiences =
                Page::from_overfetched(rows, page.limit(), |experience| SearchKey {
                    created_at: experience.created_at,
                    id: *experience.id.as_uuid(),
                })
                .map_err(map_page_error)?;
        }

        Ok(results)
    }
}
