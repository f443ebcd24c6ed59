//! Driving port for search.

use async_trait::async_trait;

use crate::domain::{Error, SearchRequest, SearchResults};

/// Domain use-case port for cross-category search.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SearchQuery: Send + Sync {
    /// Run a search; an empty query yields empty results.
    async fn search(&self, request: SearchRequest) -> Result<SearchResults, Error>;
}
