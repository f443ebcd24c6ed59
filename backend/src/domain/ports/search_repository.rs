//! Port for substring search across categories.
use async_trait::async_trait;

use crate::domain::{Experience, PostRecord, Project, SearchKey, SearchTerm, User};

use super::define_port_error;

define_port_error! {
    /// Errors raised by search adapters.
    pub enum SearchRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "search repository connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } => "search repository query failed: {message}",
    }
    transient: Connection
}

/// Case-insensitive substring search, newest first, keyset paged.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SearchRepository: Send + Sync {
    /// Users whose username, full name, or description match.
    async fn users(
        &self,
        term: &SearchTerm,
        after: Option<SearchKey>,
        fetch_limit: usize,
    ) -> Result<Vec<User>, SearchRepositoryError>;

    /// Top-level posts whose text matches.
    async fn posts(
        &self,
        term: &SearchTerm,
        after: Option<SearchKey>,
        fetch_limit: usize,
    ) -> Result<Vec<PostRecord>, SearchRepositoryError>;

    /// Projects whose title, description, or client match.
    async fn projects(
        &self,
        term: &SearchTerm,
        after: Option<SearchKey>,
        fetch_limit: usize,
    ) -> Result<Vec<Project>, SearchRepositoryError>;

    /// Experiences whose title, company, or description match.
    async fn experiences(
        &self,
        term: &SearchTerm,
        after: Option<SearchKey>,
        fetch_limit: usize,
    ) -> Result<Vec<Experience>, SearchRepositoryError>;
}
