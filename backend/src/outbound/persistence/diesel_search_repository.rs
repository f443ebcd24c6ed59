//! PostgreSQL-backed `SearchRepository` implementation using Diesel ORM.
//!
//! Every category matches the escaped `ILIKE` pattern from
//! [`SearchTerm::like_pattern`] and pages newest first on
//! `(created_at, id)`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{SearchRepository, SearchRepositoryError};
use crate::domain::{Experience, PostRecord, Project, SearchKey, SearchTerm, User};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error, map_row_error};
use super::diesel_helpers::collect_rows;
use super::models::{
    AuthorRow, ExperienceRow, PostRow, PostWithAuthor, ProjectRow, UserRow, row_to_post,
};
use super::pool::DbPool;
use super::schema::{experiences, posts, projects, users};

/// Diesel-backed implementation of the `SearchRepository` port.
#[derive(Clone)]
pub struct DieselSearchRepository {
    pool: DbPool,
}

impl DieselSearchRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Keep rows strictly older than the boundary, then order newest first.
macro_rules! newest_after {
    ($query:ident, $table:ident, $after:expr, $limit:expr) => {{
        if let Some(after) = $after {
            $query = $query.filter(
                $table::created_at.lt(after.created_at).or($table::created_at
                    .eq(after.created_at)
                    .and($table::id.lt(after.id))),
            );
        }
        $query
            .order_by(($table::created_at.desc(), $table::id.desc()))
            .limit(i64::try_from($limit).unwrap_or(i64::MAX))
    }};
}

#[async_trait]
impl SearchRepository for DieselSearchRepository {
    async fn users(
        &self,
        term: &SearchTerm,
        after: Option<SearchKey>,
        fetch_limit: usize,
    ) -> Result<Vec<User>, SearchRepositoryError> {
        let pattern = term.like_pattern();
        let mut query = users::table
            .filter(
                users::username
                    .ilike(pattern.clone())
                    .or(users::full_name.ilike(pattern.clone()))
                    .or(users::description.ilike(pattern)),
            )
            .select(UserRow::as_select())
            .into_boxed();
        let query = newest_after!(query, users, after, fetch_limit);

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<UserRow> = query.load(&mut conn).await.map_err(map_diesel_error)?;
        Ok(collect_rows(rows.into_iter().map(User::try_from), map_row_error)?)
    }

    async fn posts(
        &self,
        term: &SearchTerm,
        after: Option<SearchKey>,
        fetch_limit: usize,
    ) -> Result<Vec<PostRecord>, SearchRepositoryError> {
        let mut query = posts::table
            .inner_join(users::table)
            .filter(posts::parent_id.is_null())
            .filter(posts::text.ilike(term.like_pattern()))
            .select((PostRow::as_select(), AuthorRow::as_select()))
            .into_boxed();
        let query = newest_after!(query, posts, after, fetch_limit);

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<PostWithAuthor> = query.load(&mut conn).await.map_err(map_diesel_error)?;
        Ok(collect_rows(rows.into_iter().map(row_to_post), map_row_error)?)
    }

    async fn projects(
        &self,
        term: &SearchTerm,
        after: Option<SearchKey>,
        fetch_limit: usize,
    ) -> Result<Vec<Project>, SearchRepositoryError> {
        let pattern = term.like_pattern();
        let mut query = projects::table
            .filter(
                projects::title
                    .ilike(pattern.clone())
                    .or(projects::description.ilike(pattern.clone()))
                    .or(projects::client.ilike(pattern)),
            )
            .select(ProjectRow::as_select())
            .into_boxed();
        let query = newest_after!(query, projects, after, fetch_limit);

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<ProjectRow> = query.load(&mut conn).await.map_err(map_diesel_error)?;
        Ok(collect_rows(rows.into_iter().map(Project::try_from), map_row_error)?)
    }

    async fn experiences(
        &self,
        term: &SearchTerm,
        after: Option<SearchKey>,
        fetch_limit: usize,
    ) -> Result<Vec<Experience>, SearchRepositoryError> {
        let pattern = term.like_pattern();
        let mut query = experiences::table
            .filter(
                experiences::title
                    .ilike(pattern.clone())
                    .or(experiences::company.ilike(pattern.clone()))
                    .or(experiences::description.ilike(pattern)),
            )
            .select(ExperienceRow::as_select())
            .into_boxed();
        let query = newest_after!(query, experiences, after, fetch_limit);

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<ExperienceRow> = query.load(&mut conn).await.map_err(map_diesel_error)?;
        Ok(collect_rows(rows.into_iter().map(Experience::try_from), map_row_error)?)
    }
}
