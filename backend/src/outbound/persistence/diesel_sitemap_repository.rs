//! PostgreSQL-backed `SitemapRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{SitemapRepository, SitemapRepositoryError};
use crate::domain::{PostId, SitemapPost};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::pool::DbPool;
use super::schema::{posts, users};

/// Diesel-backed implementation of the `SitemapRepository` port.
#[derive(Clone)]
pub struct DieselSitemapRepository {
    pool: DbPool,
}

impl DieselSitemapRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SitemapRepository for DieselSitemapRepository {
    async fn usernames(&self) -> Result<Vec<String>, SitemapRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let usernames = users::table
            .order_by(users::username.asc())
            .select(users::username)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(usernames)
    }

    async fn posts(&self) -> Result<Vec<SitemapPost>, SitemapRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<(String, Uuid, DateTime<Utc>)> = posts::table
            .inner_join(users::table)
            .order_by((posts::created_at.desc(), posts::id.desc()))
            .select((users::username, posts::id, posts::updated_at))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows
            .into_iter()
            .map(|(username, id, updated_at)| SitemapPost {
                username,
                id: PostId::from_uuid(id),
                updated_at,
            })
            .collect())
    }
}
