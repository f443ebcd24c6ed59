//! PostgreSQL-backed `FollowRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{FollowCounts, FollowRepository, FollowRepositoryError};
use crate::domain::{UserId, UserSummary};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{AuthorRow, counter};
use super::pool::DbPool;
use super::schema::{follows, users};

/// Diesel-backed implementation of the `FollowRepository` port.
#[derive(Clone)]
pub struct DieselFollowRepository {
    pool: DbPool,
}

impl DieselFollowRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn summaries(rows: Vec<AuthorRow>) -> Vec<UserSummary> {
    rows.into_iter().map(UserSummary::from).collect()
}

#[async_trait]
impl FollowRepository for DieselFollowRepository {
    async fn toggle(
        &self,
        follower: &UserId,
        following: &UserId,
    ) -> Result<bool, FollowRepositoryError> {
        let follower = *follower.as_uuid();
        let following = *following.as_uuid();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let following = conn.transaction(|conn| {
            async move {
                let removed = diesel::delete(
                    follows::table
                        .filter(follows::follower_id.eq(follower))
                        .filter(follows::following_id.eq(following)),
                )
                .execute(conn)
                .await?;
                if removed > 0 {
                    return Ok(false);
                }
                diesel::insert_into(follows::table)
                    .values((
                        follows::follower_id.eq(follower),
                        follows::following_id.eq(following),
                    ))
                    .on_conflict_do_nothing()
                    .execute(conn)
                    .await?;
                Ok(true)
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)?;
        Ok(following)
    }

    async fn is_following(
        &self,
        follower: &UserId,
        following: &UserId,
    ) -> Result<bool, FollowRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let following = diesel::select(diesel::dsl::exists(
            follows::table
                .filter(follows::follower_id.eq(follower.as_uuid()))
                .filter(follows::following_id.eq(following.as_uuid())),
        ))
        .get_result(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(following)
    }

    async fn followed_among(
        &self,
        follower: &UserId,
        candidates: &[UserId],
    ) -> Result<Vec<UserId>, FollowRepositoryError> {
        if candidates.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<Uuid> = candidates.iter().map(|id| *id.as_uuid()).collect();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let followed: Vec<Uuid> = follows::table
            .filter(follows::follower_id.eq(follower.as_uuid()))
            .filter(follows::following_id.eq_any(ids))
            .select(follows::following_id)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(followed.into_iter().map(UserId::from_uuid).collect())
    }

    async fn followers(&self, user: &UserId) -> Result<Vec<UserSummary>, FollowRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<AuthorRow> = users::table
            .inner_join(follows::table.on(follows::follower_id.eq(users::id)))
            .filter(follows::following_id.eq(user.as_uuid()))
            .order_by(follows::created_at.desc())
            .select(AuthorRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(summaries(rows))
    }

    async fn following(&self, user: &UserId) -> Result<Vec<UserSummary>, FollowRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<AuthorRow> = users::table
            .inner_join(follows::table.on(follows::following_id.eq(users::id)))
            .filter(follows::follower_id.eq(user.as_uuid()))
            .order_by(follows::created_at.desc())
            .select(AuthorRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(summaries(rows))
    }

    async fn counts(&self, user: &UserId) -> Result<FollowCounts, FollowRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let followers: i64 = follows::table
            .filter(follows::following_id.eq(user.as_uuid()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let following: i64 = follows::table
            .filter(follows::follower_id.eq(user.as_uuid()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(FollowCounts {
            followers: counter(followers),
            following: counter(following),
        })
    }
}
