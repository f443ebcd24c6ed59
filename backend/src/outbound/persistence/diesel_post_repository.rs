//! PostgreSQL-backed `PostRepository` implementation using Diesel ORM.
//!
//! Feeds page with keyset predicates over `(created_at, id)`, or
//! `(like_count, created_at, id)` for the top view, matching the indexes in
//! the initial migration. Interaction toggles lock the post row so the
//! denormalised like and repost counters stay consistent with their tables.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{PostRepository, PostRepositoryError};
use crate::domain::{
    FeedFilter, FeedView, InteractionKind, NewPost, PostCounts, PostCursorKey, PostId,
    PostRecord, ToggleOutcome, UserId, ViewerFlags,
};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error, map_row_error};
use super::diesel_helpers::{collect_rows, lower};
use super::models::{AuthorRow, NewPostRow, PostRow, PostWithAuthor, counter, row_to_post};
use super::pool::DbPool;
use super::schema::{bookmarks, follows, likes, posts, reposts, users};

/// Diesel-backed implementation of the `PostRepository` port.
#[derive(Clone)]
pub struct DieselPostRepository {
    pool: DbPool,
}

impl DieselPostRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn sql_limit(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

fn to_records(rows: Vec<PostWithAuthor>) -> Result<Vec<PostRecord>, PostRepositoryError> {
    Ok(collect_rows(rows.into_iter().map(row_to_post), map_row_error)?)
}

/// Posts joined with their authors, boxed so filters can be added
/// conditionally.
macro_rules! post_listing {
    () => {
        posts::table
            .inner_join(users::table)
            .select((PostRow::as_select(), AuthorRow::as_select()))
            .into_boxed()
    };
}

/// Restrict `$query` to rows strictly after the cursor boundary.
///
/// A boundary carrying a like count pages the top ordering; otherwise the
/// chronological ordering.
macro_rules! after_boundary {
    ($query:ident, $after:expr) => {
        if let Some(after) = $after {
            let created = after.created_at;
            let id = *after.id.as_uuid();
            let older = posts::created_at
                .lt(created)
                .or(posts::created_at.eq(created).and(posts::id.lt(id)));
            $query = match after.like_count {
                Some(likes) => {
                    let likes = i64::try_from(likes).unwrap_or(i64::MAX);
                    $query.filter(
                        posts::like_count
                            .lt(likes)
                            .or(posts::like_count.eq(likes).and(older)),
                    )
                }
                None => $query.filter(older),
            };
        }
    };
}

/// Delete the interaction row when present, otherwise insert it.
///
/// Evaluates to whether the interaction is active afterwards.
macro_rules! flip_interaction {
    ($conn:ident, $table:ident, $user:expr, $post:expr) => {{
        let removed = diesel::delete(
            $table::table
                .filter($table::user_id.eq($user))
                .filter($table::post_id.eq($post)),
        )
        .execute($conn)
        .await?;
        if removed == 0 {
            diesel::insert_into($table::table)
                .values(($table::user_id.eq($user), $table::post_id.eq($post)))
                .execute($conn)
                .await?;
        }
        removed == 0
    }};
}

async fn load_record(
    conn: &mut AsyncPgConnection,
    id: Uuid,
) -> Result<Option<PostWithAuthor>, diesel::result::Error> {
    post_listing!()
        .filter(posts::id.eq(id))
        .first(conn)
        .await
        .optional()
}

#[async_trait]
impl PostRepository for DieselPostRepository {
    async fn create(&self, post: &NewPost) -> Result<PostRecord, PostRepositoryError> {
        let row = NewPostRow {
            id: Uuid::new_v4(),
            author_id: *post.author_id.as_uuid(),
            text: post.text.as_ref(),
            images: &post.images,
            reply_privacy: post.reply_privacy.as_str(),
            parent_id: post.parent_id.map(|id| *id.as_uuid()),
        };
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let created = conn
            .transaction(|conn| {
                async move {
                    diesel::insert_into(posts::table)
                        .values(&row)
                        .execute(conn)
                        .await?;
                    if let Some(parent) = row.parent_id {
                        diesel::update(posts::table.find(parent))
                            .set(posts::reply_count.eq(posts::reply_count + 1_i64))
                            .execute(conn)
                            .await?;
                    }
                    post_listing!()
                        .filter(posts::id.eq(row.id))
                        .first::<PostWithAuthor>(conn)
                        .await
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;
        Ok(row_to_post(created).map_err(map_row_error)?)
    }

    async fn find(&self, id: &PostId) -> Result<Option<PostRecord>, PostRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = load_record(&mut conn, *id.as_uuid())
            .await
            .map_err(map_diesel_error)?;
        Ok(row.map(row_to_post).transpose().map_err(map_row_error)?)
    }

    async fn delete_with_replies(&self, id: &PostId) -> Result<(), PostRepositoryError> {
        let id = *id.as_uuid();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        conn.transaction(|conn| {
            async move {
                let parent: Option<Option<Uuid>> = posts::table
                    .find(id)
                    .select(posts::parent_id)
                    .for_update()
                    .first(conn)
                    .await
                    .optional()?;
                let Some(parent) = parent else {
                    return Ok(());
                };
                diesel::delete(posts::table.filter(posts::parent_id.eq(id)))
                    .execute(conn)
                    .await?;
                diesel::delete(posts::table.find(id)).execute(conn).await?;
                if let Some(parent) = parent {
                    diesel::update(
                        posts::table
                            .find(parent)
                            .filter(posts::reply_count.gt(0_i64)),
                    )
                    .set(posts::reply_count.eq(posts::reply_count - 1_i64))
                    .execute(conn)
                    .await?;
                }
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn feed(
        &self,
        filter: &FeedFilter,
        after: Option<PostCursorKey>,
        fetch_limit: usize,
    ) -> Result<Vec<PostRecord>, PostRepositoryError> {
        let mut query = post_listing!();
        if filter.top_level_only {
            query = query.filter(posts::parent_id.is_null());
        }
        if let Some(author) = filter.author.clone() {
            query = query.filter(lower(users::username).eq(author));
        }
        if filter.view == FeedView::Following {
            let Some(viewer) = filter.viewer else {
                return Ok(Vec::new());
            };
            query = query.filter(
                posts::author_id.eq_any(
                    follows::table
                        .filter(follows::follower_id.eq(*viewer.as_uuid()))
                        .select(follows::following_id),
                ),
            );
        }
        after_boundary!(query, after);
        query = match filter.view {
            FeedView::Top => query.order_by((
                posts::like_count.desc(),
                posts::created_at.desc(),
                posts::id.desc(),
            )),
            FeedView::All | FeedView::Following => {
                query.order_by((posts::created_at.desc(), posts::id.desc()))
            }
        };

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<PostWithAuthor> = query
            .limit(sql_limit(fetch_limit))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        to_records(rows)
    }

    async fn replies(
        &self,
        parent: &PostId,
        after: Option<PostCursorKey>,
        fetch_limit: usize,
    ) -> Result<Vec<PostRecord>, PostRepositoryError> {
        let mut query = post_listing!().filter(posts::parent_id.eq(*parent.as_uuid()));
        after_boundary!(query, after);
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<PostWithAuthor> = query
            .order_by((posts::created_at.desc(), posts::id.desc()))
            .limit(sql_limit(fetch_limit))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        to_records(rows)
    }

    async fn reply_previews(
        &self,
        parents: &[PostId],
        per_parent: usize,
    ) -> Result<Vec<PostRecord>, PostRepositoryError> {
        if parents.is_empty() || per_parent == 0 {
            return Ok(Vec::new());
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut rows = Vec::new();
        for parent in parents {
            let batch: Vec<PostWithAuthor> = post_listing!()
                .filter(posts::parent_id.eq(*parent.as_uuid()))
                .order_by((posts::created_at.desc(), posts::id.desc()))
                .limit(sql_limit(per_parent))
                .load(&mut conn)
                .await
                .map_err(map_diesel_error)?;
            rows.extend(batch);
        }
        to_records(rows)
    }

    async fn bookmarks(
        &self,
        user: &UserId,
        after: Option<PostCursorKey>,
        fetch_limit: usize,
    ) -> Result<Vec<PostRecord>, PostRepositoryError> {
        let mut query = posts::table
            .inner_join(users::table)
            .inner_join(bookmarks::table)
            .filter(bookmarks::user_id.eq(*user.as_uuid()))
            .select((PostRow::as_select(), AuthorRow::as_select()))
            .into_boxed();
        after_boundary!(query, after);
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<PostWithAuthor> = query
            .order_by((posts::created_at.desc(), posts::id.desc()))
            .limit(sql_limit(fetch_limit))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        to_records(rows)
    }

    async fn viewer_flags(
        &self,
        viewer: &UserId,
        posts: &[PostId],
    ) -> Result<HashMap<PostId, ViewerFlags>, PostRepositoryError> {
        if posts.is_empty() {
            return Ok(HashMap::new());
        }
        let viewer = *viewer.as_uuid();
        let ids: Vec<Uuid> = posts.iter().map(|id| *id.as_uuid()).collect();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let liked: Vec<Uuid> = likes::table
            .filter(likes::user_id.eq(viewer))
            .filter(likes::post_id.eq_any(&ids))
            .select(likes::post_id)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let bookmarked: Vec<Uuid> = bookmarks::table
            .filter(bookmarks::user_id.eq(viewer))
            .filter(bookmarks::post_id.eq_any(&ids))
            .select(bookmarks::post_id)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let reposted: Vec<Uuid> = reposts::table
            .filter(reposts::user_id.eq(viewer))
            .filter(reposts::post_id.eq_any(&ids))
            .select(reposts::post_id)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let mut flags: HashMap<PostId, ViewerFlags> = HashMap::new();
        for id in liked {
            flags.entry(PostId::from_uuid(id)).or_default().is_liked = true;
        }
        for id in bookmarked {
            flags.entry(PostId::from_uuid(id)).or_default().is_bookmarked = true;
        }
        for id in reposted {
            flags.entry(PostId::from_uuid(id)).or_default().is_reposted = true;
        }
        Ok(flags)
    }

    async fn toggle_interaction(
        &self,
        kind: InteractionKind,
        user: &UserId,
        post: &PostId,
    ) -> Result<Option<ToggleOutcome>, PostRepositoryError> {
        let user = *user.as_uuid();
        let post = *post.as_uuid();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let outcome = conn.transaction(|conn| {
            async move {
                let locked: Option<Uuid> = posts::table
                    .find(post)
                    .select(posts::id)
                    .for_update()
                    .first(conn)
                    .await
                    .optional()?;
                if locked.is_none() {
                    return Ok(None);
                }
                let active = match kind {
                    InteractionKind::Like => flip_interaction!(conn, likes, user, post),
                    InteractionKind::Bookmark => flip_interaction!(conn, bookmarks, user, post),
                    InteractionKind::Repost => flip_interaction!(conn, reposts, user, post),
                };
                let delta = if active { 1_i64 } else { -1_i64 };
                match kind {
                    InteractionKind::Like => {
                        diesel::update(posts::table.find(post))
                            .set(posts::like_count.eq(posts::like_count + delta))
                            .execute(conn)
                            .await?;
                    }
                    InteractionKind::Repost => {
                        diesel::update(posts::table.find(post))
                            .set(posts::repost_count.eq(posts::repost_count + delta))
                            .execute(conn)
                            .await?;
                    }
                    InteractionKind::Bookmark => {}
                }
                let (likes, replies, reposts): (i64, i64, i64) = posts::table
                    .find(post)
                    .select((posts::like_count, posts::reply_count, posts::repost_count))
                    .first(conn)
                    .await?;
                Ok(Some(ToggleOutcome {
                    active,
                    counts: PostCounts {
                        likes: counter(likes),
                        replies: counter(replies),
                        reposts: counter(reposts),
                    },
                }))
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)?;
        Ok(outcome)
    }

    async fn count_by_author(&self, author: &UserId) -> Result<u64, PostRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let total: i64 = posts::table
            .filter(posts::author_id.eq(author.as_uuid()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(counter(total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, 0)]
    #[case(11, 11)]
    #[case(usize::MAX, i64::MAX)]
    fn limits_saturate_into_sql_range(#[case] limit: usize, #[case] expected: i64) {
        assert_eq!(sql_limit(limit), expected);
    }
}
