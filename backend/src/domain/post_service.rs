//! Posts, feeds, replies, bookmarks, and interaction toggles.
//!
//! Reads go through the [`FeedCache`] and retry transient repository
//! failures. Mutations evict every cache tag whose pages could now be stale.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use pagination::{Cursor, Page, PageRequest};
use tracing::info;

use crate::domain::ports::{
    CacheTag, FeedCache, FeedCacheKey, FeedQuery, FeedScope, FollowRepository, InteractionResult,
    PostCommand, PostRepository,
};
use crate::domain::service_errors::{
    decode_cursor, log_cache_error, map_follow_error, map_page_error, map_post_error,
};
use crate::domain::{
    Error, FeedRequest, FeedView, InteractionKind, NewPost, PostCursorKey, PostId, PostRecord,
    PostView, REPLY_PREVIEW_COUNT, ReplyPreview, ReplyPrivacy, RetryPolicy, UserId,
};

/// Page size used when the client does not ask for one.
pub const FEED_DEFAULT_LIMIT: usize = 10;
/// Largest page size a client may request.
pub const FEED_MAX_LIMIT: usize = 50;

const POST_NOT_FOUND: &str = "Post not found";

/// Reject cursors minted for a different ordering.
///
/// Top-view cursors carry a like count; chronological ones do not.
fn check_cursor(cursor: Option<&Cursor<PostCursorKey>>, view: FeedView) -> Result<(), Error> {
    let Some(cursor) = cursor else {
        return Ok(());
    };
    let ranked = matches!(view, FeedView::Top);
    if cursor.key().like_count.is_some() == ranked {
        Ok(())
    } else {
        Err(Error::invalid_request(format!(
            "cursor does not belong to the {} view",
            view.as_str()
        )))
    }
}

fn page_request(
    raw_cursor: Option<&str>,
    limit: Option<usize>,
    view: FeedView,
) -> Result<PageRequest<PostCursorKey>, Error> {
    let cursor = decode_cursor(raw_cursor)?;
    check_cursor(cursor.as_ref(), view)?;
    Ok(PageRequest::new(
        cursor,
        limit,
        FEED_DEFAULT_LIMIT,
        FEED_MAX_LIMIT,
    ))
}

/// Service implementing [`FeedQuery`] and [`PostCommand`].
#[derive(Clone)]
pub struct PostService<P, F, C> {
    posts: Arc<P>,
    follows: Arc<F>,
    cache: Arc<C>,
    retry: RetryPolicy,
}

impl<P, F, C> PostService<P, F, C> {
    /// Create a new service using the default retry policy.
    pub fn new(posts: Arc<P>, follows: Arc<F>, cache: Arc<C>) -> Self {
        Self {
            posts,
            follows,
            cache,
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

impl<P, F, C> PostService<P, F, C>
where
    P: PostRepository,
    F: FollowRepository,
    C: FeedCache,
{
    async fn require_post(&self, id: &PostId) -> Result<PostRecord, Error> {
        self.posts
            .find(id)
            .await
            .map_err(map_post_error)?
            .ok_or_else(|| Error::not_found(POST_NOT_FOUND))
    }

    async fn cached(&self, key: &FeedCacheKey) -> Option<Page<PostView>> {
        match self.cache.get(key).await {
            Ok(hit) => hit,
            Err(error) => {
                log_cache_error("get", &error);
                None
            }
        }
    }

    async fn store(&self, key: FeedCacheKey, page: &Page<PostView>) {
        if let Err(error) = self.cache.put(key, page.clone()).await {
            log_cache_error("put", &error);
        }
    }

    async fn invalidate(&self, tags: &[CacheTag]) {
        if let Err(error) = self.cache.invalidate(tags).await {
            log_cache_error("invalidate", &error);
        }
    }

    /// Tags touched by a change to `record`.
    fn tags_for(record: &PostRecord) -> Vec<CacheTag> {
        let mut tags = vec![
            CacheTag::Posts,
            CacheTag::User(record.author.username.to_ascii_lowercase()),
        ];
        if let Some(parent) = record.parent_id {
            tags.push(CacheTag::Replies(parent));
        }
        tags
    }

    /// Attach viewer flags, author follow state, and optionally reply
    /// previews to `records`, preserving their order.
    async fn decorate(
        &self,
        records: Vec<PostRecord>,
        viewer: Option<UserId>,
        view: FeedView,
        with_previews: bool,
    ) -> Result<Vec<PostView>, Error> {
        if records.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<PostId> = records.iter().map(|record| record.id).collect();

        let previews = if with_previews {
            self.posts
                .reply_previews(&ids, REPLY_PREVIEW_COUNT)
                .await
                .map_err(map_post_error)?
        } else {
            Vec::new()
        };

        let (flags, followed) = match viewer {
            Some(viewer) => {
                let flags = self
                    .posts
                    .viewer_flags(&viewer, &ids)
                    .await
                    .map_err(map_post_error)?;
                let mut authors: Vec<UserId> = records
                    .iter()
                    .chain(previews.iter())
                    .map(|record| record.author.id)
                    .filter(|author| *author != viewer)
                    .collect();
                authors.sort_unstable();
                authors.dedup();
                let followed: HashSet<UserId> = if authors.is_empty() {
                    HashSet::new()
                } else {
                    self.follows
                        .followed_among(&viewer, &authors)
                        .await
                        .map_err(map_follow_error)?
                        .into_iter()
                        .collect()
                };
                (flags, followed)
            }
            None => (HashMap::new(), HashSet::new()),
        };

        let mut grouped: HashMap<PostId, Vec<PostRecord>> = HashMap::new();
        for mut preview in previews {
            let Some(parent) = preview.parent_id else {
                continue;
            };
            preview.author.is_following = followed.contains(&preview.author.id);
            grouped.entry(parent).or_default().push(preview);
        }

        Ok(records
            .into_iter()
            .map(|mut record| {
                record.author.is_following = followed.contains(&record.author.id);
                let mut replies = grouped.remove(&record.id).unwrap_or_default();
                replies.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
                replies.truncate(REPLY_PREVIEW_COUNT);
                let flags = flags.get(&record.id).copied().unwrap_or_default();
                PostView::assemble(
                    record,
                    flags,
                    replies.into_iter().map(ReplyPreview::from).collect(),
                    view,
                )
            })
            .collect())
    }

    async fn decorate_page(
        &self,
        page: Page<PostRecord>,
        viewer: Option<UserId>,
        view: FeedView,
        with_previews: bool,
    ) -> Result<Page<PostView>, Error> {
        let next_cursor = page.next_cursor().map(str::to_owned);
        let items = self
            .decorate(page.into_items(), viewer, view, with_previews)
            .await?;
        Ok(Page::from_parts(items, next_cursor))
    }

    async fn view_of(&self, record: PostRecord, viewer: Option<UserId>) -> Result<PostView, Error> {
        self.decorate(vec![record], viewer, FeedView::All, true)
            .await?
            .pop()
            .ok_or_else(|| Error::internal("decorated post went missing"))
    }

    async fn may_reply(&self, author: &UserId, parent: &PostRecord) -> Result<bool, Error> {
        if parent.reply_privacy == ReplyPrivacy::Public || parent.author.id == *author {
            return Ok(true);
        }
        self.follows
            .is_following(author, &parent.author.id)
            .await
            .map_err(map_follow_error)
    }
}

#[async_trait]
impl<P, F, C> FeedQuery for PostService<P, F, C>
where
    P: PostRepository,
    F: FollowRepository,
    C: FeedCache,
{
    async fn fetch_posts(&self, request: FeedRequest) -> Result<Page<PostView>, Error> {
        let view = request.view;
        if view == FeedView::Following && request.viewer.is_none() {
            return Err(Error::unauthorized("login required for the following feed"));
        }
        let page_request = page_request(request.cursor.as_deref(), request.limit, view)?;
        let filter = request.filter();
        let key = FeedCacheKey {
            scope: FeedScope::Feed {
                view,
                viewer: request.viewer,
                author: filter.author.clone(),
                exclude_replies: request.exclude_replies,
            },
            cursor: request.cursor.clone(),
            limit: page_request.limit(),
        };
        if let Some(hit) = self.cached(&key).await {
            return Ok(hit);
        }

        let after = page_request.after().copied();
        let fetch_limit = page_request.fetch_limit();
        let rows = self
            .retry
            .run("fetch_posts", || self.posts.feed(&filter, after, fetch_limit))
            .await
            .map_err(map_post_error)?;
        let records = Page::from_overfetched(rows, page_request.limit(), |row| row.cursor_key(view))
            .map_err(map_page_error)?;
        let page = self
            .decorate_page(records, request.viewer, view, true)
            .await?;
        self.store(key, &page).await;
        Ok(page)
    }

    async fn get_post(&self, post_id: &PostId, viewer: Option<UserId>) -> Result<PostView, Error> {
        let record = self.require_post(post_id).await?;
        self.view_of(record, viewer).await
    }

    async fn fetch_replies(
        &self,
        post_id: &PostId,
        viewer: Option<UserId>,
        cursor: Option<String>,
        limit: Option<usize>,
    ) -> Result<Page<PostView>, Error> {
        let page_request = page_request(cursor.as_deref(), limit, FeedView::All)?;
        let key = FeedCacheKey {
            scope: FeedScope::Replies {
                parent: *post_id,
                viewer,
            },
            cursor,
            limit: page_request.limit(),
        };
        if let Some(hit) = self.cached(&key).await {
            return Ok(hit);
        }
        self.require_post(post_id).await?;

        let after = page_request.after().copied();
        let fetch_limit = page_request.fetch_limit();
        let rows = self
            .retry
            .run("fetch_replies", || self.posts.replies(post_id, after, fetch_limit))
            .await
            .map_err(map_post_error)?;
        let records = Page::from_overfetched(rows, page_request.limit(), |row| {
            row.cursor_key(FeedView::All)
        })
        .map_err(map_page_error)?;
        let page = self
            .decorate_page(records, viewer, FeedView::All, false)
            .await?;
        self.store(key, &page).await;
        Ok(page)
    }

    async fn bookmarks(
        &self,
        user_id: &UserId,
        cursor: Option<String>,
        limit: Option<usize>,
    ) -> Result<Page<PostView>, Error> {
        let page_request = page_request(cursor.as_deref(), limit, FeedView::All)?;
        let key = FeedCacheKey {
            scope: FeedScope::Bookmarks { user: *user_id },
            cursor,
            limit: page_request.limit(),
        };
        if let Some(hit) = self.cached(&key).await {
            return Ok(hit);
        }

        let after = page_request.after().copied();
        let fetch_limit = page_request.fetch_limit();
        let rows = self
            .retry
            .run("bookmarks", || self.posts.bookmarks(user_id, after, fetch_limit))
            .await
            .map_err(map_post_error)?;
        let records = Page::from_overfetched(rows, page_request.limit(), |row| {
            row.cursor_key(FeedView::All)
        })
        .map_err(map_page_error)?;
        let page = self
            .decorate_page(records, Some(*user_id), FeedView::All, true)
            .await?;
        self.store(key, &page).await;
        Ok(page)
    }
}

#[async_trait]
impl<P, F, C> PostCommand for PostService<P, F, C>
where
    P: PostRepository,
    F: FollowRepository,
    C: FeedCache,
{
    async fn create_post(&self, post: NewPost) -> Result<PostView, Error> {
        if let Some(parent_id) = post.parent_id {
            let parent = self
                .posts
                .find(&parent_id)
                .await
                .map_err(map_post_error)?
                .ok_or_else(|| Error::not_found("Parent post not found"))?;
            if !self.may_reply(&post.author_id, &parent).await? {
                return Err(Error::forbidden(
                    "Only followers of the author can reply to this post",
                ));
            }
        }
        let record = self.posts.create(&post).await.map_err(map_post_error)?;
        self.invalidate(&Self::tags_for(&record)).await;
        info!(post_id = %record.id, author = %post.author_id, "post created");
        self.view_of(record, Some(post.author_id)).await
    }

    async fn delete_post(&self, user_id: &UserId, post_id: &PostId) -> Result<(), Error> {
        let record = self.require_post(post_id).await?;
        if record.author.id != *user_id {
            return Err(Error::forbidden("Unauthorized or post not found"));
        }
        self.retry
            .run("delete_post", || self.posts.delete_with_replies(post_id))
            .await
            .map_err(map_post_error)?;
        let mut tags = Self::tags_for(&record);
        tags.push(CacheTag::Replies(record.id));
        self.invalidate(&tags).await;
        info!(post_id = %post_id, "post deleted");
        Ok(())
    }

    async fn toggle_interaction(
        &self,
        kind: InteractionKind,
        user_id: &UserId,
        post_id: &PostId,
    ) -> Result<InteractionResult, Error> {
        let record = self.require_post(post_id).await?;
        let outcome = self
            .retry
            .run("toggle_interaction", || {
                self.posts.toggle_interaction(kind, user_id, post_id)
            })
            .await
            .map_err(map_post_error)?
            .ok_or_else(|| Error::not_found(POST_NOT_FOUND))?;

        let mut tags = Self::tags_for(&record);
        if kind == InteractionKind::Bookmark {
            tags.push(CacheTag::Bookmarks(*user_id));
        }
        self.invalidate(&tags).await;

        let post = if kind == InteractionKind::Like {
            Some(self.get_post(post_id, Some(*user_id)).await?)
        } else {
            None
        };
        Ok(InteractionResult { outcome, post })
    }
}

#[cfg(test)]
#[path = "post_service_tests.rs"]
mod tests;
