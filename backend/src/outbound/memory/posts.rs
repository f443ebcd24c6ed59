//! Posts, replies, and interactions.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use async_trait::async_trait;

use crate::domain::ports::{PostRepository, PostRepositoryError};
use crate::domain::{
    FeedFilter, FeedView, InteractionKind, NewPost, PostCounts, PostCursorKey, PostId, PostRecord,
    ToggleOutcome, UserId, ViewerFlags,
};

use super::{InMemoryStore, StoredPost, Tables};

/// Whether `post` sorts strictly after the boundary of the previous page.
///
/// A boundary carrying a like count belongs to the top ordering.
fn is_after(post: &StoredPost, boundary: &PostCursorKey) -> bool {
    let older = (post.created_at, post.id) < (boundary.created_at, boundary.id);
    match boundary.like_count {
        Some(likes) => post.counts.likes < likes || (post.counts.likes == likes && older),
        None => older,
    }
}

fn newest_first(a: &StoredPost, b: &StoredPost) -> Ordering {
    (b.created_at, b.id).cmp(&(a.created_at, a.id))
}

fn most_liked_first(a: &StoredPost, b: &StoredPost) -> Ordering {
    b.counts
        .likes
        .cmp(&a.counts.likes)
        .then_with(|| newest_first(a, b))
}

impl Tables {
    /// Filter, order, page, and join posts in one pass.
    fn listing(
        &self,
        keep: impl Fn(&StoredPost) -> bool,
        order: fn(&StoredPost, &StoredPost) -> Ordering,
        after: Option<PostCursorKey>,
        fetch_limit: usize,
    ) -> Vec<PostRecord> {
        let mut rows: Vec<&StoredPost> = self
            .posts
            .values()
            .filter(|&post| keep(post))
            .filter(|&post| after.as_ref().is_none_or(|boundary| is_after(post, boundary)))
            .collect();
        rows.sort_by(|a, b| order(a, b));
        rows.into_iter()
            .filter_map(|post| self.record(post))
            .take(fetch_limit)
            .collect()
    }

    fn interactions(&self, kind: InteractionKind) -> &HashSet<(UserId, PostId)> {
        match kind {
            InteractionKind::Like => &self.likes,
            InteractionKind::Bookmark => &self.bookmarks,
            InteractionKind::Repost => &self.reposts,
        }
    }

    fn interactions_mut(&mut self, kind: InteractionKind) -> &mut HashSet<(UserId, PostId)> {
        match kind {
            InteractionKind::Like => &mut self.likes,
            InteractionKind::Bookmark => &mut self.bookmarks,
            InteractionKind::Repost => &mut self.reposts,
        }
    }

    /// Remove a post, every descendant, and their interactions.
    fn remove_thread(&mut self, root: PostId) {
        let mut doomed = vec![root];
        let mut cursor = 0;
        while let Some(current) = doomed.get(cursor).copied() {
            doomed.extend(
                self.posts
                    .values()
                    .filter(|post| post.parent_id == Some(current))
                    .map(|post| post.id),
            );
            cursor += 1;
        }
        let doomed: HashSet<PostId> = doomed.into_iter().collect();
        self.posts.retain(|id, _| !doomed.contains(id));
        for set in [&mut self.likes, &mut self.bookmarks, &mut self.reposts] {
            set.retain(|(_, post)| !doomed.contains(post));
        }
    }
}

#[async_trait]
impl PostRepository for InMemoryStore {
    async fn create(&self, post: &NewPost) -> Result<PostRecord, PostRepositoryError> {
        let now = self.now();
        let mut tables = self.tables()?;
        if !tables.users.contains_key(&post.author_id) {
            return Err(PostRepositoryError::query("post author does not exist"));
        }
        if let Some(parent_id) = post.parent_id {
            let Some(parent) = tables.posts.get_mut(&parent_id) else {
                return Err(PostRepositoryError::query("parent post does not exist"));
            };
            parent.counts.replies += 1;
        }
        let created_at = tables.stamp(now);
        let stored = StoredPost {
            id: PostId::random(),
            author_id: post.author_id,
            text: post.text.as_ref().to_owned(),
            images: post.images.clone(),
            reply_privacy: post.reply_privacy,
            parent_id: post.parent_id,
            created_at,
            updated_at: created_at,
            counts: PostCounts::default(),
        };
        let record = tables
            .record(&stored)
            .ok_or_else(|| PostRepositoryError::query("post author does not exist"))?;
        tables.posts.insert(stored.id, stored);
        Ok(record)
    }

    async fn find(&self, id: &PostId) -> Result<Option<PostRecord>, PostRepositoryError> {
        let tables = self.tables()?;
        Ok(tables.posts.get(id).and_then(|post| tables.record(post)))
    }

    async fn delete_with_replies(&self, id: &PostId) -> Result<(), PostRepositoryError> {
        let mut tables = self.tables()?;
        let Some(parent_id) = tables.posts.get(id).map(|post| post.parent_id) else {
            return Ok(());
        };
        tables.remove_thread(*id);
        if let Some(parent) = parent_id.and_then(|parent| tables.posts.get_mut(&parent)) {
            parent.counts.replies = parent.counts.replies.saturating_sub(1);
        }
        Ok(())
    }

    async fn feed(
        &self,
        filter: &FeedFilter,
        after: Option<PostCursorKey>,
        fetch_limit: usize,
    ) -> Result<Vec<PostRecord>, PostRepositoryError> {
        let tables = self.tables()?;
        let followed: Option<HashSet<UserId>> = match (filter.view, filter.viewer) {
            (FeedView::Following, Some(viewer)) => Some(
                tables
                    .follows
                    .iter()
                    .filter(|edge| edge.follower == viewer)
                    .map(|edge| edge.following)
                    .collect(),
            ),
            (FeedView::Following, None) => return Ok(Vec::new()),
            _ => None,
        };
        let author_id = match &filter.author {
            Some(author) => {
                let Some(user) = tables
                    .users
                    .values()
                    .find(|user| user.username.as_ref() == author.as_str())
                else {
                    return Ok(Vec::new());
                };
                Some(user.id)
            }
            None => None,
        };
        let keep = |post: &StoredPost| {
            (!filter.top_level_only || post.parent_id.is_none())
                && author_id.is_none_or(|id| post.author_id == id)
                && followed
                    .as_ref()
                    .is_none_or(|authors| authors.contains(&post.author_id))
        };
        let order = match filter.view {
            FeedView::Top => most_liked_first,
            FeedView::All | FeedView::Following => newest_first,
        };
        Ok(tables.listing(keep, order, after, fetch_limit))
    }

    async fn replies(
        &self,
        parent: &PostId,
        after: Option<PostCursorKey>,
        fetch_limit: usize,
    ) -> Result<Vec<PostRecord>, PostRepositoryError> {
        let tables = self.tables()?;
        Ok(tables.listing(
            |post| post.parent_id == Some(*parent),
            newest_first,
            after,
            fetch_limit,
        ))
    }

    async fn reply_previews(
        &self,
        parents: &[PostId],
        per_parent: usize,
    ) -> Result<Vec<PostRecord>, PostRepositoryError> {
        let tables = self.tables()?;
        Ok(parents
            .iter()
            .flat_map(|parent| {
                tables.listing(
                    |post| post.parent_id == Some(*parent),
                    newest_first,
                    None,
                    per_parent,
                )
            })
            .collect())
    }

    async fn bookmarks(
        &self,
        user: &UserId,
        after: Option<PostCursorKey>,
        fetch_limit: usize,
    ) -> Result<Vec<PostRecord>, PostRepositoryError> {
        let tables = self.tables()?;
        Ok(tables.listing(
            |post| tables.bookmarks.contains(&(*user, post.id)),
            newest_first,
            after,
            fetch_limit,
        ))
    }

    async fn viewer_flags(
        &self,
        viewer: &UserId,
        posts: &[PostId],
    ) -> Result<HashMap<PostId, ViewerFlags>, PostRepositoryError> {
        let tables = self.tables()?;
        let has = |kind, post: &PostId| tables.interactions(kind).contains(&(*viewer, *post));
        Ok(posts
            .iter()
            .filter_map(|post| {
                let flags = ViewerFlags {
                    is_liked: has(InteractionKind::Like, post),
                    is_bookmarked: has(InteractionKind::Bookmark, post),
                    is_reposted: has(InteractionKind::Repost, post),
                };
                (flags != ViewerFlags::default()).then_some((*post, flags))
            })
            .collect())
    }

    async fn toggle_interaction(
        &self,
        kind: InteractionKind,
        user: &UserId,
        post: &PostId,
    ) -> Result<Option<ToggleOutcome>, PostRepositoryError> {
        let mut tables = self.tables()?;
        if !tables.posts.contains_key(post) {
            return Ok(None);
        }
        let set = tables.interactions_mut(kind);
        let active = if set.remove(&(*user, *post)) {
            false
        } else {
            set.insert((*user, *post));
            true
        };
        let Some(stored) = tables.posts.get_mut(post) else {
            return Ok(None);
        };
        let counter = match kind {
            InteractionKind::Like => Some(&mut stored.counts.likes),
            InteractionKind::Repost => Some(&mut stored.counts.reposts),
            InteractionKind::Bookmark => None,
        };
        if let Some(counter) = counter {
            *counter = if active {
                counter.saturating_add(1)
            } else {
                counter.saturating_sub(1)
            };
        }
        Ok(Some(ToggleOutcome {
            active,
            counts: stored.counts,
        }))
    }

    async fn count_by_author(&self, author: &UserId) -> Result<u64, PostRepositoryError> {
        let tables = self.tables()?;
        Ok(tables
            .posts
            .values()
            .filter(|post| post.author_id == *author)
            .fold(0, |count, _| count + 1))
    }
}
