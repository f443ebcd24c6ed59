//! Port for the tagged cache of rendered feed pages.
//!
//! The cache is an optimisation only: services log and bypass failures.
//! Entries carry [`CacheTag`]s so mutations can evict every page that could
//! contain stale data without knowing the exact keys.
use std::fmt;

use async_trait::async_trait;
use pagination::Page;

use crate::domain::{FeedView, PostId, PostView, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors surfaced by the caching adapter.
    pub enum FeedCacheError {
        /// Cache backend is unavailable or timing out.
        Backend { message: String } => "feed cache backend failure: {message}",
    }
}

/// Which listing a cached page belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FeedScope {
    /// `GET /posts` with its filters.
    Feed {
        /// Feed flavour.
        view: FeedView,
        /// Personalising viewer.
        viewer: Option<UserId>,
        /// Lowercased author filter.
        author: Option<String>,
        /// Whether replies were excluded.
        exclude_replies: bool,
    },
    /// Replies to one post.
    Replies {
        /// Parent post.
        parent: PostId,
        /// Personalising viewer.
        viewer: Option<UserId>,
    },
    /// A user's bookmarks.
    Bookmarks {
        /// Owner of the bookmarks.
        user: UserId,
    },
}

/// Cache key for one page.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FeedCacheKey {
    /// Listing.
    pub scope: FeedScope,
    /// Cursor the page was requested with.
    pub cursor: Option<String>,
    /// Normalised page size.
    pub limit: usize,
}

impl FeedCacheKey {
    /// Tags attached to the page stored under this key.
    pub fn tags(&self) -> Vec<CacheTag> {
        match &self.scope {
            FeedScope::Feed { viewer, author, .. } => {
                let mut tags = vec![CacheTag::Posts];
                if let Some(author) = author {
                    tags.push(CacheTag::User(author.clone()));
                }
                if let Some(viewer) = viewer {
                    tags.push(CacheTag::Viewer(*viewer));
                }
                tags
            }
            FeedScope::Replies { parent, viewer } => {
                let mut tags = vec![CacheTag::Posts, CacheTag::Replies(*parent)];
                if let Some(viewer) = viewer {
                    tags.push(CacheTag::Viewer(*viewer));
                }
                tags
            }
            FeedScope::Bookmarks { user } => vec![
                CacheTag::Posts,
                CacheTag::Viewer(*user),
                CacheTag::Bookmarks(*user),
            ],
        }
    }
}

/// Invalidation handle attached to cached pages.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheTag {
    /// Any feed listing.
    Posts,
    /// Feeds filtered to one author's username.
    User(String),
    /// Pages personalised for one viewer.
    Viewer(UserId),
    /// Reply listings of one post.
    Replies(PostId),
    /// One user's bookmarks.
    Bookmarks(UserId),
}

impl fmt::Display for CacheTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Posts => f.write_str("posts"),
            Self::User(username) => write!(f, "user:{username}"),
            Self::Viewer(id) => write!(f, "viewer:{id}"),
            Self::Replies(id) => write!(f, "replies:{id}"),
            Self::Bookmarks(id) => write!(f, "bookmarks:{id}"),
        }
    }
}

/// Tagged TTL cache of feed pages.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FeedCache: Send + Sync {
    /// Read a live entry.
    async fn get(&self, key: &FeedCacheKey) -> Result<Option<Page<PostView>>, FeedCacheError>;

    /// Store a page under `key` with the key's tags.
    async fn put(&self, key: FeedCacheKey, page: Page<PostView>) -> Result<(), FeedCacheError>;

    /// Evict every entry carrying any of `tags`.
    async fn invalidate(&self, tags: &[CacheTag]) -> Result<(), FeedCacheError>;
}

/// Cache that never stores anything.
///
/// Used when caching is disabled by configuration and in service tests where
/// caching is not under test.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledFeedCache;

#[async_trait]
impl FeedCache for DisabledFeedCache {
    async fn get(&self, _key: &FeedCacheKey) -> Result<Option<Page<PostView>>, FeedCacheError> {
        Ok(None)
    }

    async fn put(&self, _key: FeedCacheKey, _page: Page<PostView>) -> Result<(), FeedCacheError> {
        Ok(())
    }

    async fn invalidate(&self, _tags: &[CacheTag]) -> Result<(), FeedCacheError> {
        Ok(())
    }
}
