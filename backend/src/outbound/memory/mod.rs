//! Process-local store implementing every repository port.
//!
//! Used when no database URL is configured and by the behaviour tests. The
//! store mirrors the PostgreSQL adapters: usernames are stored lowercase,
//! unique constraints report the same constraint names, replies cascade on
//! delete, and listings page on the same keyset orderings. All tables sit
//! behind one mutex so multi-table writes are atomic.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;

use crate::domain::ports::{
    FollowRepositoryError, PortfolioRepositoryError, PostRepositoryError, SearchRepositoryError,
    SitemapRepositoryError, UserRepositoryError,
};
use crate::domain::{
    ContactMethod, Experience, ExperienceId, PostCounts, PostId, PostRecord, Project, ProjectId,
    ReplyPrivacy, User, UserId,
};

mod portfolio;
mod posts;
mod search;
mod users;

const LOCK_POISONED: &str = "in-memory store lock poisoned";

/// A writer panicked while holding the table lock.
///
/// Each repository error converts this into its connection variant, so
/// `self.tables()?` works in every port method.
#[derive(Debug, Clone, Copy)]
struct Poisoned;

macro_rules! from_poisoned {
    ($($error:ty),+ $(,)?) => {
        $(
            impl From<Poisoned> for $error {
                fn from(_: Poisoned) -> Self {
                    Self::connection(LOCK_POISONED)
                }
            }
        )+
    };
}

from_poisoned!(
    UserRepositoryError,
    FollowRepositoryError,
    PostRepositoryError,
    PortfolioRepositoryError,
    SearchRepositoryError,
    SitemapRepositoryError,
);

#[derive(Debug, Clone)]
struct FollowEdge {
    follower: UserId,
    following: UserId,
    created_at: DateTime<Utc>,
}

/// Post row without its joined author card.
#[derive(Debug, Clone)]
struct StoredPost {
    id: PostId,
    author_id: UserId,
    text: String,
    images: Vec<String>,
    reply_privacy: ReplyPrivacy,
    parent_id: Option<PostId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    counts: PostCounts,
}

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<UserId, User>,
    follows: Vec<FollowEdge>,
    posts: HashMap<PostId, StoredPost>,
    likes: HashSet<(UserId, PostId)>,
    bookmarks: HashSet<(UserId, PostId)>,
    reposts: HashSet<(UserId, PostId)>,
    projects: HashMap<ProjectId, Project>,
    experiences: HashMap<ExperienceId, Experience>,
    contacts: Vec<ContactMethod>,
    last_stamp: Option<DateTime<Utc>>,
}

impl Tables {
    /// Strictly increasing timestamps at microsecond precision, so rows
    /// written in the same instant still page deterministically.
    fn stamp(&mut self, now: DateTime<Utc>) -> DateTime<Utc> {
        let next = match self.last_stamp {
            Some(last) if now <= last => last + TimeDelta::microseconds(1),
            _ => now,
        };
        self.last_stamp = Some(next);
        next
    }

    /// Join a stored post with its author. Orphaned rows are skipped.
    fn record(&self, post: &StoredPost) -> Option<PostRecord> {
        let author = self.users.get(&post.author_id)?.summary();
        Some(PostRecord {
            id: post.id,
            author,
            text: post.text.clone(),
            images: post.images.clone(),
            reply_privacy: post.reply_privacy,
            parent_id: post.parent_id,
            created_at: post.created_at,
            updated_at: post.updated_at,
            counts: post.counts,
        })
    }
}

/// In-memory implementation of the user, follow, post, portfolio, search,
/// and sitemap repositories.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use mockable::DefaultClock;
/// use whoami::outbound::memory::InMemoryStore;
///
/// let store = Arc::new(InMemoryStore::new(Arc::new(DefaultClock)));
/// # let _ = store;
/// ```
pub struct InMemoryStore {
    clock: Arc<dyn Clock>,
    tables: Mutex<Tables>,
}

impl InMemoryStore {
    /// Create an empty store stamping rows with `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            tables: Mutex::new(Tables::default()),
        }
    }

    fn tables(&self) -> Result<MutexGuard<'_, Tables>, Poisoned> {
        self.tables.lock().map_err(|_| Poisoned)
    }

    fn now(&self) -> DateTime<Utc> {
        self.clock.utc()
    }
}

#[cfg(test)]
mod test_support;

#[cfg(test)]
mod tests {
    //! Lock poisoning surfaces as a retryable connection failure.

    use std::thread;

    use super::test_support::store;
    use super::*;
    use crate::domain::Transient;
    use crate::domain::ports::{PostRepository, UserRepository};
    use rstest::rstest;

    fn poison(store: &InMemoryStore) {
        thread::scope(|scope| {
            let outcome = scope
                .spawn(|| {
                    let _guard = store.tables.lock();
                    panic!("writer died mid-update");
                })
                .join();
            assert!(outcome.is_err());
        });
    }

    #[rstest]
    #[tokio::test]
    async fn poisoned_tables_report_connection_errors() {
        let store = store();
        poison(&store);

        let user_error = UserRepository::find_by_id(&store, &UserId::random())
            .await
            .expect_err("poisoned");
        assert!(matches!(user_error, UserRepositoryError::Connection { .. }));
        assert!(user_error.is_transient());

        let post_error = PostRepository::find(&store, &PostId::random())
            .await
            .expect_err("poisoned");
        assert!(matches!(post_error, PostRepositoryError::Connection { .. }));
    }
}
