//! In-process tagged TTL cache for rendered feed pages.
//!
//! Entries expire after a fixed TTL measured with an injected
//! [`mockable::Clock`], and carry the tags derived from their key so
//! mutations can evict every page they may have made stale. The cache is
//! bounded; when full, expired entries are pruned first and then the entry
//! closest to expiry is dropped.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;
use pagination::Page;
use tracing::debug;

use crate::domain::PostView;
use crate::domain::ports::{CacheTag, FeedCache, FeedCacheError, FeedCacheKey};

/// Default number of pages held at once.
pub const DEFAULT_CAPACITY: usize = 1024;

struct Entry {
    page: Page<PostView>,
    tags: Vec<CacheTag>,
    expires_at: DateTime<Utc>,
}

/// Tagged TTL cache held in process memory.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use std::time::Duration;
/// use mockable::DefaultClock;
/// use whoami::outbound::cache::InMemoryFeedCache;
///
/// let cache = InMemoryFeedCache::new(Duration::from_secs(30), Arc::new(DefaultClock));
/// assert_eq!(cache.len(), 0);
/// ```
pub struct InMemoryFeedCache {
    ttl: TimeDelta,
    capacity: usize,
    clock: Arc<dyn Clock>,
    entries: Mutex<HashMap<FeedCacheKey, Entry>>,
}

impl InMemoryFeedCache {
    /// Cache holding up to [`DEFAULT_CAPACITY`] pages for `ttl` each.
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            ttl: TimeDelta::from_std(ttl).unwrap_or(TimeDelta::MAX),
            capacity: DEFAULT_CAPACITY,
            clock,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Override the number of pages held at once.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity.max(1);
        self
    }

    /// Number of stored entries, live or expired.
    pub fn len(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    /// Whether nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<FeedCacheKey, Entry>>, FeedCacheError> {
        self.entries
            .lock()
            .map_err(|_| FeedCacheError::backend("feed cache lock poisoned"))
    }

    fn make_room(&self, entries: &mut HashMap<FeedCacheKey, Entry>, now: DateTime<Utc>) {
        if entries.len() < self.capacity {
            return;
        }
        entries.retain(|_, entry| entry.expires_at > now);
        while entries.len() >= self.capacity {
            let Some(oldest) = entries
                .iter()
                .min_by_key(|(_, entry)| entry.expires_at)
                .map(|(key, _)| key.clone())
            else {
                break;
            };
            entries.remove(&oldest);
        }
    }
}

#[async_trait]
impl FeedCache for InMemoryFeedCache {
    async fn get(&self, key: &FeedCacheKey) -> Result<Option<Page<PostView>>, FeedCacheError> {
        let now = self.clock.utc();
        let mut entries = self.lock()?;
        match entries.get(key) {
            Some(entry) if entry.expires_at > now => Ok(Some(entry.page.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn put(&self, key: FeedCacheKey, page: Page<PostView>) -> Result<(), FeedCacheError> {
        let now = self.clock.utc();
        let tags = key.tags();
        let mut entries = self.lock()?;
        if !entries.contains_key(&key) {
            self.make_room(&mut entries, now);
        }
        entries.insert(
            key,
            Entry {
                page,
                tags,
                expires_at: now + self.ttl,
            },
        );
        Ok(())
    }

    async fn invalidate(&self, tags: &[CacheTag]) -> Result<(), FeedCacheError> {
        if tags.is_empty() {
            return Ok(());
        }
        let mut entries = self.lock()?;
        let before = entries.len();
        entries.retain(|_, entry| !entry.tags.iter().any(|tag| tags.contains(tag)));
        debug!(
            evicted = before - entries.len(),
            tags = ?tags.iter().map(ToString::to_string).collect::<Vec<_>>(),
            "feed cache invalidated"
        );
        Ok(())
    }
}
