//! User Lookup Cache Module
//!
//! Username -> user (with posts) lookups served from a periodically rebuilt
//! `OrderedIndex` snapshot.
//!
//! A rebuild fetches every user from the backing store, fills a fresh index
//! off to the side and publishes it with a single pointer swap. Lookups load
//! whichever snapshot is current, so they see either the old or the new
//! index in full and never wait on a rebuild. Posts created through
//! [`UserLookupCache::record_new_post`] go straight to the store and only
//! show up in cached records after the next rebuild.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use arc_swap::ArcSwap;
use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::cache::{CacheStats, OrderedIndex, Page, PostRecord, UserRecord};
use crate::config::CacheLimits;
use crate::error::{Result, ServiceError};
use crate::store::PostStore;

/// Index type held by the cache.
pub type UserIndex = OrderedIndex<Arc<UserRecord>>;

/// Lifecycle of the cache contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheState {
    /// No rebuild has completed yet
    Uninitialized,
    /// At least one rebuild has completed
    Populated,
}

// == User Lookup Cache ==
pub struct UserLookupCache {
    store: Arc<dyn PostStore>,
    /// Current snapshot, replaced wholesale by `refresh`
    index: ArcSwap<UserIndex>,
    /// Serializes rebuilds
    refresh_lock: Mutex<()>,
    hits: AtomicU64,
    misses: AtomicU64,
    /// Refresh bookkeeping only; lookups touch the atomics above
    stats: parking_lot::Mutex<CacheStats>,
    limits: CacheLimits,
}

impl UserLookupCache {
    // == Constructor ==
    /// Creates an empty cache over `store`. Call [`refresh`](Self::refresh)
    /// before serving lookups.
    pub fn new(store: Arc<dyn PostStore>, limits: CacheLimits) -> Self {
        Self {
            store,
            index: ArcSwap::from_pointee(UserIndex::new()),
            refresh_lock: Mutex::new(()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            stats: parking_lot::Mutex::new(CacheStats::new()),
            limits,
        }
    }

    // == Lookup ==
    /// Finds a user in the current snapshot.
    ///
    /// `Ok(None)` means the name was unknown as of the last rebuild, not
    /// that no such account exists.
    pub fn lookup_by_username(&self, username: &str) -> Result<Option<Arc<UserRecord>>> {
        if username.trim().is_empty() {
            return Err(ServiceError::InvalidInput(
                "Username cannot be empty".to_string(),
            ));
        }

        let found = self.index.load().search(&UserRecord::probe(username));

        if found.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
            debug!("Cache hit for user '{}'", username);
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            debug!("Cache miss for user '{}'", username);
        }
        Ok(found)
    }

    /// Like [`lookup_by_username`](Self::lookup_by_username), with a miss
    /// reported as `NotFound`.
    pub fn resolve_user(&self, username: &str) -> Result<Arc<UserRecord>> {
        self.lookup_by_username(username)?
            .ok_or_else(|| ServiceError::NotFound(format!("User not found: {}", username)))
    }

    // == Record New Post ==
    /// Validates `content` and persists it as a new post by `username`.
    ///
    /// The cached record for `username` is left untouched.
    pub async fn record_new_post(&self, username: &str, content: &str) -> Result<PostRecord> {
        if content.trim().is_empty() {
            return Err(ServiceError::InvalidInput(
                "Post content cannot be empty".to_string(),
            ));
        }
        if content.chars().count() > self.limits.max_post_length {
            return Err(ServiceError::InvalidInput(format!(
                "Post content cannot exceed {} characters",
                self.limits.max_post_length
            )));
        }

        let user = self.resolve_user(username)?;
        let post = self
            .store
            .persist_post(user.id, content.trim(), Utc::now())
            .await?;

        info!("User '{}' created post {}", username, post.id);
        Ok(post)
    }

    // == Refresh ==
    /// Rebuilds the index from the store and swaps it in.
    ///
    /// Returns the number of users now cached. On store failure the current
    /// snapshot stays in place and the error is logged and returned.
    pub async fn refresh(&self) -> Result<usize> {
        let _rebuilding = self.refresh_lock.lock().await;

        let users = match self.store.fetch_all_users_with_posts().await {
            Ok(users) => users,
            Err(err) => {
                error!("User cache refresh failed, keeping previous contents: {}", err);
                self.stats.lock().record_failed_refresh();
                return Err(err.into());
            }
        };

        let fresh = UserIndex::new();
        for user in users {
            if user.key().is_none() {
                warn!("Skipped user {} with no username", user.id);
                continue;
            }
            fresh.insert(Arc::new(user));
        }

        let total = fresh.len();
        self.index.store(Arc::new(fresh));
        self.stats.lock().record_refresh(total, Utc::now());

        info!("User cache refreshed with {} users", total);
        Ok(total)
    }

    // == Listings ==
    /// Returns a page of all posts, newest first.
    pub async fn list_recent_posts(&self, page: u32, size: u32) -> Result<Page<PostRecord>> {
        let size = self.clamp_page_size(size)?;
        Ok(self.store.fetch_posts_page(page, size).await?)
    }

    /// Returns a page of `username`'s posts, newest first.
    pub async fn list_user_posts(
        &self,
        username: &str,
        page: u32,
        size: u32,
    ) -> Result<Page<PostRecord>> {
        let user = self.resolve_user(username)?;
        let size = self.clamp_page_size(size)?;
        debug!(
            "Fetching posts for '{}', page {}, size {}",
            username, page, size
        );
        Ok(self.store.fetch_user_posts_page(user.id, page, size).await?)
    }

    /// Oversized requests fall back to the default size rather than the maximum.
    fn clamp_page_size(&self, size: u32) -> Result<u32> {
        if size == 0 {
            return Err(ServiceError::InvalidInput(
                "Page size must be at least 1".to_string(),
            ));
        }
        if size > self.limits.max_page_size {
            Ok(self.limits.default_page_size.min(self.limits.max_page_size))
        } else {
            Ok(size)
        }
    }

    // == Introspection ==
    /// Returns the current index snapshot.
    pub fn snapshot(&self) -> Arc<UserIndex> {
        self.index.load_full()
    }

    pub fn state(&self) -> CacheState {
        if self.stats.lock().refreshes > 0 {
            CacheState::Populated
        } else {
            CacheState::Uninitialized
        }
    }

    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.lock().clone();
        stats.hits = self.hits.load(Ordering::Relaxed);
        stats.misses = self.misses.load(Ordering::Relaxed);
        stats.total_users = self.index.load().len();
        stats
    }

    pub fn limits(&self) -> CacheLimits {
        self.limits
    }
}
