//! Backing Store Module
//!
//! The narrow query contract the lookup cache relies on, plus an in-memory
//! implementation used by the server binary and tests.

mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::cache::{Page, PostRecord, UserRecord};
use crate::error::StoreError;

pub use memory::MemoryStore;

/// Durable storage for users and posts.
#[async_trait]
pub trait PostStore: Send + Sync {
    /// Returns every user with all of their posts attached.
    async fn fetch_all_users_with_posts(&self) -> Result<Vec<UserRecord>, StoreError>;

    /// Persists a post for the user with `user_id`.
    async fn persist_post(
        &self,
        user_id: u64,
        content: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<PostRecord, StoreError>;

    /// Returns a page of all posts, newest first.
    async fn fetch_posts_page(&self, page: u32, size: u32)
        -> Result<Page<PostRecord>, StoreError>;

    /// Returns a page of one user's posts, newest first.
    async fn fetch_user_posts_page(
        &self,
        user_id: u64,
        page: u32,
        size: u32,
    ) -> Result<Page<PostRecord>, StoreError>;
}
