//! In-Memory Store
//!
//! `PostStore` backed by process memory, with switchable availability.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;

use super::PostStore;
use crate::cache::{Page, PostRecord, UserRecord};
use crate::error::StoreError;

/// Column limit on post content, in characters.
const CONTENT_COLUMN_LENGTH: usize = 280;

#[derive(Debug)]
struct StoredUser {
    id: u64,
    username: Option<String>,
    role: String,
}

#[derive(Debug)]
struct StoredPost {
    id: u64,
    user_id: u64,
    content: String,
    timestamp: DateTime<Utc>,
}

impl StoredPost {
    fn to_record(&self) -> PostRecord {
        PostRecord {
            id: self.id,
            content: self.content.clone(),
            timestamp: self.timestamp,
        }
    }
}

#[derive(Debug, Default)]
struct Tables {
    users: Vec<StoredUser>,
    posts: Vec<StoredPost>,
    next_user_id: u64,
    next_post_id: u64,
}

impl Tables {
    fn add_user(&mut self, username: Option<String>) -> UserRecord {
        self.next_user_id += 1;
        let user = StoredUser {
            id: self.next_user_id,
            username,
            role: UserRecord::DEFAULT_ROLE.to_string(),
        };
        let record = UserRecord {
            id: user.id,
            username: user.username.clone(),
            role: user.role.clone(),
            posts: Vec::new(),
        };
        self.users.push(user);
        record
    }

    /// Posts matching `filter`, newest first.
    fn newest_first(&self, filter: impl Fn(&StoredPost) -> bool) -> Vec<PostRecord> {
        let mut posts: Vec<&StoredPost> = self.posts.iter().filter(|p| filter(*p)).collect();
        posts.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
        posts.into_iter().map(StoredPost::to_record).collect()
    }
}

// == Memory Store ==
/// In-memory users and posts.
///
/// Users are returned in id order. Marking the store unavailable makes
/// every `PostStore` call fail with `StoreError::Unavailable`.
#[derive(Debug)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
    available: AtomicBool,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
            available: AtomicBool::new(true),
        }
    }

    /// Creates a store holding one account per username.
    pub async fn with_users<I, S>(usernames: I) -> Result<Self, StoreError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let store = Self::new();
        for name in usernames {
            store.add_user(name.as_ref()).await?;
        }
        Ok(store)
    }

    // == Add User ==
    /// Creates an account. Usernames must be non-empty and unique.
    pub async fn add_user(&self, username: &str) -> Result<UserRecord, StoreError> {
        if username.trim().is_empty() {
            return Err(StoreError::ConstraintViolation(
                "username cannot be empty".to_string(),
            ));
        }

        let mut tables = self.tables.write().await;
        if tables
            .users
            .iter()
            .any(|u| u.username.as_deref() == Some(username))
        {
            return Err(StoreError::ConstraintViolation(format!(
                "username '{}' already exists",
                username
            )));
        }

        let record = tables.add_user(Some(username.to_string()));
        debug!("Store created user {} ({})", username, record.id);
        Ok(record)
    }

    /// Creates an account row with no username, as legacy imports leave behind.
    pub async fn add_unnamed_user(&self) -> UserRecord {
        self.tables.write().await.add_user(None)
    }

    /// Switches the store between reachable and unreachable.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    fn ensure_available(&self) -> Result<(), StoreError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::Unavailable(
                "backing store is not reachable".to_string(),
            ))
        }
    }
}

#[async_trait]
impl PostStore for MemoryStore {
    async fn fetch_all_users_with_posts(&self) -> Result<Vec<UserRecord>, StoreError> {
        self.ensure_available()?;
        let tables = self.tables.read().await;

        let users = tables
            .users
            .iter()
            .map(|user| UserRecord {
                id: user.id,
                username: user.username.clone(),
                role: user.role.clone(),
                posts: tables
                    .posts
                    .iter()
                    .filter(|post| post.user_id == user.id)
                    .map(StoredPost::to_record)
                    .collect(),
            })
            .collect();
        Ok(users)
    }

    async fn persist_post(
        &self,
        user_id: u64,
        content: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<PostRecord, StoreError> {
        self.ensure_available()?;
        if content.chars().count() > CONTENT_COLUMN_LENGTH {
            return Err(StoreError::ConstraintViolation(format!(
                "content exceeds column length of {}",
                CONTENT_COLUMN_LENGTH
            )));
        }

        let mut tables = self.tables.write().await;
        if !tables.users.iter().any(|u| u.id == user_id) {
            return Err(StoreError::ConstraintViolation(format!(
                "user {} does not exist",
                user_id
            )));
        }

        tables.next_post_id += 1;
        let post = StoredPost {
            id: tables.next_post_id,
            user_id,
            content: content.to_string(),
            timestamp,
        };
        let record = post.to_record();
        tables.posts.push(post);
        Ok(record)
    }

    async fn fetch_posts_page(
        &self,
        page: u32,
        size: u32,
    ) -> Result<Page<PostRecord>, StoreError> {
        self.ensure_available()?;
        let tables = self.tables.read().await;
        Ok(Page::slice(tables.newest_first(|_| true), page, size))
    }

    async fn fetch_user_posts_page(
        &self,
        user_id: u64,
        page: u32,
        size: u32,
    ) -> Result<Page<PostRecord>, StoreError> {
        self.ensure_available()?;
        let tables = self.tables.read().await;
        Ok(Page::slice(
            tables.newest_first(|post| post.user_id == user_id),
            page,
            size,
        ))
    }
}
