//! Cached Record Module
//!
//! User and post projections held by the lookup cache, plus the page type
//! returned by paginated store queries.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::Serialize;

// == Post Record ==
/// A single post as persisted by the backing store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostRecord {
    /// Store-assigned identifier
    pub id: u64,
    /// Trimmed post content
    pub content: String,
    /// Creation time
    pub timestamp: DateTime<Utc>,
}

// == User Record ==
/// A user with their posts attached, ordered by username.
///
/// An absent or empty username sorts before every present one, and two
/// absent usernames compare equal. Other fields take no part in ordering.
#[derive(Debug, Clone, Serialize)]
pub struct UserRecord {
    /// Store-assigned identifier
    pub id: u64,
    pub username: Option<String>,
    pub role: String,
    /// Posts in store order
    pub posts: Vec<PostRecord>,
}

impl UserRecord {
    /// Role given to accounts created without an explicit one.
    pub const DEFAULT_ROLE: &'static str = "USER";

    pub fn new(id: u64, username: impl Into<String>) -> Self {
        Self {
            id,
            username: Some(username.into()),
            role: Self::DEFAULT_ROLE.to_string(),
            posts: Vec::new(),
        }
    }

    /// Builds a search key carrying only a username.
    pub fn probe(username: impl Into<String>) -> Self {
        Self {
            id: 0,
            username: Some(username.into()),
            role: String::new(),
            posts: Vec::new(),
        }
    }

    /// Returns the ordering key, treating an empty username as absent.
    pub fn key(&self) -> Option<&str> {
        self.username.as_deref().filter(|name| !name.is_empty())
    }
}

impl PartialEq for UserRecord {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for UserRecord {}

impl PartialOrd for UserRecord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for UserRecord {
    fn cmp(&self, other: &Self) -> Ordering {
        // None < Some(_) matches "absent sorts first"
        self.key().cmp(&other.key())
    }
}

// == Page ==
/// One page of a timestamp-descending listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Zero-based page number
    pub page: u32,
    /// Page size the query ran with
    pub size: u32,
    pub total_items: usize,
    pub total_pages: usize,
}

impl<T> Page<T> {
    /// Cuts page `page` of `size` items out of an already ordered listing.
    pub fn slice(ordered: Vec<T>, page: u32, size: u32) -> Self {
        let total_items = ordered.len();
        let per_page = size.max(1) as usize;
        let total_pages = total_items.div_ceil(per_page);
        let items = ordered
            .into_iter()
            .skip(per_page.saturating_mul(page as usize))
            .take(per_page)
            .collect();

        Self {
            items,
            page,
            size,
            total_items,
            total_pages,
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn nameless(id: u64, username: Option<&str>) -> UserRecord {
        UserRecord {
            id,
            username: username.map(str::to_string),
            role: UserRecord::DEFAULT_ROLE.to_string(),
            posts: Vec::new(),
        }
    }

    #[test]
    fn test_user_ordering_by_username() {
        let alice = UserRecord::new(2, "alice");
        let bob = UserRecord::new(1, "bob");
        assert!(alice < bob);
        assert_eq!(alice.cmp(&UserRecord::probe("alice")), Ordering::Equal);
    }

    #[test]
    fn test_absent_username_sorts_first() {
        let absent = nameless(1, None);
        let empty = nameless(2, Some(""));
        let present = UserRecord::new(3, "a");

        assert!(absent < present);
        assert!(empty < present);
        assert_eq!(absent.cmp(&empty), Ordering::Equal);
        assert_eq!(absent.cmp(&nameless(4, None)), Ordering::Equal);
    }

    #[test]
    fn test_user_equality_ignores_payload() {
        let mut with_posts = UserRecord::new(1, "alice");
        with_posts.posts.push(PostRecord {
            id: 1,
            content: "hi".to_string(),
            timestamp: Utc::now(),
        });
        assert_eq!(with_posts, UserRecord::probe("alice"));
    }

    #[test]
    fn test_page_slice() {
        let page = Page::slice((1..=25).collect::<Vec<u32>>(), 1, 10);
        assert_eq!(page.items, (11..=20).collect::<Vec<u32>>());
        assert_eq!(page.total_items, 25);
        assert_eq!(page.total_pages, 3);
    }

    #[test]
    fn test_page_slice_past_end() {
        let page = Page::slice(vec![1, 2, 3], 5, 10);
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn test_user_serializes_posts() {
        let user = UserRecord::new(7, "alice");
        let json = serde_json::to_string(&user).unwrap();
        assert!(json.contains("\"username\":\"alice\""));
        assert!(json.contains("\"posts\":[]"));
        assert!(json.contains("USER"));
    }
}
