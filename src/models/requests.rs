//! Request DTOs for the posting API
//!
//! Defines the structure of incoming HTTP request bodies and query strings.

use serde::Deserialize;

/// Request body for post creation (POST /api/posts)
///
/// Content rules (non-blank, length limit) are enforced by the lookup cache.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePostRequest {
    /// The post text
    pub content: String,
}

/// Pagination query string (`?page=&size=`)
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageQuery {
    /// Zero-based page number (default 0)
    #[serde(default)]
    pub page: Option<u32>,
    /// Requested page size (default: configured default page size)
    #[serde(default)]
    pub size: Option<u32>,
}

impl PageQuery {
    /// Fills in missing values, returning `(page, size)`.
    pub fn resolve(&self, default_size: u32) -> (u32, u32) {
        (self.page.unwrap_or(0), self.size.unwrap_or(default_size))
    }
}
