//! API Handlers
//!
//! HTTP request handlers translating requests into lookup cache operations.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    Json,
};

use crate::cache::{Page, PostRecord, UserLookupCache, UserRecord};
use crate::error::{Result, ServiceError};
use crate::models::{CreatePostRequest, HealthResponse, PageQuery, RefreshResponse, StatsResponse};

/// Header carrying the acting username for post creation.
pub const USERNAME_HEADER: &str = "x-username";

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Username lookup cache (internally synchronized)
    pub cache: Arc<UserLookupCache>,
}

impl AppState {
    /// Creates a new AppState around the given cache.
    pub fn new(cache: Arc<UserLookupCache>) -> Self {
        Self { cache }
    }

    fn default_page_size(&self) -> u32 {
        self.cache.limits().default_page_size
    }
}

fn acting_username(headers: &HeaderMap) -> Result<String> {
    headers
        .get(USERNAME_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            ServiceError::InvalidInput(format!("Missing {} header", USERNAME_HEADER))
        })
}

/// Handler for POST /api/posts
///
/// Persists a post for the user named by the `x-username` header.
pub async fn create_post_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreatePostRequest>,
) -> Result<Json<PostRecord>> {
    let username = acting_username(&headers)?;
    let post = state.cache.record_new_post(&username, &req.content).await?;
    Ok(Json(post))
}

/// Handler for GET /api/posts
pub async fn list_posts_handler(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Page<PostRecord>>> {
    let (page, size) = query.resolve(state.default_page_size());
    let posts = state.cache.list_recent_posts(page, size).await?;
    Ok(Json(posts))
}

/// Handler for GET /api/posts/users/:username
///
/// Served from the cache only; users added since the last rebuild are 404.
pub async fn get_user_handler(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<UserRecord>> {
    let user = state.cache.resolve_user(&username)?;
    Ok(Json(UserRecord::clone(&user)))
}

/// Handler for GET /api/posts/users/:username/posts
pub async fn list_user_posts_handler(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Page<PostRecord>>> {
    let (page, size) = query.resolve(state.default_page_size());
    let posts = state.cache.list_user_posts(&username, page, size).await?;
    Ok(Json(posts))
}

/// Handler for POST /api/admin/refresh
///
/// Rebuilds the cache now. A store failure is reported to the caller.
pub async fn refresh_handler(State(state): State<AppState>) -> Result<Json<RefreshResponse>> {
    let total = state.cache.refresh().await?;
    Ok(Json(RefreshResponse::new(total)))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let stats = state.cache.stats();
    Json(StatsResponse::new(&stats, state.cache.state()))
}

/// Handler for GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::healthy(state.cache.state()))
}
