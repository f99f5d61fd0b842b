//! API Module
//!
//! HTTP handlers and routing for the posting REST API.
//!
//! # Endpoints
//! - `POST /api/posts` - Create a post as the `x-username` user
//! - `GET /api/posts` - Page through all posts, newest first
//! - `GET /api/posts/users/:username` - Cached user with posts
//! - `GET /api/posts/users/:username/posts` - Page through one user's posts
//! - `POST /api/admin/refresh` - Force a cache rebuild
//! - `GET /stats` - Lookup cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
