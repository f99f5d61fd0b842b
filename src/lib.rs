//! Posts Cache - A small social-posting backend
//!
//! Serves username lookups (with posts preloaded) from an in-process ordered
//! index that is rebuilt wholesale from the backing store on a fixed interval.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod store;
pub mod tasks;

pub use api::AppState;
pub use cache::UserLookupCache;
pub use config::Config;
pub use tasks::spawn_refresh_task;
