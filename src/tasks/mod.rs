//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Cache Refresh: Rebuilds the user lookup cache at configured intervals

mod refresh;

pub use refresh::spawn_refresh_task;
