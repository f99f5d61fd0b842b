//! Cache Module
//!
//! Ordered username index and the periodically rebuilt lookup cache on top of it.

mod index;
mod record;
mod stats;
mod users;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use index::OrderedIndex;
pub use record::{Page, PostRecord, UserRecord};
pub use stats::CacheStats;
pub use users::{CacheState, UserIndex, UserLookupCache};
