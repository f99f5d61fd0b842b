//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::collections::HashSet;
use std::env;
use std::str::FromStr;

use tracing::warn;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Interval in seconds between scheduled cache rebuilds
    pub refresh_interval: u64,
    /// Largest page size honoured by paginated listings
    pub max_page_size: u32,
    /// Page size substituted when a request asks for more than `max_page_size`
    pub default_page_size: u32,
    /// Maximum post content length in characters
    pub max_post_length: usize,
    /// HTTP server port
    pub server_port: u16,
    /// Usernames inserted into the in-memory store at startup
    pub seed_users: Vec<String>,
}

/// Limits applied by the lookup cache to post creation and pagination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheLimits {
    pub max_page_size: u32,
    pub default_page_size: u32,
    pub max_post_length: usize,
}

impl Default for CacheLimits {
    fn default() -> Self {
        Config::default().limits()
    }
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `REFRESH_INTERVAL` - Cache rebuild frequency in seconds (default: 60)
    /// - `MAX_PAGE_SIZE` - Largest accepted page size (default: 20)
    /// - `DEFAULT_PAGE_SIZE` - Page size used when the maximum is exceeded (default: 10)
    /// - `MAX_POST_LENGTH` - Maximum post length in characters (default: 280)
    /// - `SERVER_PORT` - HTTP server port (default: 8080)
    /// - `SEED_USERS` - Comma-separated usernames to seed (default: "alice,bob")
    ///
    /// Zero is not a usable interval, page size or length, so a zero value
    /// falls back to the default like an unparsable one. A default page size
    /// above the maximum is lowered to the maximum.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let mut config = Self {
            refresh_interval: env_nonzero("REFRESH_INTERVAL", defaults.refresh_interval),
            max_page_size: env_nonzero("MAX_PAGE_SIZE", defaults.max_page_size),
            default_page_size: env_nonzero("DEFAULT_PAGE_SIZE", defaults.default_page_size),
            max_post_length: env_nonzero("MAX_POST_LENGTH", defaults.max_post_length),
            server_port: env_or("SERVER_PORT", defaults.server_port),
            seed_users: env::var("SEED_USERS")
                .map(|v| parse_user_list(&v))
                .unwrap_or(defaults.seed_users),
        };

        if config.default_page_size > config.max_page_size {
            warn!(
                "DEFAULT_PAGE_SIZE {} exceeds MAX_PAGE_SIZE {}, using {}",
                config.default_page_size, config.max_page_size, config.max_page_size
            );
            config.default_page_size = config.max_page_size;
        }
        config
    }

    /// Extracts the limits the lookup cache enforces.
    pub fn limits(&self) -> CacheLimits {
        CacheLimits {
            max_page_size: self.max_page_size,
            default_page_size: self.default_page_size.min(self.max_page_size),
            max_post_length: self.max_post_length,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            refresh_interval: 60,
            max_page_size: 20,
            default_page_size: 10,
            max_post_length: 280,
            server_port: 8080,
            seed_users: vec!["alice".to_string(), "bob".to_string()],
        }
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Like [`env_or`], with zero treated as unset.
fn env_nonzero<T>(name: &str, default: T) -> T
where
    T: FromStr + Copy + Default + PartialEq,
{
    let value = env_or(name, default);
    if value == T::default() {
        warn!("{} must be greater than zero, using the default", name);
        return default;
    }
    value
}

/// Splits a comma-separated username list, dropping blanks and repeats.
fn parse_user_list(raw: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty() && seen.insert(*name))
        .map(str::to_string)
        .collect()
}
