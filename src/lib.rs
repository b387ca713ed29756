//! Itemize: a bounded, depth-limited link crawler
//!
//! This crate discovers the pages reachable under a root URL and hands them
//! back one at a time through a pull-based iterator. Traversal is breadth-first,
//! each distinct URL is produced at most once, and the crawl never climbs above
//! the root's directory.
//!
//! # Example
//!
//! ```no_run
//! use itemize::{itemize, ItemizeOptions};
//!
//! # async fn example() -> itemize::Result<()> {
//! let mut items = itemize("https://example.com/docs/", ItemizeOptions::default().with_depth(2))?;
//! while let Some(item) = items.next().await {
//!     println!("{}", item);
//! }
//! items.close();
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod crawler;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Itemize operations
#[derive(Debug, Error)]
pub enum ItemizeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Invalid state transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::IteratorState,
        to: state::IteratorState,
    },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingDomain,

    #[error("URL is outside the crawl scope: {0}")]
    OutOfScope(String),
}

/// Result type alias for Itemize operations
pub type Result<T> = std::result::Result<T, ItemizeError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::{Config, FetcherConfig, ItemizeOptions};
pub use crawler::{itemize, itemize_with_config, CloseHandle, CrawlStats, Itemizer};
pub use state::IteratorState;
pub use crate::url::{Normalizer, Scope};
