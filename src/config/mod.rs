//! Configuration module for Itemize
//!
//! This module holds the crawl options (depth, query, hash), the fetcher
//! settings, and the loading and validation of TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use itemize::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("itemize.toml")).unwrap();
//! println!("Crawl depth: {:?}", config.options.depth);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, FetcherConfig, ItemizeOptions};

// Re-export parser and validation functions
pub use parser::{load_config, parse_config};
pub use validation::validate;
