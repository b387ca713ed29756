//! Crawler module for page fetching and traversal
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching over one keep-alive connection per crawl
//! - HTML link extraction
//! - The breadth-first frontier and visited set
//! - The pull-based crawl iterator

mod fetcher;
mod frontier;
mod itemizer;
mod parser;

pub use fetcher::{build_http_client, fetch_url, FetchResult, Fetcher};
pub use frontier::{Frontier, FrontierEntry};
pub use itemizer::{itemize, itemize_with_config, CloseHandle, CrawlStats, Itemizer};
pub use parser::extract_links;
