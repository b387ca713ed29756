//! URL handling module for Itemize
//!
//! This module turns raw hrefs into crawl candidates: it resolves them
//! against the page they were found on, applies the query/fragment policy,
//! and rejects anything that falls outside the root's scope.

mod normalize;
mod scope;

// Re-export main types
pub use normalize::{parse_root, Normalizer};
pub use scope::Scope;
