//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `IteratorState`: the lifecycle of one crawl iterator (idle, advancing, exhausted, closed)

mod iterator_state;

pub use iterator_state::IteratorState;
