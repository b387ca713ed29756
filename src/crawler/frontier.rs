//! Frontier for managing the crawl queue and deduplication
//!
//! This module handles:
//! - FIFO queue of (URL, depth) entries awaiting a fetch
//! - The visited set that guarantees each URL is processed at most once

use std::collections::{HashSet, VecDeque};
use url::Url;

/// A URL queued for fetching with its hop count from the root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry {
    /// The normalized URL to fetch
    pub url: Url,

    /// Number of link hops from the root (root = 0)
    pub depth: u32,
}

/// Frontier manages the breadth-first work queue of one crawl
///
/// A URL enters the visited set the moment it is enqueued, so a page linked
/// from many places is still fetched once. The visited set only grows.
#[derive(Debug, Default)]
pub struct Frontier {
    /// Entries waiting to be fetched, consumed strictly in FIFO order
    queue: VecDeque<FrontierEntry>,

    /// Every URL ever enqueued
    visited: HashSet<String>,
}

impl Frontier {
    /// Creates a frontier seeded with the root at depth 0
    pub fn new(root: Url) -> Self {
        let mut frontier = Self::default();
        frontier.push(root, 0);
        frontier
    }

    /// Adds a URL to the back of the queue
    ///
    /// Returns false (and does nothing) if the URL was already enqueued.
    pub fn push(&mut self, url: Url, depth: u32) -> bool {
        if !self.visited.insert(url.as_str().to_string()) {
            return false;
        }

        self.queue.push_back(FrontierEntry { url, depth });
        true
    }

    /// Takes the oldest entry off the queue
    pub fn pop(&mut self) -> Option<FrontierEntry> {
        self.queue.pop_front()
    }

    /// Drops all pending entries; the visited set is kept
    pub fn clear(&mut self) {
        self.queue.clear();
    }

    /// Returns whether the URL has ever been enqueued
    #[cfg(test)]
    pub(crate) fn is_visited(&self, url: &Url) -> bool {
        self.visited.contains(url.as_str())
    }

    /// Returns the number of entries awaiting a fetch
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns whether the queue is empty
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Returns the number of distinct URLs ever enqueued
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }
}
