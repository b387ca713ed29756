//! Crawl iterator - the pull-based face of a crawl
//!
//! An [`Itemizer`] owns everything one crawl needs: the frontier, the visited
//! set, the normalizer and the fetcher's connection. Each call to
//! [`Itemizer::next`] performs at most one fetch, enqueues what that page
//! links to, and hands back the fetched URL. Nothing is fetched ahead of the
//! caller.

use crate::config::{validate, Config, FetcherConfig, ItemizeOptions};
use crate::crawler::fetcher::{FetchResult, Fetcher};
use crate::crawler::frontier::{Frontier, FrontierEntry};
use crate::crawler::parser::extract_links;
use crate::state::IteratorState;
use crate::url::{parse_root, Normalizer};
use crate::ItemizeError;
use std::sync::Arc;
use tokio::sync::watch;
use url::Url;

/// Counters describing a crawl so far
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlStats {
    /// Items handed to the caller
    pub emitted: usize,
    /// Fetches that completed (successfully or not)
    pub fetched: usize,
    /// Fetched pages that contributed no links (errors, non-HTML)
    pub dead_ends: usize,
    /// Hrefs dropped by the normalizer
    pub rejected: usize,
    /// Entries still waiting in the frontier
    pub frontier_len: usize,
    /// Distinct URLs ever enqueued, the root included
    pub discovered: usize,
}

/// Cloneable handle that closes an [`Itemizer`] from anywhere
///
/// Closing through a handle while [`Itemizer::next`] is awaiting a fetch
/// abandons that fetch; `next` then returns `None`.
#[derive(Debug, Clone)]
pub struct CloseHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl CloseHandle {
    fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Requests that the crawl stop. Idempotent.
    pub fn close(&self) {
        self.tx.send_replace(true);
    }

    /// Returns true once any holder has closed the crawl
    pub fn is_closed(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolves once the crawl has been closed
    async fn closed(&self) {
        let mut rx = self.tx.subscribe();
        while !*rx.borrow_and_update() {
            if rx.changed().await.is_err() {
                return;
            }
        }
    }
}

/// A single crawl, advanced one item at a time
///
/// # Example
///
/// ```no_run
/// use itemize::{itemize, ItemizeOptions};
///
/// # async fn example() -> itemize::Result<()> {
/// let mut items = itemize("http://localhost:5000/base/", ItemizeOptions::default().with_depth(2))?;
///
/// let root = items.next().await;
/// assert_eq!(root.as_deref(), Some("http://localhost:5000/base/"));
///
/// while !items.done() {
///     items.next().await;
/// }
/// println!("found {} items", items.all().len());
/// items.close();
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Itemizer {
    root: Url,
    options: ItemizeOptions,
    normalizer: Normalizer,
    frontier: Frontier,
    fetcher: Fetcher,
    items: Vec<String>,
    state: IteratorState,
    stats: CrawlStats,
    closer: CloseHandle,
}

impl Itemizer {
    /// Creates a crawl rooted at `root`
    ///
    /// # Returns
    ///
    /// * `Ok(Itemizer)` - Ready to crawl; nothing has been fetched yet
    /// * `Err(ItemizeError)` - The root is not an absolute http(s) URL, or the
    ///   HTTP client could not be built
    pub fn new(
        root: &str,
        options: ItemizeOptions,
        fetcher_config: &FetcherConfig,
    ) -> crate::Result<Self> {
        let mut root = parse_root(root)?;
        let normalizer = Normalizer::new(&root, &options);
        normalizer.apply_policy(&mut root);

        let fetcher = Fetcher::new(fetcher_config)?;

        tracing::debug!(
            "Created itemizer for {} (scope: {}, depth: {:?}, query: {}, hash: {})",
            root,
            normalizer.scope().prefix(),
            options.depth,
            options.query,
            options.hash
        );

        Ok(Self {
            frontier: Frontier::new(root.clone()),
            root,
            options,
            normalizer,
            fetcher,
            items: Vec::new(),
            state: IteratorState::Idle,
            stats: CrawlStats::default(),
            closer: CloseHandle::new(),
        })
    }

    /// The normalized root URL; always the first item
    pub fn root(&self) -> &Url {
        &self.root
    }

    /// The options this crawl was started with
    pub fn options(&self) -> &ItemizeOptions {
        &self.options
    }

    /// Current lifecycle state
    pub fn state(&self) -> IteratorState {
        if self.closer.is_closed() {
            IteratorState::Closed
        } else {
            self.state
        }
    }

    /// Produces the next item in breadth-first order
    ///
    /// Fetches the next frontier entry, enqueues the in-scope links it carries
    /// at depth + 1 (only while that stays within the depth limit), and returns
    /// the fetched URL. A failed fetch still yields its URL; it just adds no
    /// links.
    ///
    /// Returns `None` once the frontier is drained or the crawl is closed, and
    /// keeps returning `None` from then on without touching the network.
    pub async fn next(&mut self) -> Option<String> {
        if self.closer.is_closed() {
            self.shutdown();
            return None;
        }

        if !self.state.is_active() {
            return None;
        }

        let entry = match self.frontier.pop() {
            Some(entry) => entry,
            None => {
                self.exhaust();
                return None;
            }
        };

        self.set_state(IteratorState::Advancing);

        let closer = self.closer.clone();
        let outcome = tokio::select! {
            biased;
            _ = closer.closed() => None,
            result = self.fetcher.fetch(&entry.url) => Some(result),
        };

        let Some(result) = outcome else {
            tracing::debug!("Abandoned in-flight fetch of {}", entry.url);
            self.shutdown();
            return None;
        };

        self.stats.fetched += 1;
        self.discover(&entry, &result);

        let item = entry.url.to_string();
        tracing::debug!("Item {} (depth {}): {}", self.items.len(), entry.depth, item);
        self.items.push(item.clone());
        self.stats.emitted += 1;

        if self.frontier.is_empty() {
            self.exhaust();
        }

        Some(item)
    }

    /// True once no further items will be produced
    ///
    /// Never suspends; use it to drive a drain loop before calling [`all`](Self::all).
    pub fn done(&self) -> bool {
        self.state().is_terminal()
    }

    /// Every item produced so far, in emission order
    pub fn all(&self) -> &[String] {
        &self.items
    }

    /// Snapshot of the crawl counters
    pub fn stats(&self) -> CrawlStats {
        CrawlStats {
            frontier_len: self.frontier.len(),
            discovered: self.frontier.visited_count(),
            ..self.stats
        }
    }

    /// A handle that can close this crawl from another task
    pub fn close_handle(&self) -> CloseHandle {
        self.closer.clone()
    }

    /// Stops the crawl and releases its connection
    ///
    /// Safe to call in any state and any number of times.
    pub fn close(&mut self) {
        self.closer.close();
        self.shutdown();
    }

    /// Enqueues the links of a fetched page
    fn discover(&mut self, entry: &FrontierEntry, result: &FetchResult) {
        let (base, body) = match result {
            FetchResult::HttpError { status_code } => {
                tracing::warn!("Dead end at {}: HTTP {}", entry.url, status_code);
                self.stats.dead_ends += 1;
                return;
            }
            FetchResult::NetworkError { error } => {
                tracing::warn!("Dead end at {}: {}", entry.url, error);
                self.stats.dead_ends += 1;
                return;
            }
            FetchResult::Success { .. } => match result.document() {
                Some(document) => document,
                None => {
                    tracing::debug!("No links in non-HTML page {}", entry.url);
                    self.stats.dead_ends += 1;
                    return;
                }
            },
        };

        let next_depth = entry.depth + 1;
        if !self.options.allows_depth(next_depth) {
            tracing::trace!(
                "Not following links of {}: depth {} is at the limit",
                entry.url,
                entry.depth
            );
            return;
        }

        let mut added = 0;
        for href in extract_links(body) {
            match self.normalizer.normalize(base, &href) {
                Some(url) => {
                    if self.frontier.push(url, next_depth) {
                        added += 1;
                    }
                }
                None => self.stats.rejected += 1,
            }
        }

        tracing::debug!(
            "Enqueued {} new links from {} at depth {}",
            added,
            entry.url,
            next_depth
        );
    }

    fn exhaust(&mut self) {
        if self.state == IteratorState::Exhausted {
            return;
        }

        self.set_state(IteratorState::Exhausted);
        self.fetcher.release();
        tracing::info!(
            "Crawl of {} exhausted after {} items",
            self.root,
            self.items.len()
        );
    }

    fn shutdown(&mut self) {
        if self.state == IteratorState::Closed {
            return;
        }

        self.set_state(IteratorState::Closed);
        self.frontier.clear();
        self.fetcher.release();
        tracing::info!(
            "Crawl of {} closed after {} items",
            self.root,
            self.items.len()
        );
    }

    fn set_state(&mut self, next: IteratorState) {
        if let Err(e) = self.state.transition_to(next) {
            tracing::error!("{}", e);
        }
    }
}

/// Starts a crawl of `root` with default fetcher settings
///
/// Nothing is fetched until the first call to [`Itemizer::next`].
pub fn itemize(root: &str, options: ItemizeOptions) -> Result<Itemizer, ItemizeError> {
    Itemizer::new(root, options, &FetcherConfig::default())
}

/// Starts a crawl of `root` using a loaded configuration
///
/// The configuration is validated first, so hand-built configs get the same
/// checks as ones read from a file.
pub fn itemize_with_config(root: &str, config: &Config) -> Result<Itemizer, ItemizeError> {
    validate(config)?;
    Itemizer::new(root, config.options, &config.fetcher)
}
