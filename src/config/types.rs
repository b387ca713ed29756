use serde::Deserialize;

/// Main configuration structure for Itemize
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub options: ItemizeOptions,
    #[serde(default)]
    pub fetcher: FetcherConfig,
}

/// Options recognised by a single crawl
///
/// Every field has a fixed type and default: unbounded depth, and both the
/// query string and the fragment are stripped before deduplication.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct ItemizeOptions {
    /// Crawl depth limit (`None` = unbounded)
    ///
    /// Bounds two things: the number of link hops from the root that will be
    /// fetched, and how many path segments below the root's directory a URL
    /// may sit. With `depth = 1` and root `https://example.com/`, a link to
    /// `/blog/2024/post` is rejected even though it is one hop away.
    #[serde(default)]
    pub depth: Option<u32>,

    /// Treat URLs differing only by query string as distinct items
    #[serde(default)]
    pub query: bool,

    /// Treat URLs differing only by fragment as distinct items
    #[serde(default)]
    pub hash: bool,
}

impl ItemizeOptions {
    /// Sets the maximum crawl depth
    pub fn with_depth(mut self, depth: u32) -> Self {
        self.depth = Some(depth);
        self
    }

    /// Enables or disables query-string sensitivity
    pub fn with_query(mut self, query: bool) -> Self {
        self.query = query;
        self
    }

    /// Enables or disables fragment sensitivity
    pub fn with_hash(mut self, hash: bool) -> Self {
        self.hash = hash;
        self
    }

    /// Returns true if an entry at `depth` hops may be fetched
    pub fn allows_depth(&self, depth: u32) -> bool {
        self.depth.map_or(true, |max| depth <= max)
    }
}

/// HTTP client configuration for the fetcher
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FetcherConfig {
    /// User agent sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Total request timeout (seconds)
    #[serde(rename = "timeout", default = "default_timeout")]
    pub timeout_secs: u64,

    /// Connection establishment timeout (seconds)
    #[serde(rename = "connect-timeout", default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// How long the kept-alive connection may sit idle (seconds)
    #[serde(rename = "pool-idle-timeout", default = "default_pool_idle_timeout")]
    pub pool_idle_timeout_secs: u64,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: default_timeout(),
            connect_timeout_secs: default_connect_timeout(),
            pool_idle_timeout_secs: default_pool_idle_timeout(),
        }
    }
}

fn default_user_agent() -> String {
    format!("itemize/{}", env!("CARGO_PKG_VERSION"))
}

fn default_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_pool_idle_timeout() -> u64 {
    90
}
