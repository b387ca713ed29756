//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for a crawl, including:
//! - Building one keep-alive HTTP client per crawl
//! - GET requests to fetch page content
//! - Error classification into dead ends
//!
//! Nothing here returns an error to the crawl loop: every failure is folded
//! into a [`FetchResult`] so that one bad page only ends its own branch.

use crate::config::FetcherConfig;
use reqwest::header::{HeaderMap, HeaderValue, CONNECTION, CONTENT_TYPE};
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched the page
    Success {
        /// Final URL after redirects
        final_url: Url,
        /// HTTP status code
        status_code: u16,
        /// Content-Type header value, if the server sent one
        content_type: Option<String>,
        /// Page body content
        body: String,
    },

    /// Server answered with a non-success status
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Network error (connection refused, timeout, released client, etc.)
    NetworkError {
        /// Error description
        error: String,
    },
}

impl FetchResult {
    /// Returns true if the page was fetched successfully
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Returns the base URL and body to extract links from
    ///
    /// Only successful responses with an HTML (or missing) content type carry
    /// links; everything else is a dead end.
    pub fn document(&self) -> Option<(&Url, &str)> {
        match self {
            Self::Success {
                final_url,
                content_type,
                body,
                ..
            } if is_html(content_type.as_deref()) => Some((final_url, body.as_str())),
            _ => None,
        }
    }
}

/// Returns true if a Content-Type denotes a document we can pull links from
fn is_html(content_type: Option<&str>) -> bool {
    match content_type {
        None => true,
        Some(ct) => {
            let ct = ct.to_ascii_lowercase();
            ct.contains("text/html") || ct.contains("application/xhtml+xml")
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// Every request carries `Connection: keep-alive`, and the pool keeps a
/// single idle connection per host so the whole crawl rides on one socket.
///
/// # Arguments
///
/// * `config` - The fetcher configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use itemize::config::FetcherConfig;
/// use itemize::crawler::build_http_client;
///
/// let client = build_http_client(&FetcherConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &FetcherConfig) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));

    Client::builder()
        .user_agent(config.user_agent.as_str())
        .default_headers(headers)
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .pool_idle_timeout(Duration::from_secs(config.pool_idle_timeout_secs))
        .pool_max_idle_per_host(1)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL, classifying every failure
///
/// | Condition | Result |
/// |-----------|--------|
/// | HTTP 2xx | Success |
/// | Any other status | HttpError |
/// | Timeout | NetworkError |
/// | Connection refused | NetworkError |
/// | Body read failure | NetworkError |
///
/// The fragment is never sent over the wire.
pub async fn fetch_url(client: &Client, url: &Url) -> FetchResult {
    let mut request_url = url.clone();
    request_url.set_fragment(None);

    match client.get(request_url).send().await {
        Ok(response) => {
            let status = response.status();

            if !status.is_success() {
                return FetchResult::HttpError {
                    status_code: status.as_u16(),
                };
            }

            let final_url = response.url().clone();
            let content_type = response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(|v| v.to_string());

            match response.text().await {
                Ok(body) => FetchResult::Success {
                    final_url,
                    status_code: status.as_u16(),
                    content_type,
                    body,
                },
                Err(e) => FetchResult::NetworkError {
                    error: e.to_string(),
                },
            }
        }
        Err(e) => {
            if e.is_timeout() {
                FetchResult::NetworkError {
                    error: "Request timeout".to_string(),
                }
            } else if e.is_connect() {
                FetchResult::NetworkError {
                    error: "Connection refused".to_string(),
                }
            } else {
                FetchResult::NetworkError {
                    error: e.to_string(),
                }
            }
        }
    }
}

/// Owns the connection context of one crawl
///
/// The client is released exactly once, by [`Fetcher::release`] or on drop.
#[derive(Debug)]
pub struct Fetcher {
    client: Option<Client>,
}

impl Fetcher {
    /// Creates a fetcher with its own client
    pub fn new(config: &FetcherConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: Some(build_http_client(config)?),
        })
    }

    /// Returns true once the client has been released
    #[cfg(test)]
    pub(crate) fn is_released(&self) -> bool {
        self.client.is_none()
    }

    /// Drops the client and its pooled connection
    ///
    /// Returns true if this call performed the release.
    pub fn release(&mut self) -> bool {
        self.client.take().is_some()
    }

    /// Fetches a URL over the crawl's connection
    pub async fn fetch(&self, url: &Url) -> FetchResult {
        match &self.client {
            Some(client) => fetch_url(client, url).await,
            None => FetchResult::NetworkError {
                error: "Fetcher has been released".to_string(),
            },
        }
    }
}
