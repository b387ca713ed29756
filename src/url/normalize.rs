use crate::config::ItemizeOptions;
use crate::url::Scope;
use crate::{UrlError, UrlResult};
use url::Url;

/// Parses and validates a crawl root
///
/// The root must be an absolute `http` or `https` URL with a host.
pub fn parse_root(root: &str) -> UrlResult<Url> {
    let url = Url::parse(root.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingDomain);
    }

    Ok(url)
}

/// Canonicalizes hrefs for one crawl
///
/// # Normalization Steps
///
/// 1. Resolve the href against the page it was found on (relative paths,
///    `..`, absolute paths and absolute URLs)
/// 2. Reject anything that is not `http` or `https` after resolution
///    (`javascript:`, `mailto:`, `tel:`, `data:`)
/// 3. Reject anything outside the [`Scope`] (foreign origin, escaping above
///    the root's directory, or too many segments below it)
/// 4. Strip the query string unless `query` is enabled
/// 5. Strip the fragment unless `hash` is enabled
///
/// Two hrefs that normalize to the same string are the same item.
#[derive(Debug, Clone)]
pub struct Normalizer {
    scope: Scope,
    query: bool,
    hash: bool,
}

impl Normalizer {
    /// Creates a normalizer for a crawl rooted at `root`
    pub fn new(root: &Url, options: &ItemizeOptions) -> Self {
        Self {
            scope: Scope::from_root(root, options.depth),
            query: options.query,
            hash: options.hash,
        }
    }

    /// The scope candidates are checked against
    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Applies the query/fragment policy in place
    pub fn apply_policy(&self, url: &mut Url) {
        if !self.query || url.query() == Some("") {
            url.set_query(None);
        }

        if !self.hash || url.fragment() == Some("") {
            url.set_fragment(None);
        }
    }

    /// Resolves an href and applies every rule, reporting why it was rejected
    ///
    /// # Examples
    ///
    /// ```
    /// use itemize::{ItemizeOptions, Normalizer};
    /// use url::Url;
    ///
    /// let root = Url::parse("http://localhost/base/").unwrap();
    /// let normalizer = Normalizer::new(&root, &ItemizeOptions::default());
    ///
    /// let url = normalizer.resolve(&root, "a/?x=1#top").unwrap();
    /// assert_eq!(url.as_str(), "http://localhost/base/a/");
    /// assert!(normalizer.resolve(&root, "..").is_err());
    /// ```
    pub fn resolve(&self, base: &Url, href: &str) -> UrlResult<Url> {
        let href = href.trim();
        if href.is_empty() {
            return Err(UrlError::Parse("empty href".to_string()));
        }

        let mut url = base
            .join(href)
            .map_err(|e| UrlError::Parse(format!("{}: {}", href, e)))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(UrlError::InvalidScheme(url.scheme().to_string()));
        }

        self.scope.check(&url)?;
        self.apply_policy(&mut url);

        Ok(url)
    }

    /// Resolves an href, returning `None` for any rejected candidate
    pub fn normalize(&self, base: &Url, href: &str) -> Option<Url> {
        match self.resolve(base, href) {
            Ok(url) => Some(url),
            Err(e) => {
                tracing::trace!("Rejected href {:?} on {}: {}", href, base, e);
                None
            }
        }
    }
}
