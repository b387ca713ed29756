use crate::{UrlError, UrlResult};
use url::{Origin, Url};

/// The boundary a crawl must stay within
///
/// A scope is derived from the root URL: candidates must share the root's
/// origin (scheme, host, port) and their path must begin with the root's
/// directory prefix. When a depth is configured, candidates may also sit at
/// most that many path segments below the prefix.
#[derive(Debug, Clone)]
pub struct Scope {
    origin: Origin,
    prefix: String,
    max_depth: Option<u32>,
}

impl Scope {
    /// Builds the scope for a crawl rooted at `root`
    ///
    /// The prefix is the root's path up to and including its last `/`, so
    /// `/base/` scopes to `/base/` and `/options` scopes to `/`.
    ///
    /// # Examples
    ///
    /// ```
    /// use itemize::url::Scope;
    /// use url::Url;
    ///
    /// let root = Url::parse("http://localhost/base/").unwrap();
    /// let scope = Scope::from_root(&root, Some(2));
    /// assert_eq!(scope.prefix(), "/base/");
    /// assert!(scope.contains(&Url::parse("http://localhost/base/a/").unwrap()));
    /// assert!(!scope.contains(&Url::parse("http://localhost/").unwrap()));
    /// ```
    pub fn from_root(root: &Url, max_depth: Option<u32>) -> Self {
        let path = root.path();
        let prefix = match path.rfind('/') {
            Some(idx) => path[..=idx].to_string(),
            None => "/".to_string(),
        };

        Self {
            origin: root.origin(),
            prefix,
            max_depth,
        }
    }

    /// The directory prefix every in-scope path starts with
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns true if the URL shares the root's origin and path prefix
    pub fn contains(&self, url: &Url) -> bool {
        url.origin() == self.origin && url.path().starts_with(&self.prefix)
    }

    /// Number of non-empty path segments below the prefix, if in scope
    pub fn path_depth(&self, url: &Url) -> Option<usize> {
        if !self.contains(url) {
            return None;
        }

        let rest = &url.path()[self.prefix.len()..];
        Some(rest.split('/').filter(|s| !s.is_empty()).count())
    }

    /// Checks a resolved URL against every scope rule
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The URL is a valid crawl candidate
    /// * `Err(UrlError::OutOfScope)` - Wrong origin, parent escape, or too deep
    pub fn check(&self, url: &Url) -> UrlResult<()> {
        if url.origin() != self.origin {
            return Err(UrlError::OutOfScope(format!("{} has a foreign origin", url)));
        }

        let depth = self.path_depth(url).ok_or_else(|| {
            UrlError::OutOfScope(format!("{} escapes above {}", url, self.prefix))
        })?;

        if let Some(max) = self.max_depth {
            if depth > max as usize {
                return Err(UrlError::OutOfScope(format!(
                    "{} is {} segments below {} (max {})",
                    url, depth, self.prefix, max
                )));
            }
        }

        Ok(())
    }
}
