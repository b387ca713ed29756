//! HTML link extraction
//!
//! This module turns a document body into the raw href values of its
//! anchor-like elements, in document order. Resolution and filtering are
//! left to the normalizer.

use scraper::{Html, Selector};

/// Extracts every href from `<a>` and `<area>` elements
///
/// Hrefs are returned verbatim (untrimmed, unresolved) and in document order.
/// Malformed markup never fails; it just yields fewer links.
///
/// # Example
///
/// ```
/// use itemize::crawler::extract_links;
///
/// let html = r#"<html><body><a href="a/">a</a><a href="b/">b</a></body></html>"#;
/// assert_eq!(extract_links(html), vec!["a/", "b/"]);
/// ```
pub fn extract_links(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);

    let selector = match Selector::parse("a[href], area[href]") {
        Ok(selector) => selector,
        Err(_) => return Vec::new(),
    };

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .map(|href| href.to_string())
        .collect()
}
