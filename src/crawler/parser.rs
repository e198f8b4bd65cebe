//! HTML parser for extracting links
//!
//! Every `<a href>` on the page is resolved against the page URL and returned
//! in document order. Nothing is deduplicated or filtered by scope here; that
//! is the coordinator's job.

use crate::url::{resolve_url, Link};
use scraper::{Html, Selector};
use url::Url;

/// Extracts all links from an HTML document
///
/// # Link Extraction Rules
///
/// - Only `<a>` elements with an `href` attribute are considered
/// - Relative hrefs are resolved against `base_url`
/// - Fragment-bearing hrefs keep their fragment
/// - Duplicates are kept, in the order they appear
/// - An href that cannot be parsed is skipped; the rest of the page is still
///   extracted
///
/// # Example
///
/// ```
/// use sitewalk::crawler::extract_links;
/// use url::Url;
///
/// let html = r##"<html><body><a href="/about">About</a><a href="#top">Top</a></body></html>"##;
/// let base_url = Url::parse("https://example.com/home").unwrap();
/// let links = extract_links(html, &base_url);
/// assert_eq!(links[0].as_str(), "https://example.com/about");
/// assert_eq!(links[1].as_str(), "https://example.com/home#top");
/// ```
pub fn extract_links(html: &str, base_url: &Url) -> Vec<Link> {
    let document = Html::parse_document(html);

    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| match resolve_url(base_url, href) {
            Ok(url) => Some(Link::from(url)),
            Err(e) => {
                tracing::debug!("Dropping malformed link on {}: {}", base_url, e);
                None
            }
        })
        .collect()
}
