use crate::{UrlError, UrlResult};
use url::Url;

/// Normalizes an absolute URL string
///
/// # Normalization Steps
///
/// 1. Trim leading and trailing whitespace
/// 2. Parse the URL; reject if malformed or relative
/// 3. Re-serialize it, which lowercases the host of http(s) URLs,
///    resolves dot segments and percent-encodes the path consistently
///
/// The fragment and any trailing slash are kept; they only go away in
/// [`canonical_for_visiting`].
///
/// # Examples
///
/// ```
/// use sitewalk::url::normalize_url;
///
/// let url = normalize_url(" HTTP://EXAMPLE.COM/a/../page/#top ").unwrap();
/// assert_eq!(url.as_str(), "http://example.com/page/#top");
/// ```
pub fn normalize_url(raw: &str) -> UrlResult<Url> {
    let trimmed = raw.trim();
    Url::parse(trimmed).map_err(|e| UrlError::Parse {
        input: trimmed.to_string(),
        reason: e.to_string(),
    })
}

/// Resolves an href found on `base` into an absolute URL
///
/// Absolute hrefs replace the base entirely; relative ones are joined
/// following RFC 3986 reference resolution.
pub fn resolve_url(base: &Url, href: &str) -> UrlResult<Url> {
    let trimmed = href.trim();
    base.join(trimmed).map_err(|e| UrlError::Parse {
        input: trimmed.to_string(),
        reason: e.to_string(),
    })
}

/// Computes the canonical form of a URL used as the visit/dedup key
///
/// Removes the fragment and strips trailing slashes from the path. Returns
/// the parsed URL to fetch alongside the canonical string, since
/// `https://example.com` cannot be represented without its root slash once
/// parsed.
pub fn canonical_for_visiting(url: &Url) -> (Url, String) {
    let mut url = url.clone();
    url.set_fragment(None);

    if url.query().is_some() {
        let path = url.path().trim_end_matches('/').to_string();
        url.set_path(&path);
        let text = url.to_string();
        return (url, text);
    }

    let text = url.as_str().trim_end_matches('/').to_string();
    let url = Url::parse(&text).unwrap_or(url);
    (url, text)
}
