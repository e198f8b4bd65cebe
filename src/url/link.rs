//! The `Link` value type
//!
//! A `Link` is an immutable, already-normalized URL. Equality and hashing use
//! the serialized form, so two links that normalize to the same string are
//! the same key in the visited set.

use crate::url::domain::extract_hostname;
use crate::url::normalize::{canonical_for_visiting, normalize_url, resolve_url};
use crate::UrlResult;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};
use url::Url;

/// A normalized URL found on, or used to reach, a page
#[derive(Clone)]
pub struct Link {
    url: Url,
    text: String,
}

impl Link {
    /// Parses an absolute URL into a `Link`
    ///
    /// Surrounding whitespace is ignored. Relative input is rejected; use
    /// [`Link::resolve`] for hrefs found on a page.
    ///
    /// # Examples
    ///
    /// ```
    /// use sitewalk::Link;
    ///
    /// let link = Link::parse(" https://example.com/about#team ").unwrap();
    /// assert_eq!(link.as_str(), "https://example.com/about#team");
    /// assert_eq!(link.hostname(), Some("example.com"));
    /// ```
    pub fn parse(raw: &str) -> UrlResult<Self> {
        normalize_url(raw).map(Self::from_url)
    }

    /// Resolves an href relative to this link
    ///
    /// Absolute hrefs are parsed as-is; anything else (`/path`, `#anchor`,
    /// `../up`, `?q=1`) is joined onto this link.
    pub fn resolve(&self, href: &str) -> UrlResult<Self> {
        resolve_url(&self.url, href).map(Self::from_url)
    }

    /// Returns the form of this link that identifies the page to visit
    ///
    /// The fragment and any trailing slash are removed, so `/about`,
    /// `/about/` and `/about#team` all share one canonical link.
    pub fn canonical_for_visiting(&self) -> Self {
        let (url, text) = canonical_for_visiting(&self.url);
        Self { url, text }
    }

    /// Returns the hostname used for scope comparison, if the URL has one
    pub fn hostname(&self) -> Option<&str> {
        extract_hostname(&self.url)
    }

    /// Returns the path component of the URL
    pub fn path(&self) -> &str {
        self.url.path()
    }

    /// Returns the URL scheme
    pub fn scheme(&self) -> &str {
        self.url.scheme()
    }

    /// Returns the parsed URL
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Returns the link's string form
    pub fn as_str(&self) -> &str {
        &self.text
    }

    fn from_url(url: Url) -> Self {
        let text = url.to_string();
        Self { url, text }
    }
}

impl From<Url> for Link {
    fn from(url: Url) -> Self {
        Self::from_url(url)
    }
}

impl PartialEq for Link {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl Eq for Link {}

impl Hash for Link {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.text.hash(state);
    }
}

impl PartialOrd for Link {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Link {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.text.cmp(&other.text)
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl fmt::Debug for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Link({})", self.text)
    }
}

impl Serialize for Link {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.text)
    }
}

impl<'de> Deserialize<'de> for Link {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Link::parse(&raw).map_err(serde::de::Error::custom)
    }
}
