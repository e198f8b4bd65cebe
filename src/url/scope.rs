use crate::url::Link;

/// Extensions excluded by the default policy
///
/// Binary and media resources that are slow to fetch and never contain links.
pub const DEFAULT_EXCLUDED_EXTENSIONS: &[&str] = &[".pdf", ".mp3"];

/// Decides which discovered links are followed
///
/// A candidate is followed only when its hostname is exactly the hostname of
/// the page it was found on and its path does not end in an excluded
/// extension. A different subdomain counts as a different host. The scheme
/// is not compared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopePolicy {
    excluded_extensions: Vec<String>,
}

impl ScopePolicy {
    /// Creates a policy with the given excluded extensions
    ///
    /// Extensions may be written with or without the leading dot and are
    /// matched case-insensitively.
    pub fn new<I, S>(excluded_extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let excluded_extensions = excluded_extensions
            .into_iter()
            .map(|ext| {
                let ext = ext.as_ref().trim().to_ascii_lowercase();
                if ext.starts_with('.') {
                    ext
                } else {
                    format!(".{}", ext)
                }
            })
            .collect();

        Self {
            excluded_extensions,
        }
    }

    /// Returns true if `candidate`, found on `parent`, should be crawled
    pub fn can_visit(&self, parent: &Link, candidate: &Link) -> bool {
        match (parent.hostname(), candidate.hostname()) {
            (Some(parent_host), Some(candidate_host)) if parent_host == candidate_host => {}
            _ => return false,
        }

        !self.has_excluded_extension(candidate)
    }

    /// Returns the normalized excluded extensions
    pub fn excluded_extensions(&self) -> &[String] {
        &self.excluded_extensions
    }

    fn has_excluded_extension(&self, link: &Link) -> bool {
        let path = link.path().to_ascii_lowercase();
        self.excluded_extensions
            .iter()
            .any(|ext| path.ends_with(ext.as_str()))
    }
}

impl Default for ScopePolicy {
    fn default() -> Self {
        Self::new(DEFAULT_EXCLUDED_EXTENSIONS)
    }
}
