use url::Url;

/// Extracts the hostname from a URL
///
/// The `url` crate already lowercases hosts of http(s) URLs while parsing, so
/// the returned value can be compared directly. The port is not part of the
/// hostname. URLs without an authority (`mailto:`, `data:`) have no host.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sitewalk::url::extract_hostname;
///
/// let url = Url::parse("https://EXAMPLE.COM:8080/path").unwrap();
/// assert_eq!(extract_hostname(&url), Some("example.com"));
///
/// let url = Url::parse("mailto:someone@example.com").unwrap();
/// assert_eq!(extract_hostname(&url), None);
/// ```
pub fn extract_hostname(url: &Url) -> Option<&str> {
    url.host_str()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_simple_domain() {
        let url = Url::parse("https://example.com/").unwrap();
        assert_eq!(extract_hostname(&url), Some("example.com"));
    }

    #[test]
    fn test_extract_subdomain() {
        let url = Url::parse("https://blog.example.com/post").unwrap();
        assert_eq!(extract_hostname(&url), Some("blog.example.com"));
    }

    #[test]
    fn test_extract_with_port() {
        let url = Url::parse("http://127.0.0.1:8080/").unwrap();
        assert_eq!(extract_hostname(&url), Some("127.0.0.1"));
    }

    #[test]
    fn test_extract_mixed_case() {
        let url = Url::parse("https://Example.COM/").unwrap();
        assert_eq!(extract_hostname(&url), Some("example.com"));
    }

    #[test]
    fn test_extract_with_fragment() {
        let url = Url::parse("https://example.com/page#section").unwrap();
        assert_eq!(extract_hostname(&url), Some("example.com"));
    }

    #[test]
    fn test_no_host() {
        let url = Url::parse("javascript:void(0)").unwrap();
        assert_eq!(extract_hostname(&url), None);
    }
}
