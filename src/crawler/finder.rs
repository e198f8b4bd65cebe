//! The link-finding capability used by crawl workers
//!
//! Workers only ever see the [`LinkFinder`] trait. [`HttpLinkFinder`] is the
//! production implementation; tests plug in in-memory site maps.

use crate::config::HttpConfig;
use crate::crawler::fetcher::{build_http_client, build_rate_limiter, fetch_page, FetchResult};
use crate::crawler::parser::extract_links;
use crate::url::Link;
use async_trait::async_trait;
use governor::DefaultDirectRateLimiter;
use reqwest::Client;
use thiserror::Error;

/// Why the links of a page could not be found
#[derive(Debug, Error)]
pub enum LinkFinderError {
    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request to {url} timed out")]
    Timeout { url: String },

    #[error("Unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { url: String, status: u16 },

    #[error("Failed to read body of {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Crawl cancelled before the page was read")]
    Cancelled,
}

impl LinkFinderError {
    /// Short, stable name of the failure class, used in statistics
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Request { .. } => "request",
            Self::Timeout { .. } => "timeout",
            Self::UnexpectedStatus { .. } => "http-status",
            Self::Body { .. } => "body",
            Self::Cancelled => "cancelled",
        }
    }
}

/// Finds the links on one page
#[async_trait]
pub trait LinkFinder: Send + Sync {
    /// Returns every link on `page`, in document order, duplicates included
    async fn find_links_on_page(&self, page: &Link) -> Result<Vec<Link>, LinkFinderError>;
}

/// Link finder backed by HTTP GET requests and HTML parsing
pub struct HttpLinkFinder {
    client: Client,
    limiter: Option<DefaultDirectRateLimiter>,
}

impl HttpLinkFinder {
    /// Creates a link finder from the HTTP configuration
    pub fn new(config: &HttpConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::with_client(
            build_http_client(config)?,
            config.requests_per_second,
        ))
    }

    /// Creates a link finder around an existing client
    pub fn with_client(client: Client, requests_per_second: u32) -> Self {
        Self {
            client,
            limiter: build_rate_limiter(requests_per_second),
        }
    }
}

impl std::fmt::Debug for HttpLinkFinder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpLinkFinder")
            .field("client", &self.client)
            .field("rate_limited", &self.limiter.is_some())
            .finish()
    }
}

#[async_trait]
impl LinkFinder for HttpLinkFinder {
    async fn find_links_on_page(&self, page: &Link) -> Result<Vec<Link>, LinkFinderError> {
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }

        tracing::debug!("Fetching {}", page);
        match fetch_page(&self.client, page.url()).await? {
            FetchResult::Html { final_url, body } => {
                if &final_url != page.url() {
                    tracing::debug!("{} redirected to {}", page, final_url);
                }
                Ok(extract_links(&body, &final_url))
            }
            FetchResult::NotHtml { content_type } => {
                tracing::debug!("Skipping non-HTML page {} ({})", page, content_type);
                Ok(Vec::new())
            }
        }
    }
}
