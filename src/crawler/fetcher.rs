//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client with the configured user agent and timeout
//! - Building the rate limiter shared by all workers
//! - GET requests and response classification

use crate::config::HttpConfig;
use crate::crawler::finder::LinkFinderError;
use reqwest::{header::CONTENT_TYPE, Client, StatusCode};
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use std::num::NonZeroU32;
use std::time::Duration;
use url::Url;

/// Result of a successful fetch
#[derive(Debug)]
pub enum FetchResult {
    /// A 200 response with an HTML (or unlabelled) body
    Html {
        /// Final URL after redirects, used to resolve relative hrefs
        final_url: Url,
        /// Page body content
        body: String,
    },

    /// A 200 response whose Content-Type is not HTML
    NotHtml {
        /// The Content-Type received
        content_type: String,
    },
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```
/// use sitewalk::config::HttpConfig;
/// use sitewalk::crawler::build_http_client;
///
/// let client = build_http_client(&HttpConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    let timeout = Duration::from_secs(config.timeout_secs);

    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(timeout)
        .connect_timeout(timeout)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Builds the limiter that paces request starts across all workers
///
/// At most `requests_per_second` requests start in any one second. A rate of
/// zero disables pacing and returns `None`.
pub fn build_rate_limiter(requests_per_second: u32) -> Option<DefaultDirectRateLimiter> {
    NonZeroU32::new(requests_per_second)
        .map(|rate| RateLimiter::direct(Quota::per_second(rate)))
}

/// Fetches a page and classifies the response
///
/// | Condition | Result |
/// |-----------|--------|
/// | Timeout | `Err(Timeout)` |
/// | Connection or other transport error | `Err(Request)` |
/// | Status other than 200 | `Err(UnexpectedStatus)` |
/// | 200 with a non-HTML Content-Type | `Ok(NotHtml)` |
/// | 200 with HTML or no Content-Type | `Ok(Html)` |
/// | Body read failure | `Err(Body)` |
pub async fn fetch_page(client: &Client, url: &Url) -> Result<FetchResult, LinkFinderError> {
    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|e| classify_request_error(url, e))?;

    let status = response.status();
    if status != StatusCode::OK {
        return Err(LinkFinderError::UnexpectedStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    if let Some(content_type) = content_type {
        if !is_html(&content_type) {
            return Ok(FetchResult::NotHtml { content_type });
        }
    }

    let final_url = response.url().clone();
    let body = response.text().await.map_err(|e| {
        if e.is_timeout() {
            LinkFinderError::Timeout {
                url: url.to_string(),
            }
        } else {
            LinkFinderError::Body {
                url: url.to_string(),
                source: e,
            }
        }
    })?;

    Ok(FetchResult::Html { final_url, body })
}

fn classify_request_error(url: &Url, error: reqwest::Error) -> LinkFinderError {
    if error.is_timeout() {
        LinkFinderError::Timeout {
            url: url.to_string(),
        }
    } else {
        LinkFinderError::Request {
            url: url.to_string(),
            source: error,
        }
    }
}

fn is_html(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    mime == "text/html" || mime == "application/xhtml+xml"
}
