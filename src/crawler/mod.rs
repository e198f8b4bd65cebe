//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - The link-finding capability and its HTTP implementation
//! - HTML parsing and link extraction
//! - The frontier, visited set and completion tracking
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod finder;
mod frontier;
mod parser;

pub use coordinator::{Coordinator, CrawlStream};
pub use fetcher::{build_http_client, build_rate_limiter, fetch_page, FetchResult};
pub use finder::{HttpLinkFinder, LinkFinder, LinkFinderError};
pub use frontier::{Claim, Frontier, InFlight, PushOutcome, VisitedSet};
pub use parser::extract_links;

use crate::config::Config;
use crate::url::Link;
use crate::{SitewalkError, UrlError};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Starts an HTTP crawl of the site `start` belongs to
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Check that the starting link is an http(s) URL with a host
/// 2. Build the HTTP link finder
/// 3. Start the worker pool and return its result stream
///
/// # Errors
///
/// * `SitewalkError::Url` - the starting link cannot be crawled over HTTP
/// * `SitewalkError::HttpClient` - the HTTP client could not be built
/// * `SitewalkError::Runtime` / `SitewalkError::Cancelled` - see [`Coordinator::crawl`]
pub fn crawl(config: &Config, start: Link, cancel: CancellationToken) -> Result<CrawlStream, SitewalkError> {
    check_start_link(&start)?;

    let finder = HttpLinkFinder::new(&config.http)?;
    Coordinator::new(&config.crawler, Arc::new(finder)).crawl(start, cancel)
}

/// Checks that a starting link can be fetched over HTTP
pub fn check_start_link(start: &Link) -> Result<(), UrlError> {
    match start.scheme() {
        "http" | "https" => {}
        other => return Err(UrlError::InvalidScheme(other.to_string())),
    }

    if start.hostname().map_or(true, str::is_empty) {
        return Err(UrlError::MissingHost(start.to_string()));
    }

    Ok(())
}
