//! Sitewalk: a concurrent site mapper
//!
//! This crate crawls a website from a single starting URL, visiting every page
//! reachable on the same host exactly once and reporting the links found on
//! each page.

pub mod config;
pub mod crawler;
pub mod output;
pub mod storage;
pub mod url;
pub mod visit;

use thiserror::Error;

/// Main error type for Sitewalk operations
///
/// Only startup failures surface through this type. Anything that goes wrong
/// while visiting an individual page is reported as a failed [`VisitResult`].
#[derive(Debug, Error)]
pub enum SitewalkError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Crawl must be started from within a tokio runtime: {0}")]
    Runtime(String),

    #[error("Crawl was cancelled before it started")]
    Cancelled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// URL-specific errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlError {
    #[error("Failed to parse URL '{input}': {reason}")]
    Parse { input: String, reason: String },

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL: {0}")]
    MissingHost(String),
}

/// Result type alias for Sitewalk operations
pub type Result<T> = std::result::Result<T, SitewalkError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Coordinator, CrawlStream, LinkFinder, LinkFinderError};
pub use self::url::{Link, ScopePolicy};
pub use visit::{Visit, VisitFailure, VisitResult};
