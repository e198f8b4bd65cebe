use crate::url::DEFAULT_EXCLUDED_EXTENSIONS;
use serde::Deserialize;

/// Main configuration structure for Sitewalk
///
/// Every section and key is optional; missing values take their defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub http: HttpConfig,
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// Number of concurrent workers
    pub workers: usize,

    /// Path suffixes that are listed but never visited
    pub excluded_extensions: Vec<String>,

    /// Stop claiming new pages once this many have been claimed
    pub max_pages: Option<usize>,

    /// Maximum number of queued links; further discoveries are dropped
    pub frontier_capacity: Option<usize>,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            workers: 8,
            excluded_extensions: DEFAULT_EXCLUDED_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
            max_pages: None,
            frontier_capacity: None,
        }
    }
}

/// HTTP client configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct HttpConfig {
    /// Requests started per second across all workers (0 = unlimited)
    pub requests_per_second: u32,

    /// Per-request timeout, in seconds
    pub timeout_secs: u64,

    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            requests_per_second: 4,
            timeout_secs: 15,
            user_agent: format!("sitewalk/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// How crawl results are written
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// One JSON object per line on stdout
    #[default]
    JsonLines,
    /// A single JSON array on stdout
    Json,
    /// A SQLite database
    Sqlite,
    /// A markdown site-map report
    Markdown,
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OutputConfig {
    pub format: OutputFormat,

    /// Path to the SQLite database file
    pub database_path: String,

    /// Path to the markdown summary file
    pub summary_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            database_path: "sitewalk.db".to_string(),
            summary_path: "sitewalk.md".to_string(),
        }
    }
}
