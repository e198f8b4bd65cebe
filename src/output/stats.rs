//! Statistics gathered while consuming a crawl
//!
//! This module provides functionality for aggregating visit results and
//! reporting them when the crawl ends.

use crate::url::ScopePolicy;
use crate::visit::VisitResult;
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Crawl statistics summary
#[derive(Debug, Clone, Default)]
pub struct CrawlStatistics {
    /// Pages whose links were read
    pub pages_visited: u64,

    /// Pages that could not be read
    pub pages_failed: u64,

    /// Links found across all pages, duplicates included
    pub total_links: u64,

    /// Links the scope policy would follow
    pub in_scope_links: u64,

    /// Links to other hosts or excluded extensions
    pub out_of_scope_links: u64,

    /// Hosts seen in discovered links
    pub hosts: BTreeSet<String>,

    /// Failure counts by kind
    pub error_summary: BTreeMap<&'static str, u64>,

    distinct_links: HashSet<String>,
    scope: ScopePolicy,
}

impl CrawlStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates statistics that classify links with the crawl's scope policy
    pub fn with_scope(scope: ScopePolicy) -> Self {
        Self {
            scope,
            ..Self::default()
        }
    }

    /// Adds one visit result to the statistics
    pub fn record(&mut self, result: &VisitResult) {
        match result {
            VisitResult::Success(visit) => {
                self.pages_visited += 1;
                self.total_links += visit.links.len() as u64;
                for link in &visit.links {
                    if self.scope.can_visit(&visit.page, link) {
                        self.in_scope_links += 1;
                    } else {
                        self.out_of_scope_links += 1;
                    }
                    if let Some(host) = link.hostname() {
                        if !self.hosts.contains(host) {
                            self.hosts.insert(host.to_string());
                        }
                    }
                    if !self.distinct_links.contains(link.as_str()) {
                        self.distinct_links.insert(link.as_str().to_string());
                    }
                }
            }
            VisitResult::Failure(failure) => {
                self.pages_failed += 1;
                *self.error_summary.entry(failure.error.kind()).or_default() += 1;
            }
        }
    }

    /// Pages claimed by the crawl, visited or failed
    pub fn total_pages(&self) -> u64 {
        self.pages_visited + self.pages_failed
    }

    /// Number of different links found
    pub fn unique_links(&self) -> u64 {
        self.distinct_links.len() as u64
    }

    /// Returns the success rate as a percentage
    pub fn success_rate(&self) -> f64 {
        let total = self.total_pages();
        if total == 0 {
            return 0.0;
        }
        (self.pages_visited as f64 / total as f64) * 100.0
    }
}

/// Logs statistics at info level
pub fn log_statistics(stats: &CrawlStatistics) {
    tracing::info!(
        "Crawl statistics: {} pages ({} visited, {} failed), {} links ({} unique), {:.1}% success",
        stats.total_pages(),
        stats.pages_visited,
        stats.pages_failed,
        stats.total_links,
        stats.unique_links(),
        stats.success_rate()
    );
    tracing::info!(
        "Links: {} in scope, {} out of scope, {} hosts",
        stats.in_scope_links,
        stats.out_of_scope_links,
        stats.hosts.len()
    );

    for (kind, count) in &stats.error_summary {
        tracing::info!("  {} failures: {}", kind, count);
    }
}
