//! Markdown site-map report
//!
//! This module generates a human-readable report of a crawl: run
//! information, statistics, every visited page with its links, and the pages
//! that could not be read.

use crate::output::traits::{CrawlSummary, OutputResult, ResultSink};
use crate::visit::VisitResult;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Collects results and writes a markdown report on finish
pub struct MarkdownSink {
    output_path: PathBuf,
    pages: BTreeMap<String, Vec<String>>,
    failures: BTreeMap<String, String>,
}

impl MarkdownSink {
    pub fn new(output_path: impl Into<PathBuf>) -> Self {
        Self {
            output_path: output_path.into(),
            pages: BTreeMap::new(),
            failures: BTreeMap::new(),
        }
    }
}

impl ResultSink for MarkdownSink {
    fn record(&mut self, result: &VisitResult) -> OutputResult<()> {
        match result {
            VisitResult::Success(visit) => {
                self.pages.insert(
                    visit.page.to_string(),
                    visit.links.iter().map(|l| l.to_string()).collect(),
                );
            }
            VisitResult::Failure(failure) => {
                self.failures
                    .insert(failure.page.to_string(), failure.error.to_string());
            }
        }
        Ok(())
    }

    fn finish(&mut self, summary: &CrawlSummary) -> OutputResult<()> {
        let markdown = format_markdown_report(summary, &self.pages, &self.failures);
        write_report(&markdown, &self.output_path)?;
        tracing::info!("Wrote site map to {}", self.output_path.display());
        Ok(())
    }
}

fn write_report(markdown: &str, output_path: &Path) -> OutputResult<()> {
    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;
    Ok(())
}

/// Formats a crawl as a markdown site map
///
/// Pages and failures are listed in URL order.
pub fn format_markdown_report(
    summary: &CrawlSummary,
    pages: &BTreeMap<String, Vec<String>>,
    failures: &BTreeMap<String, String>,
) -> String {
    let mut md = String::new();

    md.push_str(&format!("# Site Map: {}\n\n", summary.start_url));

    // Run metadata
    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Started**: {}\n", summary.started_at.to_rfc3339()));
    md.push_str(&format!("- **Finished**: {}\n", summary.finished_at.to_rfc3339()));
    md.push_str(&format!(
        "- **Duration**: {:.1} seconds\n",
        summary.duration_seconds()
    ));
    md.push_str(&format!("- **Status**: {}\n", summary.status().to_db_string()));
    if let Some(hash) = &summary.config_hash {
        md.push_str(&format!("- **Config Hash**: {}\n", hash));
    }
    md.push('\n');

    // Overall statistics
    let stats = &summary.stats;
    md.push_str("## Statistics\n\n");
    md.push_str("| Metric | Count |\n");
    md.push_str("|--------|-------|\n");
    md.push_str(&format!("| Pages | {} |\n", stats.total_pages()));
    md.push_str(&format!("| Visited | {} |\n", stats.pages_visited));
    md.push_str(&format!("| Failed | {} |\n", stats.pages_failed));
    md.push_str(&format!("| Links | {} |\n", stats.total_links));
    md.push_str(&format!("| Unique Links | {} |\n", stats.unique_links()));
    md.push_str(&format!("| In Scope | {} |\n", stats.in_scope_links));
    md.push_str(&format!("| Out of Scope | {} |\n", stats.out_of_scope_links));
    md.push_str(&format!("| Hosts | {} |\n", stats.hosts.len()));
    md.push_str(&format!("\nSuccess rate: {:.1}%\n\n", stats.success_rate()));

    if !stats.error_summary.is_empty() {
        md.push_str("## Error Summary\n\n");
        md.push_str("| Error Type | Count |\n");
        md.push_str("|------------|-------|\n");
        for (kind, count) in &stats.error_summary {
            md.push_str(&format!("| {} | {} |\n", kind, count));
        }
        md.push('\n');
    }

    md.push_str("## Pages\n\n");
    if pages.is_empty() {
        md.push_str("No pages were visited.\n\n");
    }
    for (page, links) in pages {
        md.push_str(&format!("### {}\n\n", page));
        if links.is_empty() {
            md.push_str("_No links._\n");
        }
        for link in links {
            md.push_str(&format!("- {}\n", link));
        }
        md.push('\n');
    }

    if !failures.is_empty() {
        md.push_str("## Failures\n\n");
        md.push_str("| Page | Error |\n");
        md.push_str("|------|-------|\n");
        for (page, error) in failures {
            md.push_str(&format!("| {} | {} |\n", page, error.replace('|', "\\|")));
        }
        md.push('\n');
    }

    md
}
