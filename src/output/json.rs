//! JSON result sinks
//!
//! Results serialize as `{"page": ..., "links": [...]}` for visited pages and
//! `{"page": ..., "error": ...}` for failures.

use crate::output::traits::{CrawlSummary, OutputResult, ResultSink};
use crate::visit::VisitResult;
use std::io::Write;

/// Writes one JSON object per line as results arrive
pub struct JsonLinesSink<W: Write + Send> {
    writer: W,
}

impl<W: Write + Send> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send> ResultSink for JsonLinesSink<W> {
    fn record(&mut self, result: &VisitResult) -> OutputResult<()> {
        serde_json::to_writer(&mut self.writer, result)?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    fn finish(&mut self, _summary: &CrawlSummary) -> OutputResult<()> {
        self.writer.flush()?;
        Ok(())
    }

    fn abort(&mut self, _summary: &CrawlSummary) -> OutputResult<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Buffers every result and writes them as one JSON array on finish
pub struct JsonArraySink<W: Write + Send> {
    writer: W,
    results: Vec<serde_json::Value>,
}

impl<W: Write + Send> JsonArraySink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            results: Vec::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send> ResultSink for JsonArraySink<W> {
    fn record(&mut self, result: &VisitResult) -> OutputResult<()> {
        self.results.push(serde_json::to_value(result)?);
        Ok(())
    }

    fn finish(&mut self, _summary: &CrawlSummary) -> OutputResult<()> {
        serde_json::to_writer_pretty(&mut self.writer, &self.results)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}
