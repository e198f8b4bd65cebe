//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the worker pool that drives a crawl:
//! - Seeding the frontier with the starting link
//! - Claiming each page exactly once and asking the link finder for its links
//! - Queuing in-scope discoveries and streaming one result per claimed page
//! - Detecting completion, cancellation and worker panics

use crate::config::CrawlerConfig;
use crate::crawler::finder::{LinkFinder, LinkFinderError};
use crate::crawler::frontier::{Claim, Frontier, InFlight, PushOutcome, VisitedSet};
use crate::url::{Link, ScopePolicy};
use crate::visit::{Visit, VisitFailure, VisitResult};
use crate::SitewalkError;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::{JoinHandle, JoinSet};
use tokio_util::sync::{CancellationToken, DropGuard};

/// Main crawler coordinator structure
///
/// A coordinator owns the crawl configuration and the link finder. Each call
/// to [`Coordinator::crawl`] starts an independent crawl.
pub struct Coordinator {
    finder: Arc<dyn LinkFinder>,
    scope: ScopePolicy,
    workers: usize,
    max_pages: Option<usize>,
    frontier_capacity: Option<usize>,
}

impl Coordinator {
    /// Creates a new coordinator
    ///
    /// A worker count of zero is treated as one.
    pub fn new(config: &CrawlerConfig, finder: Arc<dyn LinkFinder>) -> Self {
        Self {
            finder,
            scope: ScopePolicy::new(&config.excluded_extensions),
            workers: config.workers.max(1),
            max_pages: config.max_pages,
            frontier_capacity: config.frontier_capacity,
        }
    }

    /// Number of workers each crawl runs
    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn scope(&self) -> &ScopePolicy {
        &self.scope
    }

    /// Starts crawling from `start`
    ///
    /// Returns a stream that yields one [`VisitResult`] per claimed page and
    /// ends when the crawl is finished or cancelled.
    ///
    /// # Errors
    ///
    /// * `SitewalkError::Runtime` - not called from within a tokio runtime
    /// * `SitewalkError::Cancelled` - `cancel` was already cancelled
    pub fn crawl(&self, start: Link, cancel: CancellationToken) -> Result<CrawlStream, SitewalkError> {
        let handle = Handle::try_current().map_err(|e| SitewalkError::Runtime(e.to_string()))?;

        if cancel.is_cancelled() {
            return Err(SitewalkError::Cancelled);
        }
        let cancel = cancel.child_token();

        let state = Arc::new(CrawlState {
            finder: self.finder.clone(),
            scope: self.scope.clone(),
            frontier: Frontier::new(self.frontier_capacity),
            visited: VisitedSet::new(self.max_pages),
            in_flight: InFlight::new(),
            cancel: cancel.clone(),
        });

        let start = start.canonical_for_visiting();
        tracing::info!("Starting crawl of {} with {} workers", start, self.workers);
        state.enqueue(start);

        let (sender, receiver) = mpsc::channel(self.workers);
        let supervisor = handle.spawn(supervise(state, self.workers, sender));

        Ok(CrawlStream {
            results: receiver,
            cancel: cancel.clone(),
            supervisor,
            exhausted: false,
            _guard: cancel.drop_guard(),
        })
    }
}

/// The results of a running crawl
///
/// Dropping the stream cancels the crawl.
pub struct CrawlStream {
    results: mpsc::Receiver<VisitResult>,
    cancel: CancellationToken,
    supervisor: JoinHandle<()>,
    exhausted: bool,
    _guard: DropGuard,
}

impl CrawlStream {
    /// Waits for the next result; `None` once the crawl has ended
    pub async fn next(&mut self) -> Option<VisitResult> {
        let next = self.results.recv().await;
        if next.is_none() {
            self.exhausted = true;
        }
        next
    }

    /// Cancels the crawl; the stream ends once the workers have stopped
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Reads every remaining result, then waits for the workers to stop
    pub async fn collect(mut self) -> Vec<VisitResult> {
        let mut results = Vec::new();
        while let Some(result) = self.next().await {
            results.push(result);
        }
        self.finish().await;
        results
    }

    /// Stops reading and waits for the workers to stop
    ///
    /// If the stream was not read to the end, the crawl is cancelled first.
    pub async fn finish(self) {
        let Self {
            results,
            cancel,
            supervisor,
            exhausted,
            _guard,
        } = self;

        if !exhausted {
            cancel.cancel();
        }
        drop(results);

        if let Err(e) = supervisor.await {
            tracing::error!("Crawl supervisor failed: {}", e);
        }
    }
}

/// State shared by the workers of one crawl
struct CrawlState {
    finder: Arc<dyn LinkFinder>,
    scope: ScopePolicy,
    frontier: Frontier,
    visited: VisitedSet,
    in_flight: InFlight,
    cancel: CancellationToken,
}

impl CrawlState {
    /// Queues a canonical link as a new job
    fn enqueue(&self, link: Link) {
        self.in_flight.add();
        match self.frontier.push(link.clone()) {
            PushOutcome::Queued => {}
            PushOutcome::Full => {
                tracing::warn!("Frontier is full, dropping {}", link);
                self.job_done();
            }
            PushOutcome::Closed => {
                tracing::trace!("Frontier closed, dropping {}", link);
                self.job_done();
            }
        }
    }

    fn job_done(&self) {
        if self.in_flight.done() {
            tracing::debug!("No queued or in-progress pages left, closing frontier");
            self.frontier.close();
        }
    }

    /// Visits one dequeued link and reports the result
    async fn process(&self, link: Link, results: &mpsc::Sender<VisitResult>) {
        let page = link.canonical_for_visiting();
        match self.visited.claim(&page) {
            Claim::New => {}
            Claim::Duplicate => {
                tracing::trace!("Already visited {}", page);
                return;
            }
            Claim::LimitReached => {
                tracing::debug!("Page limit reached, not visiting {}", page);
                return;
            }
        }

        let found = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(LinkFinderError::Cancelled),
            found = self.finder.find_links_on_page(&page) => found,
        };

        let result = match found {
            Ok(links) => {
                self.queue_discoveries(&page, &links);
                VisitResult::from(Visit::new(page, links))
            }
            Err(LinkFinderError::Cancelled) => {
                let failure = VisitResult::from(VisitFailure {
                    page,
                    error: LinkFinderError::Cancelled,
                });
                if let Err(e) = results.try_send(failure) {
                    tracing::debug!(
                        "Result stream unavailable, dropping cancelled visit of {}",
                        e.into_inner().page()
                    );
                }
                return;
            }
            Err(error) => {
                tracing::warn!("Failed to visit {}: {}", page, error);
                VisitResult::from(VisitFailure { page, error })
            }
        };

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => {}
            sent = results.send(result) => {
                if sent.is_err() {
                    tracing::debug!("Result stream dropped, cancelling crawl");
                    self.cancel.cancel();
                }
            }
        }
    }

    fn queue_discoveries(&self, page: &Link, links: &[Link]) {
        if self.cancel.is_cancelled() {
            return;
        }

        let mut queued = HashSet::new();
        for candidate in links {
            if !self.scope.can_visit(page, candidate) {
                tracing::trace!("Out of scope: {}", candidate);
                continue;
            }

            let canonical = candidate.canonical_for_visiting();
            if self.visited.contains(&canonical) || !queued.insert(canonical.clone()) {
                continue;
            }

            tracing::debug!("Queuing {} (found on {})", canonical, page);
            self.enqueue(canonical);
        }
    }
}

async fn supervise(state: Arc<CrawlState>, workers: usize, results: mpsc::Sender<VisitResult>) {
    let mut pool = JoinSet::new();
    for id in 0..workers {
        pool.spawn(run_worker(id, state.clone(), results.clone()));
    }
    drop(results);

    while let Some(joined) = pool.join_next().await {
        if let Err(e) = joined {
            if e.is_panic() {
                tracing::error!("Crawl worker panicked: {}", e);
                state.cancel.cancel();
            }
        }
    }

    if state.cancel.is_cancelled() {
        tracing::info!("Crawl cancelled after {} pages", state.visited.len());
    } else {
        tracing::info!("Crawl complete: {} pages visited", state.visited.len());
    }
}

async fn run_worker(id: usize, state: Arc<CrawlState>, results: mpsc::Sender<VisitResult>) {
    tracing::trace!("Worker {} started", id);

    loop {
        let link = tokio::select! {
            biased;
            _ = state.cancel.cancelled() => break,
            next = state.frontier.pop() => match next {
                Some(link) => link,
                None => break,
            },
        };

        state.process(link, &results).await;
        state.job_done();
    }

    tracing::trace!("Worker {} stopped", id);
}
