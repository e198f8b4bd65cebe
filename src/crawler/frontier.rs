//! Shared crawl state: the frontier queue, the visited set and the in-flight
//! counter
//!
//! This module handles:
//! - A many-producer/many-consumer queue of links waiting to be visited
//! - Claiming pages for visiting exactly once
//! - Detecting when no queued or in-progress work remains

use crate::url::Link;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Outcome of pushing a link onto the frontier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    /// The link is queued and will be handed to a worker
    Queued,
    /// The frontier is at capacity; the link was dropped
    Full,
    /// The frontier was closed; the link was dropped
    Closed,
}

/// Queue of links waiting to be visited
///
/// The queue holds the only sender. Closing the frontier drops it, after
/// which [`Frontier::pop`] drains what is left and then returns `None`.
pub struct Frontier {
    sender: Mutex<Option<UnboundedSender<Link>>>,
    receiver: tokio::sync::Mutex<UnboundedReceiver<Link>>,
    len: AtomicUsize,
    capacity: Option<usize>,
}

impl Frontier {
    /// Creates an open frontier, optionally bounded to `capacity` queued links
    pub fn new(capacity: Option<usize>) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            sender: Mutex::new(Some(sender)),
            receiver: tokio::sync::Mutex::new(receiver),
            len: AtomicUsize::new(0),
            capacity,
        }
    }

    /// Queues a link
    pub fn push(&self, link: Link) -> PushOutcome {
        let Ok(guard) = self.sender.lock() else {
            return PushOutcome::Closed;
        };
        let Some(sender) = guard.as_ref() else {
            return PushOutcome::Closed;
        };

        if let Some(capacity) = self.capacity {
            let reserved = self
                .len
                .fetch_update(Ordering::AcqRel, Ordering::Acquire, |len| {
                    (len < capacity).then_some(len + 1)
                });
            if reserved.is_err() {
                return PushOutcome::Full;
            }
        } else {
            self.len.fetch_add(1, Ordering::AcqRel);
        }

        match sender.send(link) {
            Ok(()) => PushOutcome::Queued,
            Err(_) => {
                self.len.fetch_sub(1, Ordering::AcqRel);
                PushOutcome::Closed
            }
        }
    }

    /// Waits for the next queued link
    ///
    /// Returns `None` once the frontier is closed and empty.
    pub async fn pop(&self) -> Option<Link> {
        let link = self.receiver.lock().await.recv().await?;
        self.len.fetch_sub(1, Ordering::AcqRel);
        Some(link)
    }

    /// Closes the frontier; later pushes are refused
    pub fn close(&self) {
        if let Ok(mut guard) = self.sender.lock() {
            guard.take();
        }
    }

    pub fn is_closed(&self) -> bool {
        self.sender.lock().map(|guard| guard.is_none()).unwrap_or(true)
    }

    /// Number of queued links not yet handed to a worker
    pub fn len(&self) -> usize {
        self.len.load(Ordering::Acquire)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Outcome of claiming a page for visiting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Claim {
    /// The page was not seen before; the caller must visit it
    New,
    /// The page was already claimed
    Duplicate,
    /// The page limit is reached; nothing more will be claimed
    LimitReached,
}

/// Set of canonical links that have been claimed for visiting
#[derive(Debug, Default)]
pub struct VisitedSet {
    links: Mutex<HashSet<Link>>,
    max_pages: Option<usize>,
}

impl VisitedSet {
    pub fn new(max_pages: Option<usize>) -> Self {
        Self {
            links: Mutex::new(HashSet::new()),
            max_pages,
        }
    }

    /// Claims a canonical link; check and insert are one critical section
    pub fn claim(&self, link: &Link) -> Claim {
        let Ok(mut links) = self.links.lock() else {
            return Claim::LimitReached;
        };

        if links.contains(link) {
            return Claim::Duplicate;
        }
        if self.max_pages.is_some_and(|max| links.len() >= max) {
            return Claim::LimitReached;
        }

        links.insert(link.clone());
        Claim::New
    }

    /// Returns true if the canonical link was already claimed
    pub fn contains(&self, link: &Link) -> bool {
        self.links
            .lock()
            .map(|links| links.contains(link))
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.links.lock().map(|links| links.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Count of jobs that are queued or being processed
///
/// A job is added before its link is queued and marked done only after the
/// worker has queued every link it discovered, so the count reaches zero
/// exactly once: when the crawl has nothing left to do.
#[derive(Debug, Default)]
pub struct InFlight {
    count: AtomicUsize,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self) {
        self.count.fetch_add(1, Ordering::AcqRel);
    }

    /// Marks one job done; returns true if it was the last one
    pub fn done(&self) -> bool {
        self.count.fetch_sub(1, Ordering::AcqRel) == 1
    }

    pub fn get(&self) -> usize {
        self.count.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(raw: &str) -> Link {
        Link::parse(raw).unwrap()
    }

    #[tokio::test]
    async fn test_push_pop_fifo() {
        let frontier = Frontier::new(None);
        assert_eq!(frontier.push(link("http://localhost/a")), PushOutcome::Queued);
        assert_eq!(frontier.push(link("http://localhost/b")), PushOutcome::Queued);
        assert_eq!(frontier.len(), 2);

        assert_eq!(frontier.pop().await, Some(link("http://localhost/a")));
        assert_eq!(frontier.pop().await, Some(link("http://localhost/b")));
        assert!(frontier.is_empty());
    }

    #[tokio::test]
    async fn test_close_drains_then_ends() {
        let frontier = Frontier::new(None);
        frontier.push(link("http://localhost/a"));
        frontier.close();

        assert!(frontier.is_closed());
        assert_eq!(frontier.push(link("http://localhost/b")), PushOutcome::Closed);
        assert_eq!(frontier.pop().await, Some(link("http://localhost/a")));
        assert_eq!(frontier.pop().await, None);
    }

    #[tokio::test]
    async fn test_close_wakes_waiting_pop() {
        let frontier = std::sync::Arc::new(Frontier::new(None));
        let waiter = {
            let frontier = frontier.clone();
            tokio::spawn(async move { frontier.pop().await })
        };

        tokio::task::yield_now().await;
        frontier.close();

        assert_eq!(waiter.await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_capacity_refuses_when_full() {
        let frontier = Frontier::new(Some(1));
        assert_eq!(frontier.push(link("http://localhost/a")), PushOutcome::Queued);
        assert_eq!(frontier.push(link("http://localhost/b")), PushOutcome::Full);

        frontier.pop().await;
        assert_eq!(frontier.push(link("http://localhost/c")), PushOutcome::Queued);
    }

    #[test]
    fn test_claim_once() {
        let visited = VisitedSet::new(None);
        let home = link("http://localhost/home");

        assert!(!visited.contains(&home));
        assert_eq!(visited.claim(&home), Claim::New);
        assert_eq!(visited.claim(&home), Claim::Duplicate);
        assert!(visited.contains(&home));
        assert_eq!(visited.len(), 1);
    }

    #[test]
    fn test_claim_respects_max_pages() {
        let visited = VisitedSet::new(Some(2));
        assert_eq!(visited.claim(&link("http://localhost/a")), Claim::New);
        assert_eq!(visited.claim(&link("http://localhost/b")), Claim::New);
        assert_eq!(visited.claim(&link("http://localhost/c")), Claim::LimitReached);
        assert_eq!(visited.claim(&link("http://localhost/a")), Claim::Duplicate);
        assert_eq!(visited.len(), 2);
    }

    #[test]
    fn test_concurrent_claims_admit_one_winner() {
        let visited = std::sync::Arc::new(VisitedSet::new(None));
        let home = link("http://localhost/home");

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let visited = visited.clone();
                let home = home.clone();
                std::thread::spawn(move || visited.claim(&home))
            })
            .collect();

        let winners = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|claim| *claim == Claim::New)
            .count();
        assert_eq!(winners, 1);
    }

    #[test]
    fn test_in_flight_reports_last_done() {
        let in_flight = InFlight::new();
        in_flight.add();
        in_flight.add();
        assert_eq!(in_flight.get(), 2);

        assert!(!in_flight.done());
        assert!(in_flight.done());
        assert_eq!(in_flight.get(), 0);
    }
}
