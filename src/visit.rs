//! Visit records emitted by the crawler
//!
//! Every page the crawler claims produces exactly one [`VisitResult`]: either
//! the links found on the page, or the reason the page could not be read.

use crate::crawler::LinkFinderError;
use crate::url::Link;
use serde::{Serialize, Serializer};

/// The links found on one successfully fetched page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Visit {
    /// Canonical link of the page that was fetched
    pub page: Link,

    /// Links found on the page, in document order, duplicates included
    pub links: Vec<Link>,
}

impl Visit {
    pub fn new(page: Link, links: Vec<Link>) -> Self {
        Self { page, links }
    }
}

/// A page that was claimed but could not be fetched or parsed
#[derive(Debug, Serialize)]
pub struct VisitFailure {
    /// Canonical link of the page that was attempted
    pub page: Link,

    #[serde(serialize_with = "serialize_display")]
    pub error: LinkFinderError,
}

/// Outcome of visiting one page
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum VisitResult {
    Success(Visit),
    Failure(VisitFailure),
}

impl VisitResult {
    /// Returns the canonical link of the page this result is about
    pub fn page(&self) -> &Link {
        match self {
            Self::Success(visit) => &visit.page,
            Self::Failure(failure) => &failure.page,
        }
    }

    /// Returns the discovered links, empty for failures
    pub fn links(&self) -> &[Link] {
        match self {
            Self::Success(visit) => &visit.links,
            Self::Failure(_) => &[],
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn visit(&self) -> Option<&Visit> {
        match self {
            Self::Success(visit) => Some(visit),
            Self::Failure(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&VisitFailure> {
        match self {
            Self::Success(_) => None,
            Self::Failure(failure) => Some(failure),
        }
    }
}

impl From<Visit> for VisitResult {
    fn from(visit: Visit) -> Self {
        Self::Success(visit)
    }
}

impl From<VisitFailure> for VisitResult {
    fn from(failure: VisitFailure) -> Self {
        Self::Failure(failure)
    }
}

fn serialize_display<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    T: std::fmt::Display,
    S: Serializer,
{
    serializer.collect_str(value)
}
