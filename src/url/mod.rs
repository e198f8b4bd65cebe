//! URL handling module for Sitewalk
//!
//! This module provides the `Link` value type, URL normalization and
//! resolution, hostname extraction, and the scope policy that decides which
//! discovered links are crawled.

mod domain;
mod link;
mod normalize;
mod scope;

pub use domain::extract_hostname;
pub use link::Link;
pub use normalize::{canonical_for_visiting, normalize_url, resolve_url};
pub use scope::{ScopePolicy, DEFAULT_EXCLUDED_EXTENSIONS};
