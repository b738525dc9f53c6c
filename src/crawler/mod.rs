//! Link discovery over news index pages.

pub mod selector;

use async_trait::async_trait;
use std::collections::BTreeMap;

use crate::ingest::VisitedSet;

pub use selector::{SelectorCrawler, discover_links};

/// Produces candidate article pages for the ingest loop.
#[async_trait]
pub trait Crawler: Send + Sync {
    /// Returns `url -> raw html` for pages linked from `seeds`.
    ///
    /// URLs in `exclude` are never fetched. Individual fetch failures are
    /// logged and left out of the result.
    async fn crawl(&self, seeds: &[String], exclude: &VisitedSet) -> BTreeMap<String, String>;
}
