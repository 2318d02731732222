//! Article fetchers
//!
//! A [`Fetcher`] turns a URL into an HTML fragment for an item body.
//! Fetchers never fail: every problem is reported inside the fragment so
//! a single bad link cannot break the feed.

mod article;

pub use article::ArticleFetcher;

use async_trait::async_trait;

/// Trait for article content sources
///
/// [`ArticleFetcher`] is the HTTP implementation. Tests and embedders can
/// supply their own to avoid network access.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Unique identifier for this fetcher (for logging/debugging)
    fn name(&self) -> &'static str;

    /// Fetch `url` and render it as an HTML fragment
    async fn fetch(&self, url: &str) -> String;
}
