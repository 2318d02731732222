//! HTTP client for hnrss
//!
//! This module provides the entry points for fetching a single article.
//! The fetch logic itself lives in the [`fetchers`](crate::fetchers) module.

use crate::fetchers::{ArticleFetcher, Fetcher};
use crate::{DEFAULT_TIMEOUT, DEFAULT_USER_AGENT};
use std::time::Duration;

/// Fetch options that can be configured via the feed builder
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    /// Custom User-Agent
    pub user_agent: Option<String>,
    /// Bound on connect + response + body for one article
    pub timeout: Option<Duration>,
}

impl FetchOptions {
    pub fn effective_user_agent(&self) -> &str {
        self.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT)
    }

    pub fn effective_timeout(&self) -> Duration {
        self.timeout.unwrap_or(DEFAULT_TIMEOUT)
    }
}

/// Fetch an article and render it as an HTML fragment
///
/// Never fails: network errors, HTTP errors and non-text content all
/// come back as a descriptive fragment. For custom options, use
/// [`fetch_article_with_options`].
pub async fn fetch_article(url: &str) -> String {
    fetch_article_with_options(url, FetchOptions::default()).await
}

/// Fetch an article with custom options
pub async fn fetch_article_with_options(url: &str, options: FetchOptions) -> String {
    ArticleFetcher::new(options).fetch(url).await
}
