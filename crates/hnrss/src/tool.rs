//! Feed builder and entry point

use crate::client::FetchOptions;
use crate::error::FeedError;
use crate::feed::{FeedConfig, FeedDocument, FeedResponse};
use crate::fetchers::{ArticleFetcher, Fetcher};
use crate::types::SearchResponse;
use std::time::Duration;

/// Builder for configuring a [`Feed`]
#[derive(Debug, Clone, Default)]
pub struct FeedBuilder {
    config: FeedConfig,
    /// Custom User-Agent for article fetches
    user_agent: Option<String>,
    /// Per-article fetch timeout
    timeout: Option<Duration>,
    /// Articles fetched at once (1 = sequential)
    fetch_concurrency: usize,
}

impl FeedBuilder {
    /// Create a new builder with the stock channel settings
    pub fn new() -> Self {
        Self {
            fetch_concurrency: 1,
            ..Default::default()
        }
    }

    /// Set the channel title
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.config.title = title.into();
        self
    }

    /// Set the channel link
    pub fn link(mut self, link: impl Into<String>) -> Self {
        self.config.link = link.into();
        self
    }

    /// Set the channel description
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.config.description = description.into();
        self
    }

    /// Set custom User-Agent
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Set the per-article fetch timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Fetch up to `n` articles concurrently (item order is unaffected)
    pub fn fetch_concurrency(mut self, n: usize) -> Self {
        self.fetch_concurrency = n.max(1);
        self
    }

    /// Build the feed
    pub fn build(self) -> Feed {
        Feed {
            config: self.config,
            fetcher: ArticleFetcher::new(FetchOptions {
                user_agent: self.user_agent,
                timeout: self.timeout,
            }),
            fetch_concurrency: self.fetch_concurrency.max(1),
        }
    }
}

/// Configured feed renderer
///
/// Holds the process-wide settings; each call to [`Feed::render`] builds
/// one independent response.
pub struct Feed {
    config: FeedConfig,
    fetcher: ArticleFetcher,
    fetch_concurrency: usize,
}

impl Default for Feed {
    fn default() -> Self {
        FeedBuilder::new().build()
    }
}

impl Feed {
    /// Create a new feed builder
    pub fn builder() -> FeedBuilder {
        FeedBuilder::new()
    }

    /// Channel settings
    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    /// Render a search API response requested at `request_url`
    pub async fn render(
        &self,
        response: &SearchResponse,
        request_url: &str,
    ) -> Result<FeedResponse, FeedError> {
        self.render_with(&self.fetcher, response, request_url).await
    }

    /// Render a raw search API JSON body
    pub async fn render_json(
        &self,
        json: &str,
        request_url: &str,
    ) -> Result<FeedResponse, FeedError> {
        let response: SearchResponse = serde_json::from_str(json)?;
        self.render(&response, request_url).await
    }

    /// Render using a caller-supplied fetcher
    pub async fn render_with<F: Fetcher + ?Sized>(
        &self,
        fetcher: &F,
        response: &SearchResponse,
        request_url: &str,
    ) -> Result<FeedResponse, FeedError> {
        let document = FeedDocument::build(
            response,
            request_url,
            &self.config,
            fetcher,
            self.fetch_concurrency,
        )
        .await;
        document.response()
    }
}
