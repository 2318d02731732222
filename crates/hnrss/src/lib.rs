//! hnrss - Hacker News search results as RSS
//!
//! This crate turns a search API response (a list of story/comment "hits")
//! into an RSS 2.0 feed. Items without inline text get their body from the
//! linked page, reduced to its readable content.
//!
//! Failures never break a feed: unreachable links, HTTP errors and binary
//! content end up as notes inside the affected item, and the response is
//! always `200`.
//!
//! ## Fetchers
//!
//! Article bodies come from a [`Fetcher`]. [`ArticleFetcher`] is the HTTP
//! implementation; supply your own to [`Feed::render_with`] to render
//! without network access.

pub mod cache;
pub mod client;
pub mod date;
mod error;
mod extract;
pub mod feed;
pub mod fetchers;
pub mod item;
mod tool;
mod types;
mod unescape;

use std::time::Duration;

pub use cache::{CacheDirective, CacheHeaderPolicy};
pub use client::{fetch_article, fetch_article_with_options, FetchOptions};
pub use error::{FeedError, FetchError};
pub use extract::{extract_article, Extracted};
pub use feed::{ChannelMetadata, FeedConfig, FeedDocument, FeedResponse};
pub use fetchers::{ArticleFetcher, Fetcher};
pub use item::FeedItemBuilder;
pub use tool::{Feed, FeedBuilder};
pub use types::{FeedItem, Hit, SearchResponse, HN_ITEM_URL};
pub use unescape::unescape;

/// Default User-Agent string for article fetches
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0";

/// Default bound on a single article fetch
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);
