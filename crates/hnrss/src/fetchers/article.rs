//! HTTP article fetcher
//!
//! Downloads a linked page and reduces it to its readable content,
//! annotated with fetch timing and any HTTP problems.

use crate::client::FetchOptions;
use crate::error::FetchError;
use crate::extract::extract_article;
use crate::fetchers::Fetcher;
use crate::unescape::unescape;
use async_trait::async_trait;
use chrono::Utc;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE, USER_AGENT};
use std::time::{Duration, Instant};
use tracing::{debug, warn};
use url::Url;

/// Content type assumed when the server sends none
const UNKNOWN_CONTENT_TYPE: &str = "unknown/unknown";

/// Default HTTP article fetcher
///
/// - GET with a bounded timeout and a browser-like User-Agent
/// - readability extraction for `text/*` responses
/// - non-200 statuses are noted but do not stop processing
pub struct ArticleFetcher {
    options: FetchOptions,
}

/// What came back from the network, before rendering
struct RawArticle {
    status_code: u16,
    content_type: String,
    /// Present only for `text/*` responses
    body: Option<String>,
    elapsed: Duration,
}

impl ArticleFetcher {
    pub fn new(options: FetchOptions) -> Self {
        Self { options }
    }

    async fn download(&self, url: &str) -> Result<RawArticle, FetchError> {
        let parsed = Url::parse(url).map_err(|_| FetchError::InvalidUrlScheme)?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(FetchError::InvalidUrlScheme);
        }

        let timeout = self.options.effective_timeout();

        let mut headers = HeaderMap::new();
        let user_agent = self.options.effective_user_agent();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(user_agent)
                .unwrap_or_else(|_| HeaderValue::from_static(crate::DEFAULT_USER_AGENT)),
        );
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html, text/*;q=0.9, */*;q=0.8"),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()
            .map_err(FetchError::ClientBuildError)?;

        let start = Instant::now();

        let response = client
            .get(parsed)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(e, timeout))?;

        let status_code = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or(UNKNOWN_CONTENT_TYPE)
            .to_string();

        let body = if content_type.starts_with("text/") {
            let text = response.text().await.map_err(|e| {
                if e.is_timeout() {
                    FetchError::Timeout(timeout)
                } else {
                    FetchError::BodyError(e.to_string())
                }
            })?;
            Some(text)
        } else {
            None
        };

        Ok(RawArticle {
            status_code,
            content_type,
            body,
            elapsed: start.elapsed(),
        })
    }
}

impl Default for ArticleFetcher {
    fn default() -> Self {
        Self::new(FetchOptions::default())
    }
}

#[async_trait]
impl Fetcher for ArticleFetcher {
    fn name(&self) -> &'static str {
        "article"
    }

    async fn fetch(&self, url: &str) -> String {
        match self.download(url).await {
            Ok(raw) => {
                debug!(
                    url,
                    status = raw.status_code,
                    content_type = %raw.content_type,
                    elapsed_ms = raw.elapsed.as_millis() as u64,
                    "Fetched article"
                );
                render_article(url, &raw)
            }
            Err(e) => {
                warn!(url, error = %e, "Article fetch failed");
                failure_fragment(&e)
            }
        }
    }
}

/// Render a downloaded page as an item fragment
fn render_article(url: &str, raw: &RawArticle) -> String {
    let mut article = String::new();

    if raw.status_code != 200 {
        warn!(url, status = raw.status_code, "Non-200 article response");
        article.push_str(&format!(
            "<div>HTTP error fetching article: {}</div>\n",
            raw.status_code
        ));
    }

    let mut title = String::new();
    match raw.body {
        Some(ref html) => {
            let summary = match extract_article(html, Some(url)) {
                Ok(extracted) => {
                    title = unescape(&extracted.title);
                    extracted.summary
                }
                Err(e) => {
                    warn!(url, error = %e, "Readability extraction failed");
                    format!("<div>{}</div>", e)
                }
            };
            article.push_str(&format!("<hr><div>{}</div><hr>\n", summary));
        }
        None => {
            article.push_str(&format!(
                "<div>Non-text content-type: {}</div>\n",
                raw.content_type
            ));
        }
    }

    article.push_str(&trailer(raw.elapsed, &title));
    article
}

/// Timing and title footer appended to every fetched article
fn trailer(elapsed: Duration, title: &str) -> String {
    let now = Utc::now().format("%a %b %e %H:%M:%S %Y UTC");
    format!(
        "<p><small><em>Fetched in {:.3}s at {}<br>\nOriginal title: {}\n</em></small></p>",
        elapsed.as_secs_f64(),
        now,
        title
    )
}

fn failure_fragment(err: &FetchError) -> String {
    format!("Failed to fetch article: {}", err)
}
