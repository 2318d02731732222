//! Error types for hnrss

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while fetching an article
///
/// These never reach feed consumers: the fetcher folds them into an
/// inline fragment so the item still renders.
#[derive(Debug, Error)]
pub enum FetchError {
    /// URL has invalid scheme or cannot be parsed
    #[error("Invalid URL: must start with http:// or https://")]
    InvalidUrlScheme,

    /// Failed to build HTTP client
    #[error("Failed to create HTTP client")]
    ClientBuildError(#[source] reqwest::Error),

    /// Request did not complete within the fetch timeout
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Failed to connect to server
    #[error("Failed to connect to server: {0}")]
    ConnectError(#[source] reqwest::Error),

    /// Other request error
    #[error("Request failed: {0}")]
    RequestError(String),

    /// Response body could not be read
    #[error("Error reading response body: {0}")]
    BodyError(String),

    /// Readability could not find article content
    #[error("Unable to extract article: {0}")]
    ExtractError(String),
}

impl FetchError {
    /// Create an error from a reqwest error
    pub fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            FetchError::Timeout(timeout)
        } else if err.is_connect() {
            FetchError::ConnectError(err)
        } else {
            FetchError::RequestError(err.to_string())
        }
    }
}

/// Errors that can occur while producing a feed
#[derive(Debug, Error)]
pub enum FeedError {
    /// The search API response could not be parsed
    #[error("Invalid search API response: {0}")]
    InvalidResponse(#[from] serde_json::Error),

    /// Writing the XML document failed
    #[error("Failed to write feed XML")]
    Xml(#[from] std::io::Error),

    /// A computed header value is not valid in an HTTP header
    #[error("Invalid header value")]
    Header(#[from] reqwest::header::InvalidHeaderValue),

    /// The serialized document is not valid UTF-8
    #[error("Feed XML contains invalid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}
