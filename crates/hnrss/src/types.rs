//! Core types for hnrss

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

/// Base URL for Hacker News discussion pages
pub const HN_ITEM_URL: &str = "https://news.ycombinator.com/item?id=";

/// Search API response
///
/// Only `hits` is used; other fields returned by the API are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub hits: Option<Vec<Hit>>,
}

/// One story or comment record returned by the search API
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Hit {
    #[serde(rename = "objectID")]
    pub object_id: String,

    #[serde(default)]
    pub url: Option<String>,

    /// Comments carry no title, so null is accepted as empty
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,

    #[serde(default)]
    pub author: Option<String>,

    #[serde(default)]
    pub num_comments: Option<i64>,

    #[serde(default)]
    pub points: Option<i64>,

    #[serde(default)]
    pub story_text: Option<String>,

    pub created_at_i: i64,

    #[serde(rename = "_tags", default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
}

impl Hit {
    /// Discussion page for this hit
    pub fn comments_url(&self) -> String {
        format!("{}{}", HN_ITEM_URL, self.object_id)
    }

    /// The linked URL, or the discussion page when there is none
    pub fn link(&self) -> String {
        match self.url.as_deref() {
            Some(url) if !url.is_empty() => url.to_string(),
            _ => self.comments_url(),
        }
    }

    pub fn points(&self) -> i64 {
        self.points.unwrap_or(0)
    }

    pub fn comments(&self) -> i64 {
        self.num_comments.unwrap_or(0)
    }

    /// Inline story text, if non-empty
    pub fn story_text(&self) -> Option<&str> {
        self.story_text.as_deref().filter(|s| !s.is_empty())
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One `<item>` of the feed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedItem {
    pub title: String,
    /// HTML body rendered into `<description>`
    pub body: String,
    pub link: String,
    /// Rendered as `dc:creator`
    pub author: Option<String>,
    pub pub_date: DateTime<Utc>,
    pub comments: String,
    pub guid: String,
    pub guid_is_permalink: bool,
}
