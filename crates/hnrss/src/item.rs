//! Mapping of search hits to feed items

use crate::date::from_unix;
use crate::fetchers::Fetcher;
use crate::types::{FeedItem, Hit};
use crate::unescape::unescape;
use tracing::debug;

/// Builds one [`FeedItem`] per [`Hit`]
///
/// Hits with inline `story_text` are rendered directly; all others go
/// through the fetcher to pull in the linked article.
pub struct FeedItemBuilder<'a, F: Fetcher + ?Sized> {
    fetcher: &'a F,
}

impl<'a, F: Fetcher + ?Sized> FeedItemBuilder<'a, F> {
    pub fn new(fetcher: &'a F) -> Self {
        Self { fetcher }
    }

    pub async fn build(&self, hit: &Hit) -> FeedItem {
        let comments_url = hit.comments_url();
        let link = hit.link();

        let article = match hit.story_text() {
            Some(text) => story_text_fragment(text),
            None => {
                debug!(
                    id = %hit.object_id,
                    fetcher = self.fetcher.name(),
                    url = %link,
                    "Fetching article for item"
                );
                self.fetcher.fetch(&link).await
            }
        };

        FeedItem {
            title: unescape(&hit.title),
            body: item_body(hit.points(), hit.comments(), &comments_url, &article),
            link,
            author: hit.author.clone(),
            pub_date: from_unix(hit.created_at_i),
            comments: comments_url.clone(),
            guid: comments_url,
            guid_is_permalink: false,
        }
    }
}

/// `"N point"` / `"N points"` style counter
pub fn pluralize(count: i64, noun: &str) -> String {
    if count == 1 {
        format!("{} {}", count, noun)
    } else {
        format!("{} {}s", count, noun)
    }
}

/// Summary line followed by the article fragment
pub fn item_body(points: i64, comments: i64, comments_url: &str, article: &str) -> String {
    format!(
        "<div>(<b>HN:</b> {}, <a href=\"{}\">{}</a>)</div> {}",
        pluralize(points, "point"),
        comments_url,
        pluralize(comments, "comment"),
        article
    )
}

fn story_text_fragment(text: &str) -> String {
    format!("<hr>{}<hr>", text)
}
