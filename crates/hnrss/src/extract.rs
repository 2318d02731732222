//! Readable article extraction

use crate::error::FetchError;
use dom_smoothie::{Config, Readability};

/// Main content of a page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extracted {
    /// Page title, empty if none was found
    pub title: String,
    /// Partial HTML fragment holding the article body
    pub summary: String,
}

/// Run readability over `html`
///
/// `url` is used to resolve relative links inside the article.
pub fn extract_article(html: &str, url: Option<&str>) -> Result<Extracted, FetchError> {
    let cfg = Config {
        max_elements_to_parse: usize::MAX,
        ..Default::default()
    };

    let mut readability = Readability::new(html, url, Some(cfg))
        .map_err(|e| FetchError::ExtractError(e.to_string()))?;
    let article = readability
        .parse()
        .map_err(|e| FetchError::ExtractError(e.to_string()))?;

    Ok(Extracted {
        title: article.title.trim().to_string(),
        summary: article.content.to_string(),
    })
}
