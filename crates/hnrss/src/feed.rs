//! RSS document assembly and serialization

use crate::cache::CacheHeaderPolicy;
use crate::date::rfc2822;
use crate::error::FeedError;
use crate::fetchers::Fetcher;
use crate::item::FeedItemBuilder;
use crate::types::{FeedItem, SearchResponse};
use chrono::{DateTime, Utc};
use futures::StreamExt;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use reqwest::header::{
    HeaderMap, HeaderValue, CACHE_CONTROL, CONTENT_TYPE, EXPIRES, LAST_MODIFIED,
};
use std::borrow::Cow;
use std::io::Cursor;
use tracing::debug;

const DC_NAMESPACE: &str = "http://purl.org/dc/elements/1.1/";
const ATOM_NAMESPACE: &str = "http://www.w3.org/2005/Atom";

/// Content type of every feed response
pub const FEED_CONTENT_TYPE: &str = "text/xml; charset=utf-8";

/// Channel-level settings shared by every feed a process serves
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedConfig {
    pub title: String,
    pub link: String,
    pub description: String,
    pub docs: String,
    pub generator: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            title: "Hacker News".to_string(),
            link: "https://news.ycombinator.com/".to_string(),
            description: "Hacker News RSS".to_string(),
            docs: "https://edavis.github.io/hnrss/".to_string(),
            generator: "https://github.com/edavis/hnrss".to_string(),
        }
    }
}

/// `<channel>` header elements
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelMetadata {
    pub title: String,
    pub link: String,
    pub description: String,
    pub docs: String,
    pub generator: String,
    /// `atom:link rel="self"` href
    pub self_link: String,
    pub last_build_date: DateTime<Utc>,
}

impl ChannelMetadata {
    pub fn new(config: &FeedConfig, request_url: &str) -> Self {
        Self {
            title: config.title.clone(),
            link: config.link.clone(),
            description: config.description.clone(),
            docs: config.docs.clone(),
            generator: config.generator.clone(),
            self_link: self_link(request_url),
            last_build_date: Utc::now(),
        }
    }
}

/// Feed's own URL: forced to https, with quotes and spaces percent-encoded
///
/// Feeds are served behind TLS termination, so the inbound request URL
/// reports plain http.
pub fn self_link(request_url: &str) -> String {
    let url = match request_url.strip_prefix("http://") {
        Some(rest) => format!("https://{}", rest),
        None => request_url.to_string(),
    };
    url.replace('"', "%22").replace(' ', "%20")
}

/// Finished HTTP response for a feed
#[derive(Debug, Clone)]
pub struct FeedResponse {
    pub body: Vec<u8>,
    pub status: u16,
    pub headers: HeaderMap,
}

/// An RSS channel and its items, in search API order
#[derive(Debug, Clone)]
pub struct FeedDocument {
    pub channel: ChannelMetadata,
    pub items: Vec<FeedItem>,
}

impl FeedDocument {
    /// Build the document for one search API response
    ///
    /// Up to `concurrency` articles are fetched at once; items always keep
    /// the order of `response.hits`.
    pub async fn build<F: Fetcher + ?Sized>(
        response: &SearchResponse,
        request_url: &str,
        config: &FeedConfig,
        fetcher: &F,
        concurrency: usize,
    ) -> Self {
        let channel = ChannelMetadata::new(config, request_url);

        let items = match response.hits {
            Some(ref hits) => {
                let builder = FeedItemBuilder::new(fetcher);
                futures::stream::iter(hits)
                    .map(|hit| builder.build(hit))
                    .buffered(concurrency.max(1))
                    .collect::<Vec<_>>()
                    .await
            }
            None => Vec::new(),
        };

        debug!(items = items.len(), self_link = %channel.self_link, "Built feed document");

        Self { channel, items }
    }

    /// Serialize as a pretty-printed RSS 2.0 document
    pub fn to_xml(&self) -> Result<Vec<u8>, FeedError> {
        let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);

        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

        let mut rss = BytesStart::new("rss");
        rss.push_attribute(("version", "2.0"));
        rss.push_attribute(("xmlns:dc", DC_NAMESPACE));
        rss.push_attribute(("xmlns:atom", ATOM_NAMESPACE));
        writer.write_event(Event::Start(rss))?;
        writer.write_event(Event::Start(BytesStart::new("channel")))?;

        let channel = &self.channel;
        write_text_element(&mut writer, "title", &channel.title)?;
        write_text_element(&mut writer, "link", &channel.link)?;
        write_text_element(&mut writer, "description", &channel.description)?;
        write_text_element(&mut writer, "docs", &channel.docs)?;
        write_text_element(&mut writer, "generator", &channel.generator)?;
        write_text_element(
            &mut writer,
            "lastBuildDate",
            &rfc2822(&channel.last_build_date),
        )?;

        let mut atom_link = BytesStart::new("atom:link");
        atom_link.push_attribute(("rel", "self"));
        atom_link.push_attribute(("type", "application/rss+xml"));
        atom_link.push_attribute(("href", &*xml_chars(&channel.self_link)));
        writer.write_event(Event::Empty(atom_link))?;

        for item in &self.items {
            write_item(&mut writer, item)?;
        }

        writer.write_event(Event::End(BytesEnd::new("channel")))?;
        writer.write_event(Event::End(BytesEnd::new("rss")))?;

        let mut xml = writer.into_inner().into_inner();
        xml.push(b'\n');
        Ok(xml)
    }

    /// Serialized document as a string
    pub fn to_xml_string(&self) -> Result<String, FeedError> {
        Ok(String::from_utf8(self.to_xml()?)?)
    }

    /// Body, status and caching headers for this document
    pub fn response(&self) -> Result<FeedResponse, FeedError> {
        let body = self.to_xml()?;
        let cache = CacheHeaderPolicy::compute(&self.items);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(FEED_CONTENT_TYPE));
        headers.insert(
            LAST_MODIFIED,
            HeaderValue::from_str(&cache.last_modified_header())?,
        );
        headers.insert(
            CACHE_CONTROL,
            HeaderValue::from_str(&cache.cache_control_header())?,
        );
        headers.insert(EXPIRES, HeaderValue::from_str(&cache.expires_header())?);

        Ok(FeedResponse {
            body,
            status: 200,
            headers,
        })
    }
}

fn write_item(writer: &mut Writer<Cursor<Vec<u8>>>, item: &FeedItem) -> std::io::Result<()> {
    writer.write_event(Event::Start(BytesStart::new("item")))?;

    write_text_element(writer, "title", &item.title)?;
    write_text_element(writer, "description", &item.body)?;
    write_text_element(writer, "link", &item.link)?;
    match item.author {
        Some(ref author) => write_text_element(writer, "dc:creator", author)?,
        None => writer.write_event(Event::Empty(BytesStart::new("dc:creator")))?,
    }
    write_text_element(writer, "pubDate", &rfc2822(&item.pub_date))?;
    write_text_element(writer, "comments", &item.comments)?;

    let mut guid = BytesStart::new("guid");
    guid.push_attribute((
        "isPermaLink",
        if item.guid_is_permalink { "true" } else { "false" },
    ));
    writer.write_event(Event::Start(guid))?;
    writer.write_event(Event::Text(BytesText::new(&xml_chars(&item.guid))))?;
    writer.write_event(Event::End(BytesEnd::new("guid")))?;

    writer.write_event(Event::End(BytesEnd::new("item")))
}

fn write_text_element(
    writer: &mut Writer<Cursor<Vec<u8>>>,
    tag: &str,
    text: &str,
) -> std::io::Result<()> {
    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    writer.write_event(Event::Text(BytesText::new(&xml_chars(text))))?;
    writer.write_event(Event::End(BytesEnd::new(tag)))
}

/// Drop characters XML 1.0 cannot represent, escaped or not
///
/// Scraped pages regularly carry stray control characters such as form
/// feeds; one of them would make the whole document unparseable.
fn xml_chars(text: &str) -> Cow<'_, str> {
    if text.chars().all(is_xml_char) {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(text.chars().filter(|&c| is_xml_char(c)).collect())
    }
}

fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\u{9}' | '\u{A}' | '\u{D}'
            | '\u{20}'..='\u{D7FF}'
            | '\u{E000}'..='\u{FFFD}'
            | '\u{10000}'..='\u{10FFFF}'
    )
}
