//! Integration tests for hnrss using wiremock

use async_trait::async_trait;
use hnrss::{
    fetch_article, fetch_article_with_options, ArticleFetcher, Feed, FetchOptions, Fetcher, Hit,
    SearchResponse,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ARTICLE_HTML: &str = r#"<!DOCTYPE html>
<html>
<head><title>Writing a Feed Reader</title></head>
<body>
  <nav><a href="/">Home</a> | <a href="/archive">Archive</a></nav>
  <article>
    <h1>Writing a Feed Reader</h1>
    <p>Feed readers poll a list of sources, parse what comes back, and keep track of which entries have already been shown to the reader.</p>
    <p>Most of the work is in being forgiving: servers send the wrong content type, dates in odd formats, and bodies that are only partly valid.</p>
    <p>Caching headers matter too, because a reader that polls too often wastes bandwidth, and one that polls too rarely misses stories.</p>
  </article>
  <footer>Copyright 2024</footer>
</body>
</html>"#;

/// Fetcher that returns a fixed fragment and counts calls
#[derive(Default)]
struct StubFetcher {
    calls: AtomicUsize,
}

#[async_trait]
impl Fetcher for StubFetcher {
    fn name(&self) -> &'static str {
        "stub"
    }

    async fn fetch(&self, _url: &str) -> String {
        self.calls.fetch_add(1, Ordering::SeqCst);
        "<p>stub article</p>".to_string()
    }
}

fn hit(id: &str, created_at_i: i64) -> Hit {
    Hit {
        object_id: id.to_string(),
        title: format!("Story {}", id),
        created_at_i,
        ..Default::default()
    }
}

/// A local URL nothing is listening on
fn unreachable_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn item_count(xml: &str) -> usize {
    xml.matches("<item>").count()
}

#[tokio::test]
async fn test_fetch_html_article() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/post"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(ARTICLE_HTML, "text/html"))
        .mount(&mock_server)
        .await;

    let fragment = fetch_article(&format!("{}/post", mock_server.uri())).await;

    assert!(fragment.starts_with("<hr><div>"));
    assert!(fragment.contains("Most of the work is in being forgiving"));
    assert!(!fragment.contains("HTTP error"));
    assert!(fragment.contains("<p><small><em>Fetched in "));
    assert!(fragment.contains("Original title: Writing a Feed Reader\n"));
}

#[tokio::test]
async fn test_fetch_sends_browser_user_agent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("user-agent", "Mozilla/5.0"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(ARTICLE_HTML, "text/html"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fragment = fetch_article(&format!("{}/", mock_server.uri())).await;
    assert!(fragment.starts_with("<hr><div>"));
}

#[tokio::test]
async fn test_fetch_custom_user_agent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(header("user-agent", "CustomBot/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(ARTICLE_HTML, "text/html"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let options = FetchOptions {
        user_agent: Some("CustomBot/1.0".to_string()),
        ..Default::default()
    };
    let fragment = fetch_article_with_options(&format!("{}/", mock_server.uri()), options).await;
    assert!(!fragment.starts_with("Failed"));
}

#[tokio::test]
async fn test_fetch_4xx_keeps_content() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_raw(ARTICLE_HTML, "text/html"))
        .mount(&mock_server)
        .await;

    let fragment = fetch_article(&format!("{}/missing", mock_server.uri())).await;

    assert!(fragment.starts_with("<div>HTTP error fetching article: 404</div>\n<hr><div>"));
    assert!(fragment.contains("Caching headers matter too"));
}

#[tokio::test]
async fn test_fetch_5xx_non_text() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(
            ResponseTemplate::new(503)
                .set_body_raw(b"{\"error\": true}".to_vec(), "application/json"),
        )
        .mount(&mock_server)
        .await;

    let fragment = fetch_article(&format!("{}/broken", mock_server.uri())).await;

    assert!(fragment.starts_with("<div>HTTP error fetching article: 503</div>\n"));
    assert!(fragment.contains("<div>Non-text content-type: application/json</div>\n"));
}

#[tokio::test]
async fn test_fetch_binary_content() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/paper.pdf"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(vec![0x25, 0x50, 0x44, 0x46])
                .insert_header("content-type", "application/pdf"),
        )
        .mount(&mock_server)
        .await;

    let fragment = fetch_article(&format!("{}/paper.pdf", mock_server.uri())).await;

    assert!(fragment.starts_with("<div>Non-text content-type: application/pdf</div>\n"));
    assert!(!fragment.contains("<hr>"));
    assert!(fragment.contains("Original title: \n"));
}

#[tokio::test]
async fn test_fetch_plain_text_is_extracted() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/notes.txt"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("just some text", "text/plain"),
        )
        .mount(&mock_server)
        .await;

    let fragment = fetch_article(&format!("{}/notes.txt", mock_server.uri())).await;

    // text/* always goes through extraction, successful or not
    assert!(fragment.starts_with("<hr><div>"));
    assert!(!fragment.contains("Non-text content-type"));
}

#[tokio::test]
async fn test_fetch_timeout() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(ARTICLE_HTML, "text/html")
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let options = FetchOptions {
        timeout: Some(Duration::from_millis(200)),
        ..Default::default()
    };
    let fragment = fetch_article_with_options(&format!("{}/", mock_server.uri()), options).await;

    assert!(fragment.starts_with("Failed to fetch article:"));
}

#[tokio::test]
async fn test_fetch_connection_refused() {
    let fragment = ArticleFetcher::default()
        .fetch(&format!("{}/", unreachable_url()))
        .await;

    assert!(fragment.starts_with("Failed to fetch article:"));
}

#[tokio::test]
async fn test_end_to_end_with_stub_fetcher() {
    init_tracing();

    let mut with_text = hit("1001", 1_700_000_600);
    with_text.story_text = Some("<p>Ask HN: inline</p>".to_string());
    with_text.points = Some(1);

    let mut linked = hit("1002", 1_700_000_000);
    linked.url = Some("https://example.com/linked".to_string());
    linked.num_comments = Some(1);
    linked.author = Some("pg".to_string());

    let response = SearchResponse {
        hits: Some(vec![with_text, linked]),
    };

    let fetcher = StubFetcher::default();
    let feed = Feed::default();
    let resp = feed
        .render_with(&fetcher, &response, "http://hnrss.org/newest?q=a b")
        .await
        .unwrap();
    let xml = String::from_utf8(resp.body).unwrap();

    assert_eq!(resp.status, 200);
    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
    assert_eq!(item_count(&xml), 2);

    let first = xml
        .find("<guid isPermaLink=\"false\">https://news.ycombinator.com/item?id=1001</guid>")
        .unwrap();
    let second = xml
        .find("<guid isPermaLink=\"false\">https://news.ycombinator.com/item?id=1002</guid>")
        .unwrap();
    assert!(first < second);

    assert!(xml.contains("<link>https://example.com/linked</link>"));
    assert!(xml.contains("<link>https://news.ycombinator.com/item?id=1001</link>"));
    assert!(xml.contains("stub article"));
    assert!(xml.contains("Ask HN: inline"));
    assert!(xml.contains("<dc:creator>pg</dc:creator>"));
    assert!(xml.contains("href=\"https://hnrss.org/newest?q=a%20b\""));

    assert_eq!(resp.headers["content-type"], "text/xml; charset=utf-8");
    assert_eq!(resp.headers["last-modified"], "Tue, 14 Nov 2023 22:23:20 GMT");
    assert_eq!(resp.headers["cache-control"], "max-age=300");
    assert!(resp.headers["expires"].to_str().unwrap().ends_with(" GMT"));
}

#[tokio::test]
async fn test_end_to_end_over_http() {
    init_tracing();
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/one"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(ARTICLE_HTML, "text/html"))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/two"))
        .respond_with(ResponseTemplate::new(500).set_body_raw(ARTICLE_HTML, "text/html"))
        .mount(&mock_server)
        .await;

    let json = format!(
        r#"{{
            "hits": [
                {{"objectID": "1", "url": "{0}/one", "title": "One", "author": "a",
                  "num_comments": 0, "points": 2, "created_at_i": 1700000000,
                  "_tags": ["story"]}},
                {{"objectID": "2", "url": "{0}/two", "title": "Two", "author": "b",
                  "num_comments": null, "points": null, "created_at_i": 1700003600,
                  "_tags": ["story"]}}
            ],
            "nbHits": 2
        }}"#,
        mock_server.uri()
    );

    let feed = Feed::builder().title("Hacker News: Test").fetch_concurrency(2).build();
    let resp = feed
        .render_json(&json, "http://hnrss.org/newest")
        .await
        .unwrap();
    let xml = String::from_utf8(resp.body).unwrap();

    assert_eq!(item_count(&xml), 2);
    assert!(xml.contains("<title>Hacker News: Test</title>"));
    assert!(xml.find("<title>One</title>").unwrap() < xml.find("<title>Two</title>").unwrap());
    assert!(xml.contains("HTTP error fetching article: 500"));
    assert!(xml.contains("2 points"));
    assert!(xml.contains("0 comments"));
    assert!(xml.contains("0 points"));
    // 3600s of gaps over 2 items
    assert_eq!(resp.headers["cache-control"], "max-age=1800");
}

#[tokio::test]
async fn test_unreachable_article_still_renders_feed() {
    init_tracing();

    let mut h = hit("77", 1_700_000_000);
    h.url = Some(format!("{}/gone", unreachable_url()));
    let response = SearchResponse { hits: Some(vec![h]) };

    let resp = Feed::default()
        .render(&response, "http://hnrss.org/newest")
        .await
        .unwrap();
    let xml = String::from_utf8(resp.body).unwrap();

    assert_eq!(resp.status, 200);
    assert_eq!(item_count(&xml), 1);
    assert!(xml.contains("Failed to fetch article:"));
}
