use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Duration as ChronoDuration, TimeZone, Utc};
use digest_core::{
    fetch_and_filter, run, DigestConfig, DigestError, Entry, FeedFetcher, FeedSource,
    HttpFetcher, Matcher, PublishedParts,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn temp_dir(tag: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    dir.push(format!(
        "news_digest_{}_{}",
        tag,
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    dir
}

struct StubFetcher {
    feeds: HashMap<String, Vec<Entry>>,
}

impl FeedFetcher for StubFetcher {
    async fn fetch(&self, source: &FeedSource) -> Result<Vec<Entry>, DigestError> {
        self.feeds
            .get(&source.url)
            .cloned()
            .ok_or_else(|| DigestError::UnsupportedFormat {
                url: source.url.clone(),
            })
    }
}

fn stub_entry(title: &str, published: Option<DateTime<Utc>>) -> Entry {
    Entry {
        title: title.into(),
        link: format!("http://example.com/{}", title.replace(' ', "-")),
        published: published.map(PublishedParts::from),
        summary: Some("Stability AI and Getty Images".into()),
        ..Default::default()
    }
}

const FEED_A: &str = "http://a.test/feed";
const FEED_B: &str = "http://b.test/feed";

fn source(url: &str) -> FeedSource {
    FeedSource::new(url, url)
}

fn stub_config(urls: &[&str]) -> DigestConfig {
    DigestConfig {
        sources: urls.iter().copied().map(source).collect(),
        ..DigestConfig::default()
    }
}

#[tokio::test]
async fn filter_keeps_todays_matching_entries_in_feed_order() {
    let now = Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap();
    let yesterday = now - ChronoDuration::days(1);

    let mut off_topic = stub_entry("Off topic", Some(now));
    off_topic.summary = Some("Nothing to see".into());

    let mut feeds = HashMap::new();
    feeds.insert(
        FEED_A.to_string(),
        vec![
            stub_entry("A one", Some(now)),
            stub_entry("A old", Some(yesterday)),
            stub_entry("A undated", None),
            off_topic,
            stub_entry("A two", Some(now - ChronoDuration::hours(3))),
        ],
    );
    feeds.insert(FEED_B.to_string(), vec![stub_entry("B one", Some(now))]);

    let fetcher = StubFetcher { feeds };
    let config = stub_config(&[FEED_B, FEED_A]);
    let digest = fetch_and_filter(&fetcher, &config, now).await.unwrap();

    let titles: Vec<&str> = digest.articles().iter().map(|a| a.title.as_str()).collect();
    assert_eq!(titles, vec!["B one", "A one", "A two"]);
}

#[tokio::test]
async fn fetch_failure_aborts_the_run() {
    let now = Utc::now();
    let mut feeds = HashMap::new();
    feeds.insert(FEED_A.to_string(), vec![stub_entry("A", Some(now))]);
    let fetcher = StubFetcher { feeds };

    let config = stub_config(&[FEED_A, "http://missing.test/feed"]);
    let err = fetch_and_filter(&fetcher, &config, now).await.unwrap_err();
    assert!(matches!(err, DigestError::UnsupportedFormat { .. }));
}

#[tokio::test]
async fn name_matcher_is_usable_through_the_pipeline() {
    let now = Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap();
    let mut press = stub_entry("Weather", Some(now));
    press.summary = None;
    press.source = Some("GOV.UK".into());
    let mut quote = stub_entry("Minister speaks", Some(now));
    quote.summary = Some("Jane Doe said".into());
    let mut other = stub_entry("Other", Some(now));
    other.summary = None;

    let mut feeds = HashMap::new();
    feeds.insert(FEED_A.to_string(), vec![press, quote, other]);
    let config = DigestConfig {
        matcher: Matcher::AnyName {
            label_prefix: "GOV.UK".into(),
            names: vec!["jane doe".into()],
        },
        ..stub_config(&[FEED_A])
    };

    let fetcher = StubFetcher { feeds };
    let digest = fetch_and_filter(&fetcher, &config, now).await.unwrap();
    assert_eq!(digest.len(), 2);
}

#[tokio::test]
async fn end_to_end_run_writes_a_one_row_table() {
    let server = MockServer::start().await;
    let now = Utc::now();
    let body = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>News search</title>
    <link>http://example.com/</link>
    <description>Search</description>
    <item>
      <title>Getty Images settles with Stability AI</title>
      <link>http://example.com/getty</link>
      <pubDate>{}</pubDate>
      <description>Getty Images and Stability AI reach a settlement</description>
      <source url="https://news.example.com">Example News</source>
    </item>
    <item>
      <title>Unrelated story</title>
      <link>http://example.com/other</link>
      <pubDate>{}</pubDate>
      <description>Something else</description>
    </item>
  </channel>
</rss>"#,
        now.to_rfc2822(),
        now.to_rfc2822()
    );

    Mock::given(method("GET"))
        .and(path("/feed"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "application/rss+xml")
                .set_body_string(body),
        )
        .mount(&server)
        .await;

    let dir = temp_dir("e2e");
    let output = dir.join("README.md");
    tokio::fs::create_dir_all(&dir).await.unwrap();
    let stale = "stale content from a previous run";
    tokio::fs::write(&output, stale).await.unwrap();

    let config = DigestConfig {
        sources: vec![FeedSource::new("Test", format!("{}/feed", server.uri()))],
        output_path: output.clone(),
        ..DigestConfig::default()
    };
    let fetcher = HttpFetcher::new(Duration::from_secs(5)).unwrap();

    let digest = run(&fetcher, &config, now).await.unwrap();
    assert_eq!(digest.len(), 1);

    let written = tokio::fs::read_to_string(&output).await.unwrap();
    let heading = "# Stability AI vs Getty Images: Today's News\n";
    assert!(written.starts_with(heading));
    assert!(!written.contains(stale));
    let rows: Vec<&str> = written.lines().filter(|l| l.starts_with('|')).collect();
    assert_eq!(rows.len(), 3);
    assert!(rows[2].contains("| Example News |"));
    let title_cell = "[Getty Images settles with Stability AI](http://example.com/getty)";
    assert!(rows[2].contains(title_cell));

    let _ = tokio::fs::remove_dir_all(&dir).await;
}

#[tokio::test]
async fn http_error_status_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/feed"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let fetcher = HttpFetcher::new(Duration::from_secs(5)).unwrap();
    let source = FeedSource::new("Down", format!("{}/feed", server.uri()));
    let err = fetcher.fetch(&source).await.unwrap_err();
    match err {
        DigestError::Status { status, .. } => assert_eq!(status.as_u16(), 503),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn slow_feed_hits_the_request_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/feed"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let fetcher = HttpFetcher::new(Duration::from_millis(200)).unwrap();
    let source = FeedSource::new("Slow", format!("{}/feed", server.uri()));
    let err = fetcher.fetch(&source).await.unwrap_err();
    assert!(matches!(err, DigestError::Network(ref e) if e.is_timeout()));
}
