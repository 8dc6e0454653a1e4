use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use tracing::{debug, info};

use crate::config::DigestConfig;
use crate::error::DigestError;
use crate::feed::Entry;
use crate::fetch::FeedFetcher;
use crate::filter::is_published_today;

pub const NO_ARTICLES: &str = "No articles found today.";
const UNKNOWN_PUBLICATION: &str = "Unknown";
const PUBLISHED_FORMAT: &str = "%Y-%m-%d %H:%M:%S %Z";

/// One row of the digest, already formatted for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub publication: String,
    pub title: String,
    pub link: String,
    pub published: String,
    pub summary: String,
}

impl Article {
    /// Returns `None` when the entry carries no valid publish timestamp.
    pub fn from_entry(entry: &Entry, timezone: Tz, summary_limit: usize) -> Option<Self> {
        let published = entry
            .published
            .as_ref()?
            .to_utc()?
            .with_timezone(&timezone)
            .format(PUBLISHED_FORMAT)
            .to_string();

        let summary = match entry.summary.as_deref() {
            Some(text) if !text.is_empty() => {
                let mut truncated: String = text.chars().take(summary_limit).collect();
                truncated.push_str("...");
                truncated
            }
            _ => String::new(),
        };

        Some(Self {
            publication: entry
                .source
                .clone()
                .unwrap_or_else(|| UNKNOWN_PUBLICATION.to_owned()),
            title: entry.title.clone(),
            link: entry.link.clone(),
            published,
            summary,
        })
    }
}

/// Articles selected for today, in feed order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Digest {
    articles: Vec<Article>,
}

impl Digest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, article: Article) {
        self.articles.push(article);
    }

    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }
}

impl FromIterator<Article> for Digest {
    fn from_iter<I: IntoIterator<Item = Article>>(iter: I) -> Self {
        Self {
            articles: iter.into_iter().collect(),
        }
    }
}

/// Fetches every configured source in order and keeps the entries that were
/// published today and satisfy the configured matcher.
///
/// Any fetch failure aborts the whole run.
pub async fn fetch_and_filter<F: FeedFetcher>(
    fetcher: &F,
    config: &DigestConfig,
    now: DateTime<Utc>,
) -> Result<Digest, DigestError> {
    let mut digest = Digest::new();

    for source in &config.sources {
        let entries = fetcher.fetch(source).await?;
        let fetched = entries.len();
        let mut kept = 0usize;

        for entry in &entries {
            if entry.published.is_none() {
                debug!(title = %entry.title, "skipping entry without publish date");
                continue;
            }
            if !is_published_today(entry.published.as_ref(), config.timezone, now) {
                continue;
            }
            if !config.matcher.matches(entry) {
                debug!(title = %entry.title, "entry does not match");
                continue;
            }
            if let Some(article) = Article::from_entry(entry, config.timezone, config.summary_limit)
            {
                digest.push(article);
                kept += 1;
            }
        }

        info!(feed = %source.label, fetched, kept, "feed filtered");
    }

    Ok(digest)
}

/// Renders the digest as a Markdown document headed by `title`.
pub fn render(digest: &Digest, title: &str) -> String {
    let mut out = format!("# {}\n\n", title);
    if digest.is_empty() {
        out.push_str(NO_ARTICLES);
        out.push('\n');
        return out;
    }

    out.push_str("| Date (BST) | Publication | Title | Summary |\n");
    out.push_str("|------------|-------------|-------|---------|\n");
    for article in digest.articles() {
        let _ = writeln!(
            out,
            "| {} | {} | [{}]({}) | {} |",
            table_cell(&article.published),
            table_cell(&article.publication),
            table_cell(&article.title),
            table_cell(&article.link),
            table_cell(&article.summary),
        );
    }
    out
}

// Keeps a value on one table row.
fn table_cell(text: &str) -> String {
    text.replace("\r\n", " ")
        .replace(['\n', '\r'], " ")
        .replace('|', "\\|")
}

/// One complete run: fetch, filter, render and publish to the configured
/// output path. Returns the digest that was written.
pub async fn run<F: FeedFetcher>(
    fetcher: &F,
    config: &DigestConfig,
    now: DateTime<Utc>,
) -> Result<Digest, DigestError> {
    config.validate()?;
    let digest = fetch_and_filter(fetcher, config, now).await?;
    let markdown = render(&digest, &config.title);
    crate::publish::publish(&config.output_path, &markdown).await?;
    Ok(digest)
}
