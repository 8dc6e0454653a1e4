use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::DigestError;
use crate::feed::FeedSource;
use crate::filter::Matcher;

const DEFAULT_FEED_URL: &str = concat!(
    "https://news.google.com/rss/search",
    "?q=\"Stability+AI\"+\"Getty+Images\"&hl=en&gl=US&ceid=US:en"
);

/// Everything one digest run needs. Deserialised from JSON with every field
/// optional; missing fields take the values from [`DigestConfig::default`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DigestConfig {
    /// Heading of the generated Markdown document.
    pub title: String,
    pub sources: Vec<FeedSource>,
    pub matcher: Matcher,
    pub output_path: PathBuf,
    /// Timezone whose civil date defines "today".
    pub timezone: Tz,
    /// Summary characters kept before the `...` marker.
    pub summary_limit: usize,
    pub request_timeout_seconds: u64,
}

impl Default for DigestConfig {
    fn default() -> Self {
        Self {
            title: "Stability AI vs Getty Images: Today's News".to_owned(),
            sources: vec![FeedSource::new("Google News", DEFAULT_FEED_URL)],
            matcher: Matcher::AllKeywords {
                keywords: vec!["stability ai".to_owned(), "getty images".to_owned()],
            },
            output_path: PathBuf::from("README.md"),
            timezone: chrono_tz::Europe::London,
            summary_limit: 200,
            request_timeout_seconds: 30,
        }
    }
}

impl DigestConfig {
    /// Reads a JSON configuration; absent fields keep their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, DigestError> {
        let content = std::fs::read_to_string(path)?;
        let config: DigestConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Checks that at least one source is configured and every URL parses.
    pub fn validate(&self) -> Result<(), DigestError> {
        if self.sources.is_empty() {
            return Err(DigestError::NoSources);
        }
        for source in &self.sources {
            url::Url::parse(&source.url).map_err(|source_err| DigestError::InvalidUrl {
                url: source.url.clone(),
                source: source_err,
            })?;
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}
