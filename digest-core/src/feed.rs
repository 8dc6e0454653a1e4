use chrono::{DateTime, Datelike, NaiveDate, Timelike, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::DigestError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct FeedSource {
    pub label: String,
    pub url: String,
}

impl FeedSource {
    pub fn new(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            url: url.into(),
        }
    }
}

/// Calendar and clock components of a publish time, interpreted as UTC.
///
/// Kept as raw components rather than a `DateTime` so that out-of-range
/// values coming from a sloppy feed survive until the date check, which
/// treats them as "not today".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublishedParts {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
}

impl PublishedParts {
    pub fn to_utc(&self) -> Option<DateTime<Utc>> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)?
            .and_hms_opt(self.hour, self.minute, self.second)
            .map(|naive| naive.and_utc())
    }
}

impl From<DateTime<Utc>> for PublishedParts {
    fn from(dt: DateTime<Utc>) -> Self {
        Self {
            year: dt.year(),
            month: dt.month(),
            day: dt.day(),
            hour: dt.hour(),
            minute: dt.minute(),
            second: dt.second(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Entry {
    pub title: String,
    pub link: String,
    pub published: Option<PublishedParts>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub content: Vec<String>,
    pub source: Option<String>,
}

impl Entry {
    pub fn from_rss_item(item: &rss::Item) -> Self {
        let published = item
            .pub_date()
            .and_then(|value| DateTime::parse_from_rfc2822(value).ok())
            .map(|dt| PublishedParts::from(dt.with_timezone(&Utc)));

        if published.is_none() {
            debug!(
                title = item.title().unwrap_or_default(),
                "rss item has no usable date"
            );
        }

        // A parsed RSS item exposes its description as both summary and description.
        let description = item.description().map(ToOwned::to_owned);

        Self {
            title: item.title().unwrap_or_default().to_owned(),
            link: item.link().unwrap_or_default().to_owned(),
            published,
            summary: description.clone(),
            description,
            content: item.content().map(|c| vec![c.to_owned()]).unwrap_or_default(),
            source: item
                .source()
                .and_then(|source| source.title())
                .map(ToOwned::to_owned),
        }
    }

    pub fn from_atom_entry(entry: &atom_syndication::Entry) -> Self {
        let link = entry
            .links()
            .iter()
            .find(|link| link.rel() == "alternate")
            .or_else(|| entry.links().first())
            .map(|link| link.href().to_owned())
            .unwrap_or_default();

        Self {
            title: entry.title().value.clone(),
            link,
            published: entry
                .published()
                .map(|dt| PublishedParts::from(dt.with_timezone(&Utc))),
            summary: entry.summary().map(|text| text.value.clone()),
            description: None,
            content: entry
                .content()
                .and_then(|content| content.value())
                .map(|value| vec![value.to_owned()])
                .unwrap_or_default(),
            source: entry.source().map(|source| source.title().value.clone()),
        }
    }

    /// Lower-cased text used by the content matchers: title, summary,
    /// description and every content block joined by single spaces.
    pub fn searchable_text(&self) -> String {
        let mut parts: Vec<&str> = vec![self.title.as_str()];
        parts.extend(self.summary.as_deref());
        parts.extend(self.description.as_deref());
        parts.extend(self.content.iter().map(String::as_str));
        parts.join(" ").to_lowercase()
    }
}

/// Parses a feed body as RSS first, then as Atom.
pub fn parse_entries(url: &str, body: &[u8]) -> Result<Vec<Entry>, DigestError> {
    if let Ok(channel) = rss::Channel::read_from(body) {
        return Ok(channel.items().iter().map(Entry::from_rss_item).collect());
    }
    if let Ok(feed) = atom_syndication::Feed::read_from(body) {
        return Ok(feed.entries().iter().map(Entry::from_atom_entry).collect());
    }
    Err(DigestError::UnsupportedFormat {
        url: url.to_owned(),
    })
}
