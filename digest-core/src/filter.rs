use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::feed::{Entry, PublishedParts};

/// True when `published` falls on the same civil date as `now`, both seen
/// from `timezone`. Missing or malformed timestamps are never "today".
pub fn is_published_today(
    published: Option<&PublishedParts>,
    timezone: Tz,
    now: DateTime<Utc>,
) -> bool {
    let Some(parts) = published else {
        return false;
    };
    let Some(instant) = parts.to_utc() else {
        debug!(?parts, "discarding malformed publish timestamp");
        return false;
    };

    let published_date = instant.with_timezone(&timezone).date_naive();
    let today = now.with_timezone(&timezone).date_naive();
    debug!(%published_date, %today, %timezone, "comparing publish date");
    published_date == today
}

/// Relevance rule applied to each entry that was published today.
///
/// Matching is plain case-insensitive substring search: a name embedded in
/// a longer word still counts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Matcher {
    /// Every keyword must appear somewhere in the entry text.
    AllKeywords { keywords: Vec<String> },
    /// Entries from a publication whose label starts with `label_prefix`
    /// always match; otherwise at least one name must appear in the text.
    AnyName {
        label_prefix: String,
        names: Vec<String>,
    },
}

impl Matcher {
    pub fn matches(&self, entry: &Entry) -> bool {
        match self {
            Matcher::AllKeywords { keywords } => {
                let text = entry.searchable_text();
                keywords
                    .iter()
                    .all(|keyword| text.contains(&keyword.to_lowercase()))
            }
            Matcher::AnyName {
                label_prefix,
                names,
            } => {
                let label_match = !label_prefix.is_empty()
                    && entry
                        .source
                        .as_deref()
                        .is_some_and(|label| label.starts_with(label_prefix.as_str()));
                if label_match {
                    return true;
                }
                let text = entry.searchable_text();
                names.iter().any(|name| text.contains(&name.to_lowercase()))
            }
        }
    }
}
