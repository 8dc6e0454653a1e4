pub mod config;
pub mod digest;
pub mod error;
pub mod feed;
pub mod fetch;
pub mod filter;
pub mod publish;

pub use config::DigestConfig;
pub use digest::{fetch_and_filter, render, run, Article, Digest, NO_ARTICLES};
pub use error::DigestError;
pub use feed::{parse_entries, Entry, FeedSource, PublishedParts};
pub use fetch::{FeedFetcher, HttpFetcher};
pub use filter::{is_published_today, Matcher};
pub use publish::publish;
