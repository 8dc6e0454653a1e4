use std::future::Future;
use std::time::Duration;

use reqwest::{redirect, Client, ClientBuilder};
use tracing::{debug, info};

use crate::error::DigestError;
use crate::feed::{parse_entries, Entry, FeedSource};

const USER_AGENT: &str = concat!("news-digest/", env!("CARGO_PKG_VERSION"));

/// Source of parsed feed entries for one configured feed.
pub trait FeedFetcher {
    fn fetch(
        &self,
        source: &FeedSource,
    ) -> impl Future<Output = Result<Vec<Entry>, DigestError>> + Send;
}

/// Fetches feeds over HTTP and parses them as RSS or Atom.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Builds a client with a bounded per-request timeout. No retries are
    /// attempted; a slow or failing feed fails the run.
    pub fn new(timeout: Duration) -> Result<Self, DigestError> {
        let client = ClientBuilder::new()
            .redirect(redirect::Policy::limited(5))
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

impl FeedFetcher for HttpFetcher {
    async fn fetch(&self, source: &FeedSource) -> Result<Vec<Entry>, DigestError> {
        info!(feed = %source.label, url = %source.url, "fetching feed");
        let response = self.client.get(source.url.as_str()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(DigestError::Status {
                url: source.url.clone(),
                status,
            });
        }
        let bytes = response.bytes().await?;
        debug!(
            feed = %source.label,
            len = bytes.len(),
            "feed body received"
        );
        parse_entries(&source.url, &bytes)
    }
}
