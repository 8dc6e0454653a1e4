use thiserror::Error;

#[derive(Debug, Error)]
pub enum DigestError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("feed {url} answered with HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
    #[error("feed {url} is neither RSS nor Atom")]
    UnsupportedFormat { url: String },
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
    #[error("invalid feed url {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("no feed sources configured")]
    NoSources,
}
