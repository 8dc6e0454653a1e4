use chrono::Utc;
use digest_core::{run, DigestConfig, DigestError, HttpFetcher};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), DigestError> {
    init_tracing();

    let config = DigestConfig::default();
    let fetcher = HttpFetcher::new(config.request_timeout())?;

    let now = Utc::now();
    info!(
        sources = config.sources.len(),
        timezone = %config.timezone,
        "starting digest run"
    );
    let digest = run(&fetcher, &config, now).await?;

    println!(
        "{} updated with {} articles.",
        config.output_path.display(),
        digest.len()
    );
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
