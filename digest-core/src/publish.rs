use std::path::Path;

use tracing::{debug, info};

use crate::error::DigestError;

/// Replaces the file at `path` with `markdown`.
///
/// The text goes to a sibling `.tmp` file first and is renamed over the
/// target, so readers never observe a half-written digest.
pub async fn publish(path: impl AsRef<Path>, markdown: &str) -> Result<(), DigestError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = std::path::PathBuf::from(tmp);

    tokio::fs::write(&tmp, markdown.as_bytes()).await?;
    debug!(path = %tmp.display(), "digest written to temp file");
    if let Err(e) = tokio::fs::rename(&tmp, path).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(e.into());
    }

    info!(
        path = %path.display(),
        bytes = markdown.len(),
        "digest published"
    );
    Ok(())
}
