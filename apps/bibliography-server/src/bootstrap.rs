//! Document bootstrap
//!
//! Makes sure the bibliography PDF is present on disk before the server
//! opens it, downloading it once if needed.

use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("Download from {url} failed: {source}")]
    Download {
        url: String,
        source: reqwest::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Return `path` if it exists, otherwise download `url` into it
///
/// The body is written to a `.part` sibling and renamed into place, so an
/// interrupted download never leaves a truncated PDF behind.
pub async fn ensure_document(path: &Path, url: &str) -> Result<PathBuf, BootstrapError> {
    if tokio::fs::try_exists(path).await? {
        return Ok(path.to_path_buf());
    }

    tracing::info!("PDF not found at {}, downloading from {}", path.display(), url);

    let bytes = download(url).await?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    install(path, &bytes).await?;

    tracing::info!(
        "PDF downloaded successfully to {} ({} bytes)",
        path.display(),
        bytes.len()
    );
    Ok(path.to_path_buf())
}

async fn download(url: &str) -> Result<Vec<u8>, BootstrapError> {
    let wrap = |source: reqwest::Error| BootstrapError::Download {
        url: url.to_string(),
        source,
    };

    let response = reqwest::get(url)
        .await
        .and_then(|r| r.error_for_status())
        .map_err(wrap)?;
    let bytes = response.bytes().await.map_err(wrap)?;
    Ok(bytes.to_vec())
}

/// Write `bytes` to the `.part` sibling of `path`, then rename it into place
///
/// Any failure removes the partial file before returning.
async fn install(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let partial = partial_path(path);
    let result = match tokio::fs::write(&partial, bytes).await {
        Ok(()) => tokio::fs::rename(&partial, path).await,
        Err(e) => Err(e),
    };
    if result.is_err() {
        let _ = tokio::fs::remove_file(&partial).await;
    }
    result
}

fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    path.with_file_name(name)
}
