//! Upload one staged asset to a resolved release.

use bytes::Bytes;
use tokio::time::Duration;

use super::retry::retry_with_backoff;
use crate::assets::AssetCandidate;
use crate::error::{Result, UploadError};
use crate::github::{Release, ReleaseHost};

/// Per-file publishing policy
#[derive(Debug, Clone)]
pub struct PublishOptions {
    /// Replace a same-named asset instead of failing
    pub overwrite: bool,
    /// Check the release's asset list for a name collision before upload
    pub check_duplicates: bool,
    /// Total upload attempts (first try included)
    pub max_attempts: u32,
    /// Base backoff delay between upload attempts
    pub retry_delay: Duration,
}

impl Default for PublishOptions {
    fn default() -> Self {
        Self {
            overwrite: false,
            check_duplicates: true,
            max_attempts: 3,
            retry_delay: Duration::from_secs(1),
        }
    }
}

/// Tagged outcome of a publish call
#[derive(Debug, Clone)]
pub enum PublishOutcome {
    /// The asset was uploaded
    Uploaded {
        /// Public download URL of the new asset
        browser_download_url: String,
    },
    /// The candidate was not a regular file or was empty; tolerated so
    /// glob patterns may match directories and placeholder files
    Skipped,
}

/// Publish one candidate file as a release asset.
///
/// Duplicate handling short-circuits before any upload attempt; the
/// delete-then-recreate sequence under `overwrite` is not atomic and a
/// concurrent uploader can race it (known, accepted).
pub async fn publish<H: ReleaseHost>(
    host: &H,
    release: &Release,
    candidate: &AssetCandidate,
    options: &PublishOptions,
) -> Result<PublishOutcome> {
    let metadata = std::fs::metadata(&candidate.path)?;
    if !metadata.is_file() {
        log::info!("Skipping {}, not a regular file", candidate.path.display());
        return Ok(PublishOutcome::Skipped);
    }
    if metadata.len() == 0 {
        log::info!("Skipping {}, file is empty", candidate.path.display());
        return Ok(PublishOutcome::Skipped);
    }

    if options.check_duplicates {
        let assets = host.release_assets(release.id).await?;
        match assets.iter().find(|a| a.name == candidate.name) {
            Some(existing) if options.overwrite => {
                log::info!(
                    "An asset called {} already exists, deleting it before upload",
                    candidate.name
                );
                host.delete_asset(existing.id).await?;
            }
            Some(existing) => {
                return Err(UploadError::DuplicateAsset {
                    name: candidate.name.clone(),
                    browser_download_url: existing.browser_download_url.clone(),
                });
            }
            None => {
                log::debug!("No pre-existing asset called {} found", candidate.name);
            }
        }
    }

    log::info!(
        "Uploading {} as {} ({} bytes)",
        candidate.path.display(),
        candidate.name,
        metadata.len()
    );
    let content = Bytes::from(std::fs::read(&candidate.path)?);
    let uploaded = retry_with_backoff(
        || host.upload_asset(release, &candidate.name, content.clone()),
        options.max_attempts,
        options.retry_delay,
        "asset upload",
    )
    .await?;

    Ok(PublishOutcome::Uploaded {
        browser_download_url: uploaded.browser_download_url,
    })
}
