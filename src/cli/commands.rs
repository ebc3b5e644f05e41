//! Command execution coordinating the upload workflow.
//!
//! Resolves the release once, then publishes each matched file in
//! order, recording step outputs and the run's failure state.

use crate::assets::{self, AssetCandidate};
use crate::cli::{Args, OutputManager, RunConfig};
use crate::error::{Result, UploadError};
use crate::github::GitHubClient;
use crate::outputs::set_output;
use crate::publish::{PublishOptions, PublishOutcome, publish};
use crate::resolve::{Resolved, resolve};

/// Execute the upload workflow, returning the process exit code
pub async fn execute_upload(args: Args) -> Result<i32> {
    let output = OutputManager::new(false);

    if let Err(validation_error) = args.validate() {
        output.error(&format!("Invalid arguments: {validation_error}"));
        return Ok(1);
    }

    let config = RunConfig::from_args(&args)?;
    let client = GitHubClient::new(&config.token, config.target.clone())?;

    let resolved = resolve(&client, &config.tag, &config.desired, config.policy).await?;
    let release = match resolved {
        Resolved::Created(release) => {
            output.info(&format!(
                "Created release {} for tag {}",
                release.id, config.tag
            ));
            set_output("draft_id", &release.id.to_string())?;
            release
        }
        Resolved::Existing(release) => {
            output.info(&format!(
                "Using existing release {} for tag {}",
                release.id, config.tag
            ));
            release
        }
    };

    let candidates: Vec<AssetCandidate> = if config.file_glob {
        assets::expand_glob(&config.file)?
            .into_iter()
            .map(AssetCandidate::for_glob_match)
            .collect()
    } else {
        vec![AssetCandidate::for_file(
            &config.file,
            config.asset_name.as_deref(),
            &config.tag,
        )]
    };

    let options = PublishOptions {
        overwrite: config.overwrite,
        check_duplicates: config.check_duplicates,
        ..Default::default()
    };

    // A duplicate without overwrite marks the run failed but later
    // files still upload; any other error aborts the batch.
    let mut failure: Option<UploadError> = None;
    for candidate in &candidates {
        match publish(&client, &release, candidate, &options).await {
            Ok(PublishOutcome::Uploaded {
                browser_download_url,
            }) => {
                set_output("browser_download_url", &browser_download_url)?;
                output.success(&format!(
                    "Uploaded {} to release {}",
                    candidate.name, config.tag
                ));
                output.indent(&browser_download_url);
            }
            Ok(PublishOutcome::Skipped) => {
                output.warn(&format!(
                    "Skipped {} (not a regular file, or empty)",
                    candidate.path.display()
                ));
            }
            Err(UploadError::DuplicateAsset {
                name,
                browser_download_url,
            }) => {
                // The existing asset's URL is still the step's
                // observable result, so idempotent re-runs can read it.
                set_output("browser_download_url", &browser_download_url)?;
                output.error(&format!(
                    "An asset called '{name}' already exists in release {}",
                    config.tag
                ));
                failure.get_or_insert(UploadError::DuplicateAsset {
                    name,
                    browser_download_url,
                });
            }
            Err(e) => return Err(e),
        }
    }

    match failure {
        Some(e) => {
            output.error(&format!("Upload run failed: {e}"));
            Ok(1)
        }
        None => Ok(0),
    }
}
