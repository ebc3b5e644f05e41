//! GitHub API integration for release resolution and asset upload.

mod client;
mod models;

pub use client::GitHubClient;
pub use models::{
    MakeLatest, NewRelease, Release, ReleaseAsset, ReleaseLookup, ReleasePatch, ReleaseTarget,
};

use std::future::Future;

use bytes::Bytes;

use crate::error::Result;

/// Remote release operations needed by the resolver and publisher.
///
/// Implementations are constructed with a [`ReleaseTarget`], so every
/// call through one host instance is scoped to that repository. The
/// trait exists so the reconciliation logic can be exercised against an
/// in-memory host in tests.
pub trait ReleaseHost {
    /// Fetch a release by its tag name.
    fn release_by_tag(&self, tag: &str) -> impl Future<Output = Result<ReleaseLookup>> + Send;

    /// Fetch a release directly by id (the only way to reach a draft,
    /// which has no tag yet).
    fn release_by_id(&self, id: u64) -> impl Future<Output = Result<ReleaseLookup>> + Send;

    /// Create a release.
    fn create_release(&self, new: &NewRelease) -> impl Future<Output = Result<Release>> + Send;

    /// Apply a partial update to an existing release.
    fn update_release(
        &self,
        id: u64,
        patch: &ReleasePatch,
    ) -> impl Future<Output = Result<Release>> + Send;

    /// Whether a git tag of this name already exists in the repository.
    fn tag_exists(&self, tag: &str) -> impl Future<Output = Result<bool>> + Send;

    /// List every asset attached to a release, draining pagination.
    fn release_assets(
        &self,
        release_id: u64,
    ) -> impl Future<Output = Result<Vec<ReleaseAsset>>> + Send;

    /// Delete an asset by id.
    fn delete_asset(&self, asset_id: u64) -> impl Future<Output = Result<()>> + Send;

    /// Upload raw bytes as a named asset on the release's upload endpoint.
    fn upload_asset(
        &self,
        release: &Release,
        name: &str,
        content: Bytes,
    ) -> impl Future<Output = Result<ReleaseAsset>> + Send;
}
