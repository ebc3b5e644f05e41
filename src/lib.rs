//! # release_upload
//!
//! Publish local build artifacts as downloadable assets on a GitHub
//! release, identified by tag.
//!
//! The crate is built around two stages composed linearly:
//!
//! - **Release resolution** ([`resolve`]): find the release behind a
//!   tag, create it when absent, and reconcile existing metadata to the
//!   desired state in a single update call.
//! - **Asset publishing** ([`publish`]): upload each local file as a
//!   named asset, reconciling name collisions per policy, with bounded
//!   retry on transient upload failure.
//!
//! ## Usage
//!
//! ```bash
//! release_upload --repo-token $TOKEN --tag v1.0.0 --file dist/app.bin
//! release_upload --repo-token $TOKEN --tag v1.0.0 --file 'dist/*.zip' --file-glob true
//! ```
//!
//! As a workflow step the same inputs arrive as `INPUT_*` environment
//! variables and step outputs land in `GITHUB_OUTPUT`.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

// Core modules
pub mod assets;
pub mod cli;
pub mod error;
pub mod github;
pub mod outputs;
pub mod publish;
pub mod resolve;

#[cfg(test)]
pub(crate) mod test_utils;

// Re-export main types for public API
pub use assets::AssetCandidate;
pub use error::{Result, UploadError};
pub use github::{GitHubClient, Release, ReleaseAsset, ReleaseHost, ReleaseTarget};
pub use publish::{PublishOptions, PublishOutcome, publish};
pub use resolve::{DesiredRelease, ReconcilePolicy, Resolved, resolve};
