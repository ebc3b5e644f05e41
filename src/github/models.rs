//! Data models for the GitHub release REST surface.

use serde::{Deserialize, Serialize};

use crate::error::{Result, UploadError};

/// Repository coordinates for release operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseTarget {
    /// Repository owner
    pub owner: String,
    /// Repository name
    pub repo: String,
}

impl ReleaseTarget {
    /// Parse an `owner/repo` string, splitting on the first `/`.
    ///
    /// Both halves must be non-empty; anything else is a fatal
    /// configuration error.
    pub fn parse(repo_name: &str) -> Result<Self> {
        let (owner, repo) = repo_name.split_once('/').ok_or_else(|| {
            UploadError::config(format!(
                "Invalid repo_name '{repo_name}'. Expected: owner/repo"
            ))
        })?;
        if owner.is_empty() {
            return Err(UploadError::config(format!(
                "Could not extract 'owner' from repo_name: {repo_name}"
            )));
        }
        if repo.is_empty() {
            return Err(UploadError::config(format!(
                "Could not extract 'repo' from repo_name: {repo_name}"
            )));
        }
        Ok(Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
        })
    }

    /// Resolve the invoking repository from `GITHUB_REPOSITORY`
    pub fn from_env() -> Result<Self> {
        match std::env::var("GITHUB_REPOSITORY") {
            Ok(value) => Self::parse(&value),
            Err(_) => Err(UploadError::config(
                "repo_name not set and GITHUB_REPOSITORY is not available",
            )),
        }
    }
}

/// A release as returned by the GitHub API.
///
/// Held immutable by the publisher once resolved; only the id and the
/// upload endpoint are read during asset upload.
#[derive(Debug, Clone, Deserialize)]
pub struct Release {
    /// Release id
    pub id: u64,
    /// The tag this release points at (empty for unpublished drafts)
    #[serde(default)]
    pub tag_name: String,
    /// Whether the release is an unpublished draft
    pub draft: bool,
    /// Whether the release is flagged as a prerelease
    pub prerelease: bool,
    /// Display name
    #[serde(default)]
    pub name: Option<String>,
    /// Release notes
    #[serde(default)]
    pub body: Option<String>,
    /// Hypermedia upload endpoint (`{?name,label}` template suffix included)
    pub upload_url: String,
    /// Commitish the tag was (or will be) created from
    #[serde(default)]
    pub target_commitish: String,
}

/// A binary asset attached to a release
#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseAsset {
    /// Asset id
    pub id: u64,
    /// Asset file name (unique within a release)
    pub name: String,
    /// Public download URL
    pub browser_download_url: String,
}

/// Wire value for the `make_latest` release field.
///
/// The API takes this as a string, not a boolean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MakeLatest {
    /// Mark the release as the latest for the repository
    True,
    /// Do not touch the repository's latest release pointer
    False,
}

impl From<bool> for MakeLatest {
    fn from(value: bool) -> Self {
        if value { MakeLatest::True } else { MakeLatest::False }
    }
}

/// Request payload for creating a release
#[derive(Debug, Clone, Serialize)]
pub struct NewRelease {
    /// Tag to publish under
    pub tag_name: String,
    /// Create as an unpublished draft
    pub draft: bool,
    /// Flag as prerelease
    pub prerelease: bool,
    /// Latest-release marker
    pub make_latest: MakeLatest,
    /// Display name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Release notes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Commit to tag, only honored when the tag does not exist yet
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_commitish: Option<String>,
}

/// Partial update payload for an existing release.
///
/// Only scheduled fields are serialized, so one PATCH carries every
/// difference the resolver found.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReleasePatch {
    /// New display name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New release notes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// New prerelease flag (cleared by promote)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prerelease: Option<bool>,
}

impl ReleasePatch {
    /// True when no field is scheduled for update
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.body.is_none() && self.prerelease.is_none()
    }
}

/// Tagged result of a release lookup.
///
/// A 404 from the platform is an expected control-flow signal, not an
/// error, so lookups never surface it as one.
#[derive(Debug, Clone)]
pub enum ReleaseLookup {
    /// The release exists
    Found(Release),
    /// No release for this tag or id
    NotFound,
}
