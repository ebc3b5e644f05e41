//! Error types for release upload operations.
//!
//! This module defines the error taxonomy with actionable messages and recovery suggestions.

use thiserror::Error;

/// Result type alias for release upload operations
pub type Result<T> = std::result::Result<T, UploadError>;

/// Main error type for all release upload operations
#[derive(Error, Debug)]
pub enum UploadError {
    /// Bad or missing configuration input
    #[error("Configuration error: {reason}")]
    Config {
        /// Reason for the error
        reason: String,
    },

    /// Release or ref could not be resolved and creation also failed
    #[error("Not found: {what}")]
    NotFound {
        /// What could not be resolved
        what: String,
    },

    /// Non-2xx response from the GitHub API
    #[error("GitHub API error (HTTP {status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Message reported by the platform
        message: String,
    },

    /// Network-level failure talking to the GitHub API
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// An asset of the same name already exists and overwrite is disabled
    #[error("An asset called '{name}' already exists in the release")]
    DuplicateAsset {
        /// Name of the conflicting asset
        name: String,
        /// Download URL of the asset already attached to the release
        browser_download_url: String,
    },

    /// Glob pattern matched no files
    #[error("No files matching the glob pattern found: {pattern}")]
    NoMatch {
        /// The pattern that matched nothing
        pattern: String,
    },

    /// Local file IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl UploadError {
    /// Build a configuration error from anything displayable
    pub fn config(reason: impl Into<String>) -> Self {
        UploadError::Config {
            reason: reason.into(),
        }
    }

    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        match self {
            UploadError::Config { .. } => vec![
                "Check the workflow inputs (repo_token, file, tag)".to_string(),
                "repo_name must be in owner/repo format".to_string(),
            ],
            UploadError::Api { status: 401, .. } | UploadError::Api { status: 403, .. } => vec![
                "Verify the repo_token has contents:write permission".to_string(),
                "For cross-repository uploads a personal access token is required".to_string(),
            ],
            UploadError::NoMatch { .. } => vec![
                "Check the glob pattern against the build output directory".to_string(),
                "Ensure the artifacts were built before the upload step runs".to_string(),
            ],
            UploadError::DuplicateAsset { .. } => vec![
                "Pass overwrite=true to replace existing assets".to_string(),
            ],
            _ => vec![],
        }
    }
}
