//! Command line argument parsing and validation.
//!
//! Every flag falls back to the `INPUT_*` environment variable of the
//! same name, so the binary runs unchanged as a workflow step (the
//! runner exposes step inputs that way) or by hand with flags.

use clap::{ArgAction, Parser};

use crate::error::Result;
use crate::github::ReleaseTarget;
use crate::resolve::{DesiredRelease, ReconcilePolicy};

/// Upload local build artifacts to a GitHub release
#[derive(Parser, Debug)]
#[command(
    name = "release_upload",
    version,
    about = "Upload local build artifacts to a GitHub release",
    long_about = "Resolve (or create) the release for a tag, then upload files to it as assets.

Usage:
  release_upload --repo-token $TOKEN --tag v1.0.0 --file dist/app.bin
  release_upload --repo-token $TOKEN --tag v1.0.0 --file 'dist/*.tar.gz' --file-glob true"
)]
pub struct Args {
    /// Auth token for the GitHub API
    #[arg(long, env = "INPUT_REPO_TOKEN", hide_env_values = true)]
    pub repo_token: String,

    /// File to upload, or a glob pattern when --file-glob is true
    #[arg(long, env = "INPUT_FILE")]
    pub file: String,

    /// Treat --file as a glob pattern
    #[arg(long, env = "INPUT_FILE_GLOB", default_value_t = false, action = ArgAction::Set)]
    pub file_glob: bool,

    /// Asset name; supports a $tag placeholder. Defaults to the file's
    /// base name
    #[arg(long, env = "INPUT_ASSET_NAME")]
    pub asset_name: Option<String>,

    /// Release tag; refs/tags/ and refs/heads/ prefixes are stripped
    #[arg(long, env = "INPUT_TAG")]
    pub tag: String,

    /// Replace duplicate assets and overwrite differing release metadata
    #[arg(long, env = "INPUT_OVERWRITE", default_value_t = false, action = ArgAction::Set)]
    pub overwrite: bool,

    /// Create the release as a draft
    #[arg(long, env = "INPUT_DRAFT", default_value_t = false, action = ArgAction::Set)]
    pub draft: bool,

    /// Create or keep the release as a prerelease
    #[arg(long, env = "INPUT_PRERELEASE", default_value_t = false, action = ArgAction::Set)]
    pub prerelease: bool,

    /// Clear the prerelease flag on an existing prerelease
    #[arg(long, env = "INPUT_PROMOTE", default_value_t = false, action = ArgAction::Set)]
    pub promote: bool,

    /// Mark the release as the repository's latest
    #[arg(long, env = "INPUT_MAKE_LATEST", default_value_t = true, action = ArgAction::Set)]
    pub make_latest: bool,

    /// Release display name
    #[arg(long, env = "INPUT_RELEASE_NAME")]
    pub release_name: Option<String>,

    /// Release notes; %0A, %0D and %25 escapes are decoded
    #[arg(long, env = "INPUT_BODY")]
    pub body: Option<String>,

    /// Commit to tag if the tag does not exist yet
    #[arg(long, env = "INPUT_TARGET_COMMIT")]
    pub target_commit: Option<String>,

    /// Target repository as owner/repo; defaults to the invoking one
    #[arg(long, env = "INPUT_REPO_NAME")]
    pub repo_name: Option<String>,

    /// Id of a draft created by a previous step, to skip the tag lookup
    #[arg(long, env = "INPUT_DRAFT_ID")]
    pub draft_id: Option<u64>,

    /// Check the release for a same-named asset before uploading
    #[arg(long, env = "INPUT_CHECK_DUPLICATES", default_value_t = true, action = ArgAction::Set)]
    pub check_duplicates: bool,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.repo_token.is_empty() {
            return Err("repo_token is required".to_string());
        }
        if self.file.is_empty() {
            return Err("file is required".to_string());
        }
        if self.tag.is_empty() {
            return Err("tag is required".to_string());
        }
        Ok(())
    }
}

/// Normalized configuration derived from the raw arguments
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// API auth token
    pub token: String,
    /// Repository the release lives in
    pub target: ReleaseTarget,
    /// Tag with ref prefixes stripped
    pub tag: String,
    /// File path or glob pattern
    pub file: String,
    /// Whether `file` is a glob pattern
    pub file_glob: bool,
    /// Declared asset name, if any
    pub asset_name: Option<String>,
    /// Desired release properties for the resolver
    pub desired: DesiredRelease,
    /// Reconciliation policy for an existing release
    pub policy: ReconcilePolicy,
    /// Duplicate-name check toggle for the publisher
    pub check_duplicates: bool,
    /// Replace duplicate assets
    pub overwrite: bool,
}

impl RunConfig {
    /// Normalize raw arguments into a run configuration.
    ///
    /// Fails with a configuration error on an unparseable repo_name or
    /// when no target repository can be determined.
    pub fn from_args(args: &Args) -> Result<Self> {
        let tag = strip_ref_prefix(&args.tag).to_string();
        let target = match args.repo_name.as_deref().filter(|s| !s.is_empty()) {
            Some(repo_name) => ReleaseTarget::parse(repo_name)?,
            None => ReleaseTarget::from_env()?,
        };

        if args.promote && args.draft {
            // Not a covered combination; promote only ever touches an
            // existing prerelease, so this is a no-op.
            log::debug!("promote has no effect when creating a draft release");
        }

        let desired = DesiredRelease {
            draft: args.draft,
            prerelease: args.prerelease,
            make_latest: args.make_latest,
            name: args.release_name.clone(),
            body: args.body.as_deref().map(unescape_body),
            target_commit: args.target_commit.clone(),
            draft_id: args.draft_id,
        };
        let policy = ReconcilePolicy {
            overwrite: args.overwrite,
            promote: args.promote,
        };

        Ok(Self {
            token: args.repo_token.clone(),
            target,
            tag,
            file: args.file.clone(),
            file_glob: args.file_glob,
            asset_name: args.asset_name.clone(),
            desired,
            policy,
            check_duplicates: args.check_duplicates,
            overwrite: args.overwrite,
        })
    }
}

/// Strip the ref prefix a workflow trigger may carry on the tag input
fn strip_ref_prefix(tag: &str) -> &str {
    tag.strip_prefix("refs/tags/")
        .or_else(|| tag.strip_prefix("refs/heads/"))
        .unwrap_or(tag)
}

/// Decode the escape sequences the runner applies to multi-line inputs.
///
/// %25 must decode last; it is the escape for the escape character.
fn unescape_body(body: &str) -> String {
    body.replace("%0D", "\r")
        .replace("%0A", "\n")
        .replace("%25", "%")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> Args {
        Args {
            repo_token: "token".to_string(),
            file: "dist/app.bin".to_string(),
            file_glob: false,
            asset_name: None,
            tag: "v1.0.0".to_string(),
            overwrite: false,
            draft: false,
            prerelease: false,
            promote: false,
            make_latest: true,
            release_name: None,
            body: None,
            target_commit: None,
            repo_name: Some("octocat/hello-world".to_string()),
            draft_id: None,
            check_duplicates: true,
        }
    }

    #[test]
    fn tag_ref_prefixes_are_stripped() {
        assert_eq!(strip_ref_prefix("refs/tags/v1.2.3"), "v1.2.3");
        assert_eq!(strip_ref_prefix("refs/heads/nightly"), "nightly");
        assert_eq!(strip_ref_prefix("v1.2.3"), "v1.2.3");
    }

    #[test]
    fn body_escapes_are_decoded() {
        assert_eq!(unescape_body("line1%0Aline2"), "line1\nline2");
        assert_eq!(unescape_body("a%0D%0Ab"), "a\r\nb");
        assert_eq!(unescape_body("100%25"), "100%");
        // %25 decodes last so an escaped escape never double-decodes.
        assert_eq!(unescape_body("%250A"), "%0A");
    }

    #[test]
    fn run_config_normalizes_tag_and_target() {
        let mut raw = args();
        raw.tag = "refs/tags/v2.0.0".to_string();
        raw.body = Some("one%0Atwo".to_string());
        let config = RunConfig::from_args(&raw).unwrap();
        assert_eq!(config.tag, "v2.0.0");
        assert_eq!(config.target.owner, "octocat");
        assert_eq!(config.desired.body.as_deref(), Some("one\ntwo"));
    }

    #[test]
    fn bad_repo_name_is_a_config_error() {
        let mut raw = args();
        raw.repo_name = Some("not-a-repo".to_string());
        assert!(matches!(
            RunConfig::from_args(&raw),
            Err(crate::error::UploadError::Config { .. })
        ));
    }

    #[test]
    fn validate_rejects_empty_required_inputs() {
        let mut raw = args();
        raw.tag = String::new();
        assert!(raw.validate().is_err());
        assert!(args().validate().is_ok());
    }
}
