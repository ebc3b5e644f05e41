//! Resolve-or-create protocol for the release behind a tag.

use crate::error::{Result, UploadError};
use crate::github::{MakeLatest, NewRelease, Release, ReleaseHost, ReleaseLookup, ReleasePatch};

/// Desired properties for the release behind the tag
#[derive(Debug, Clone, Default)]
pub struct DesiredRelease {
    /// Create as an unpublished draft
    pub draft: bool,
    /// Create or keep as prerelease
    pub prerelease: bool,
    /// Mark the release as the repository's latest
    pub make_latest: bool,
    /// Display name (empty/unset means leave to the platform)
    pub name: Option<String>,
    /// Release notes
    pub body: Option<String>,
    /// Commit to tag if the tag does not exist yet
    pub target_commit: Option<String>,
    /// Id of a draft created by a previous step, to skip the tag lookup
    pub draft_id: Option<u64>,
}

/// How an existing release's metadata is reconciled against the
/// desired state
#[derive(Debug, Clone, Copy, Default)]
pub struct ReconcilePolicy {
    /// Update name/body that differ from the desired values
    pub overwrite: bool,
    /// Clear the prerelease flag on an existing prerelease
    pub promote: bool,
}

/// Tagged outcome of resolution.
///
/// The distinction matters downstream: only a freshly created release
/// emits the `draft_id` output, and a created release is never
/// reconciled.
#[derive(Debug, Clone)]
pub enum Resolved {
    /// The release was created by this invocation
    Created(Release),
    /// A release already existed for the tag (or draft id)
    Existing(Release),
}

impl Resolved {
    /// Consume the outcome, keeping the release handle
    pub fn into_release(self) -> Release {
        match self {
            Resolved::Created(release) | Resolved::Existing(release) => release,
        }
    }
}

/// Resolve the release for `tag`, creating it when absent.
///
/// Fails with [`UploadError::NotFound`] only when resolution and
/// creation both fail; every other remote fault is propagated
/// unmodified.
pub async fn resolve<H: ReleaseHost>(
    host: &H,
    tag: &str,
    desired: &DesiredRelease,
    policy: ReconcilePolicy,
) -> Result<Resolved> {
    // A draft created by an earlier step has no tag yet, so a known id
    // is the only way to find it again.
    if desired.draft
        && let Some(id) = desired.draft_id
    {
        log::info!("Getting release by known draft id {id}");
        match host.release_by_id(id).await? {
            ReleaseLookup::Found(release) => {
                let release = reconcile(host, release, desired, policy).await?;
                return Ok(Resolved::Existing(release));
            }
            ReleaseLookup::NotFound => {
                log::warn!("Draft release {id} no longer exists, falling back to tag lookup");
            }
        }
    }

    log::info!("Getting release by tag {tag}");
    match host.release_by_tag(tag).await? {
        ReleaseLookup::Found(release) => {
            let release = reconcile(host, release, desired, policy).await?;
            Ok(Resolved::Existing(release))
        }
        ReleaseLookup::NotFound => {
            let release = create(host, tag, desired).await?;
            Ok(Resolved::Created(release))
        }
    }
}

/// Create the release after the tag lookup came back empty.
async fn create<H: ReleaseHost>(host: &H, tag: &str, desired: &DesiredRelease) -> Result<Release> {
    let mut target_commitish = non_empty(desired.target_commit.as_deref());
    if target_commitish.is_some() && host.tag_exists(tag).await? {
        // An existing tag pins the commit; the requested one cannot
        // take effect and is dropped rather than failing the run.
        log::warn!("Ignoring target_commit: tag {tag} already exists in the repository");
        target_commitish = None;
    }

    log::info!("Release for tag {tag} does not exist yet, creating it");
    let new = NewRelease {
        tag_name: tag.to_string(),
        draft: desired.draft,
        prerelease: desired.prerelease,
        make_latest: MakeLatest::from(desired.make_latest),
        name: non_empty(desired.name.as_deref()),
        body: non_empty(desired.body.as_deref()),
        target_commitish,
    };
    host.create_release(&new).await.map_err(|e| match e {
        UploadError::Api { status: 404, .. } => UploadError::NotFound {
            what: format!(
                "release for tag {tag} could not be found or created"
            ),
        },
        other => other,
    })
}

/// Reconcile a found release's metadata against the desired state.
///
/// Every differing field is merged into at most one update call, so a
/// failed write never leaves the release half-updated.
async fn reconcile<H: ReleaseHost>(
    host: &H,
    release: Release,
    desired: &DesiredRelease,
    policy: ReconcilePolicy,
) -> Result<Release> {
    let mut patch = ReleasePatch::default();

    if policy.promote && release.prerelease {
        log::info!("Promoting release {} out of prerelease", release.id);
        patch.prerelease = Some(false);
    }

    if policy.overwrite {
        if let Some(name) = non_empty(desired.name.as_deref())
            && release.name.as_deref() != Some(name.as_str())
        {
            patch.name = Some(name);
        }
        if let Some(body) = non_empty(desired.body.as_deref())
            && release.body.as_deref() != Some(body.as_str())
        {
            patch.body = Some(body);
        }
    }

    if patch.is_empty() {
        return Ok(release);
    }
    host.update_release(release.id, &patch).await
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|s| !s.is_empty()).map(String::from)
}
